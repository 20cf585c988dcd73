use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_input_type")]
    pub input_type: String,
    pub input_content: String,
}

fn default_input_type() -> String {
    "text".into()
}

/// Placeholder reply until a real assistant is wired in.
pub fn stub_reply(_input: &str) -> String {
    "Je suis encore en apprentissage. Essayez la recherche de plats en attendant !".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reply_is_stable() {
        assert_eq!(stub_reply("Où manger du ndolé ?"), stub_reply("autre question"));
        assert!(!stub_reply("").is_empty());
    }

    #[test]
    fn input_type_defaults_to_text() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"input_content": "bonjour"}"#).unwrap();
        assert_eq!(req.input_type, "text");
        assert_eq!(req.input_content, "bonjour");
    }
}
