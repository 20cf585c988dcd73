use serde::{Deserialize, Serialize};
use time::Date;

use super::repo::User;

/// User shape returned to clients. The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id_user: i32,
    pub username: String,
    pub email: String,
    pub role: String,
    pub birthdate: Option<Date>,
    pub country: Option<String>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id_user: u.id_user,
            username: u.username,
            email: u.email,
            role: u.role,
            birthdate: u.birthdate,
            country: u.country,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub birthdate: Option<Date>,
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_exposes_password() {
        let user = User {
            id_user: 1,
            username: "amina".into(),
            email: "amina@example.cm".into(),
            password: "$argon2id$v=19$secret-hash".into(),
            role: "standard".into(),
            birthdate: None,
            country: Some("Cameroun".into()),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("amina@example.cm"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }
}
