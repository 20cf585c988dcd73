use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::users::dto::PublicUser;
use crate::users::repo;

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, Role};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.len() < 3 || payload.username.len() > 50 {
        return Err(AppError::Validation(
            "username must be between 3 and 50 characters".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("email must be a valid address".into()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }
    let role = match payload.role.as_deref() {
        None => Role::Standard,
        Some(r) => Role::parse(r)
            .ok_or_else(|| AppError::Validation("role must be 'admin' or 'standard'".into()))?,
    };
    if let Some(country) = &payload.country {
        if country.len() > 100 {
            return Err(AppError::Validation(
                "country must be at most 100 characters".into(),
            ));
        }
    }

    if repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = repo::insert(
        &state.db,
        &payload.username,
        &payload.email,
        &hash,
        role.as_str(),
        payload.birthdate,
        payload.country.as_deref(),
    )
    .await?;

    info!(user_id = user.id_user, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();

    // Identical failure for unknown email and wrong password; never leak which.
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let user = match repo::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(invalid());
        }
    };

    if !verify_password(&payload.password, &user.password)? {
        warn!(user_id = user.id_user, "login invalid password");
        return Err(invalid());
    }

    let role = Role::parse(&user.role)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("unknown role in database")))?;
    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id_user, role)?;

    info!(user_id = user.id_user, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("amina@example.cm"));
        assert!(is_valid_email("chef.ndole@dishtrad.cm"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two@@example.cm"));
        assert!(!is_valid_email("spaces in@example.cm"));
        assert!(!is_valid_email("missing@tld"));
    }
}
