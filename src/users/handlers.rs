use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::handlers::is_valid_email;
use crate::auth::jwt::{AdminPrincipal, Principal};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{PublicUser, UpdateUserRequest};
use super::repo;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = repo::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<PublicUser>, AppError> {
    let user = repo::find_by_id(&state.db, principal.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
) -> Result<Json<PublicUser>, AppError> {
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
async fn update_user(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    if let Some(username) = &payload.username {
        if username.len() < 3 || username.len() > 50 {
            return Err(AppError::Validation(
                "username must be between 3 and 50 characters".into(),
            ));
        }
    }
    if let Some(email) = &payload.email {
        if !is_valid_email(email) {
            return Err(AppError::Validation("email must be a valid address".into()));
        }
    }
    if let Some(password) = &payload.password {
        if password.len() < 6 {
            return Err(AppError::Validation(
                "password must be at least 6 characters".into(),
            ));
        }
    }
    if let Some(role) = &payload.role {
        if crate::auth::dto::Role::parse(role).is_none() {
            return Err(AppError::Validation(
                "role must be 'admin' or 'standard'".into(),
            ));
        }
    }

    if repo::find_by_id(&state.db, id).await?.is_none() {
        warn!(id, "update on missing user");
        return Err(AppError::not_found("User"));
    }

    // Password changes are rehashed before persistence, never stored raw.
    let password_hash = match &payload.password {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };

    let user = repo::update(
        &state.db,
        id,
        payload.username.as_deref(),
        payload.email.as_deref(),
        password_hash.as_deref(),
        payload.role.as_deref(),
        payload.birthdate,
        payload.country.as_deref(),
    )
    .await?;

    info!(id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
async fn delete_user(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = repo::delete(&state.db, id).await?;
    if deleted == 0 {
        return Err(AppError::not_found("User"));
    }
    info!(id, "user deleted");
    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}
