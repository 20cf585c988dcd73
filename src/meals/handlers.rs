use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::auth::dto::Role;
use crate::auth::jwt::{AdminPrincipal, Principal};
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    AddAliasRequest, AddFavoriteRequest, AddImageRequest, CreateMealRequest, MealDetails,
    SearchParams, UpdateMealRequest,
};
use super::repo::{Meal, MealAlias, MealImage};
use super::service;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
        .route("/search/meals", get(search_meals))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", axum::routing::put(update_meal).delete(delete_meal))
        .route("/meals/image", post(add_image))
        .route("/meals/alias", post(add_alias))
        .route("/meals/user-meal", post(add_favorite))
        .route("/meals/:id/aliases", delete(clear_aliases))
}

fn validate_meal_fields(
    official_name: Option<&str>,
    description: Option<&str>,
    origin_region: Option<&str>,
) -> Result<(), AppError> {
    if let Some(name) = official_name {
        if name.len() < 3 || name.len() > 100 {
            return Err(AppError::Validation(
                "official_name must be between 3 and 100 characters".into(),
            ));
        }
    }
    if let Some(desc) = description {
        if desc.len() > 1000 {
            return Err(AppError::Validation(
                "description must be at most 1000 characters".into(),
            ));
        }
    }
    if let Some(region) = origin_region {
        if region.len() > 100 {
            return Err(AppError::Validation(
                "origin_region must be at most 100 characters".into(),
            ));
        }
    }
    Ok(())
}

#[instrument(skip(state))]
async fn list_meals(State(state): State<AppState>) -> Result<Json<Vec<MealDetails>>, AppError> {
    Ok(Json(service::list_meals(&state.db).await?))
}

#[instrument(skip(state))]
async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MealDetails>, AppError> {
    Ok(Json(service::get_meal(&state.db, id).await?))
}

#[instrument(skip(state))]
async fn search_meals(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MealDetails>>, AppError> {
    let query = match params.query.as_deref() {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return Err(AppError::Validation("Query parameter is required".into()));
        }
    };
    Ok(Json(service::search_meals(&state.db, query).await?))
}

#[instrument(skip(state, payload))]
async fn create_meal(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<Meal>), AppError> {
    validate_meal_fields(
        Some(&payload.official_name),
        payload.description.as_deref(),
        payload.origin_region.as_deref(),
    )?;
    let meal = service::create_meal(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state, payload))]
async fn update_meal(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<Json<Meal>, AppError> {
    validate_meal_fields(
        payload.official_name.as_deref(),
        payload.description.as_deref(),
        payload.origin_region.as_deref(),
    )?;
    let meal = service::update_meal(&state.db, id, &payload).await?;
    Ok(Json(meal))
}

#[instrument(skip(state))]
async fn delete_meal(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    service::delete_meal(&state.db, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Meal deleted successfully" }),
    ))
}

#[instrument(skip(state, payload))]
async fn add_image(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<AddImageRequest>,
) -> Result<(StatusCode, Json<MealImage>), AppError> {
    if payload.url.trim().is_empty() {
        return Err(AppError::Validation("url is required".into()));
    }
    let image = service::add_image(&state.db, payload.id_meal, &payload.url).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[instrument(skip(state, payload))]
async fn add_alias(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<AddAliasRequest>,
) -> Result<(StatusCode, Json<MealAlias>), AppError> {
    if payload.alias_name.len() < 3 || payload.alias_name.len() > 100 {
        return Err(AppError::Validation(
            "alias_name must be between 3 and 100 characters".into(),
        ));
    }
    let alias = service::add_alias(&state.db, payload.id_meal, &payload.alias_name).await?;
    Ok((StatusCode::CREATED, Json(alias)))
}

/// Favorites are added by standard users for themselves; the user id comes
/// from the verified principal, not the request body.
#[instrument(skip(state, payload))]
async fn add_favorite(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if principal.role != Role::Standard {
        warn!(user_id = principal.id, "favorite add requires standard role");
        return Err(AppError::Forbidden("Forbidden: Insufficient role".into()));
    }
    service::add_favorite(&state.db, principal.id, payload.id_meal).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id_user": principal.id,
            "id_meal": payload.id_meal,
        })),
    ))
}

#[instrument(skip(state))]
async fn clear_aliases(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    service::clear_aliases(&state.db, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Aliases cleared successfully" }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_name_bounds() {
        assert!(validate_meal_fields(Some("Eru"), None, None).is_ok());
        assert!(validate_meal_fields(Some("Ok"), None, None).is_err());
        let long = "x".repeat(101);
        assert!(validate_meal_fields(Some(&long), None, None).is_err());
    }

    #[test]
    fn optional_fields_skip_validation_when_absent() {
        assert!(validate_meal_fields(None, None, None).is_ok());
    }

    #[test]
    fn description_capped_at_1000() {
        let long = "x".repeat(1001);
        assert!(validate_meal_fields(None, Some(&long), None).is_err());
        let ok = "x".repeat(1000);
        assert!(validate_meal_fields(None, Some(&ok), None).is_ok());
    }
}
