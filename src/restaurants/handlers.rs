use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::jwt::AdminPrincipal;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{
    AddMealRestaurantRequest, CreateRestaurantRequest, RestaurantDetails, UpdateRestaurantRequest,
};
use super::repo::Restaurant;
use super::service;

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/:id",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/restaurants/meal-restaurant", post(add_meal_restaurant))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.len() < 3 || name.len() > 100 {
        return Err(AppError::Validation(
            "name must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantDetails>>, AppError> {
    Ok(Json(service::list_restaurants(&state.db).await?))
}

#[instrument(skip(state))]
async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RestaurantDetails>, AppError> {
    Ok(Json(service::get_restaurant(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
async fn create_restaurant(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<Restaurant>), AppError> {
    validate_name(&payload.name)?;
    let restaurant = service::create_restaurant(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

#[instrument(skip(state, payload))]
async fn update_restaurant(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    let restaurant = service::update_restaurant(&state.db, id, &payload).await?;
    Ok(Json(restaurant))
}

#[instrument(skip(state))]
async fn delete_restaurant(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    service::delete_restaurant(&state.db, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Restaurant deleted successfully" }),
    ))
}

#[instrument(skip(state, payload))]
async fn add_meal_restaurant(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<AddMealRestaurantRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    // Rejected here, before the service layer sees it.
    if payload.prix <= 0.0 {
        return Err(AppError::Validation("prix must be a positive number".into()));
    }
    service::add_meal_restaurant(
        &state.db,
        payload.id_meal,
        payload.id_restaurant,
        payload.prix,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id_meal": payload.id_meal,
            "id_restaurant": payload.id_restaurant,
            "prix": payload.prix,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(validate_name("Chez Mado").is_ok());
        assert!(validate_name("ab").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }
}
