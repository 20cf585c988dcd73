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
    AddEtapeRequest, AddIngredientRequest, CreateRecipeRequest, RecipeDetails, UpdateRecipeRequest,
};
use super::repo::{Etape, Recipe};
use super::service;

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/etape", post(add_etape))
        .route("/recipes/ingredient", post(add_ingredient))
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.len() < 3 || title.len() > 100 {
        return Err(AppError::Validation(
            "title must be between 3 and 100 characters".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn list_recipes(State(state): State<AppState>) -> Result<Json<Vec<RecipeDetails>>, AppError> {
    Ok(Json(service::list_recipes(&state.db).await?))
}

#[instrument(skip(state))]
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeDetails>, AppError> {
    Ok(Json(service::get_recipe(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
async fn create_recipe(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), AppError> {
    validate_title(&payload.title)?;
    let recipe = service::create_recipe(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[instrument(skip(state, payload))]
async fn update_recipe(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, AppError> {
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    let recipe = service::update_recipe(&state.db, id, &payload).await?;
    Ok(Json(recipe))
}

#[instrument(skip(state))]
async fn delete_recipe(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    service::delete_recipe(&state.db, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Recipe deleted successfully" }),
    ))
}

#[instrument(skip(state, payload))]
async fn add_etape(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<AddEtapeRequest>,
) -> Result<(StatusCode, Json<Etape>), AppError> {
    if payload.ordre < 1 {
        return Err(AppError::Validation("ordre must be at least 1".into()));
    }
    if payload.texte.is_empty() || payload.texte.len() > 1000 {
        return Err(AppError::Validation(
            "texte must be between 1 and 1000 characters".into(),
        ));
    }
    let etape = service::add_etape(&state.db, payload.id_recipe, payload.ordre, &payload.texte)
        .await?;
    Ok((StatusCode::CREATED, Json(etape)))
}

#[instrument(skip(state, payload))]
async fn add_ingredient(
    State(state): State<AppState>,
    AdminPrincipal(_): AdminPrincipal,
    Json(payload): Json<AddIngredientRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    service::add_ingredient(&state.db, payload.id_recipe, payload.id_ingredient).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id_recipe": payload.id_recipe,
            "id_ingredient": payload.id_ingredient,
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("Eru traditionnel").is_ok());
        assert!(validate_title("ab").is_err());
        assert!(validate_title(&"x".repeat(101)).is_err());
    }
}
