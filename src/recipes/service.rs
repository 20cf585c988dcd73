use sqlx::PgPool;
use tracing::info;

use crate::error::AppError;
use crate::meals;

use super::dto::{assemble, CreateRecipeRequest, RecipeDetails, UpdateRecipeRequest};
use super::repo::{self, Etape, Recipe};

pub async fn create_recipe(db: &PgPool, payload: &CreateRecipeRequest) -> Result<Recipe, AppError> {
    if !meals::repo::exists(db, payload.id_meal).await? {
        return Err(AppError::not_found("Meal"));
    }
    let recipe = repo::insert(
        db,
        payload.id_meal,
        &payload.title,
        payload.url_video.as_deref(),
    )
    .await?;
    info!(id_recipe = recipe.id_recipe, "recipe created");
    Ok(recipe)
}

pub async fn list_recipes(db: &PgPool) -> Result<Vec<RecipeDetails>, AppError> {
    let recipes = repo::list_all(db).await?;
    shape_recipes(db, recipes).await
}

pub async fn get_recipe(db: &PgPool, id: i32) -> Result<RecipeDetails, AppError> {
    let recipe = repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;
    let mut shaped = shape_recipes(db, vec![recipe]).await?;
    Ok(shaped.remove(0))
}

pub async fn update_recipe(
    db: &PgPool,
    id: i32,
    payload: &UpdateRecipeRequest,
) -> Result<Recipe, AppError> {
    let recipe = repo::update(
        db,
        id,
        payload.title.as_deref(),
        payload.url_video.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Recipe"))?;
    info!(id_recipe = id, "recipe updated");
    Ok(recipe)
}

pub async fn delete_recipe(db: &PgPool, id: i32) -> Result<(), AppError> {
    let deleted = repo::delete(db, id).await?;
    if deleted == 0 {
        return Err(AppError::not_found("Recipe"));
    }
    info!(id_recipe = id, "recipe deleted");
    Ok(())
}

/// Steps reference an existing recipe; missing parents are NotFound rather
/// than a foreign-key failure.
pub async fn add_etape(
    db: &PgPool,
    id_recipe: i32,
    ordre: i32,
    texte: &str,
) -> Result<Etape, AppError> {
    if !repo::exists(db, id_recipe).await? {
        return Err(AppError::not_found("Recipe"));
    }
    Ok(repo::insert_etape(db, id_recipe, ordre, texte).await?)
}

pub async fn add_ingredient(
    db: &PgPool,
    id_recipe: i32,
    id_ingredient: i32,
) -> Result<(), AppError> {
    if !repo::exists(db, id_recipe).await? {
        return Err(AppError::not_found("Recipe"));
    }
    if !repo::ingredient_exists(db, id_ingredient).await? {
        return Err(AppError::not_found("Ingredient"));
    }
    // Duplicate (recipe, ingredient) pairs surface as Conflict via the PK.
    repo::insert_ingredient_link(db, id_recipe, id_ingredient).await?;
    info!(id_recipe, id_ingredient, "ingredient linked");
    Ok(())
}

async fn shape_recipes(db: &PgPool, recipes: Vec<Recipe>) -> Result<Vec<RecipeDetails>, AppError> {
    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id_recipe).collect();
    let etapes = repo::etapes_for(db, &recipe_ids).await?;
    let ingredients = repo::ingredients_for(db, &recipe_ids).await?;
    Ok(assemble(recipes, etapes, ingredients))
}
