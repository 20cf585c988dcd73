use sqlx::PgPool;
use tracing::info;

use crate::error::AppError;

use super::dto::{assemble, CreateMealRequest, MealDetails, UpdateMealRequest};
use super::repo::{self, Meal, MealAlias, MealImage};

/// Insert the meal and, when an image URL is supplied, attach the initial
/// image in the same transaction. Either both rows land or neither does.
pub async fn create_meal(db: &PgPool, payload: &CreateMealRequest) -> Result<Meal, AppError> {
    let mut tx = db.begin().await?;
    let meal = repo::insert_tx(
        &mut tx,
        &payload.official_name,
        payload.description.as_deref(),
        payload.origin_region.as_deref(),
    )
    .await?;
    if let Some(url) = &payload.image_url {
        repo::insert_image_tx(&mut tx, meal.id_meal, url).await?;
    }
    tx.commit().await?;
    info!(id_meal = meal.id_meal, "meal created");
    Ok(meal)
}

pub async fn list_meals(db: &PgPool) -> Result<Vec<MealDetails>, AppError> {
    let meals = repo::list_all(db).await?;
    shape_meals(db, meals).await
}

pub async fn get_meal(db: &PgPool, id: i32) -> Result<MealDetails, AppError> {
    let meal = repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Meal"))?;
    let mut shaped = shape_meals(db, vec![meal]).await?;
    Ok(shaped.remove(0))
}

pub async fn search_meals(db: &PgPool, query: &str) -> Result<Vec<MealDetails>, AppError> {
    let meals = repo::search(db, query).await?;
    shape_meals(db, meals).await
}

/// Field merge plus, when a new image URL is given, replace-not-append on the
/// image set: every existing image row is deleted before the new insert, all
/// inside one transaction with the field update.
pub async fn update_meal(
    db: &PgPool,
    id: i32,
    payload: &UpdateMealRequest,
) -> Result<Meal, AppError> {
    let mut tx = db.begin().await?;
    let meal = repo::update_tx(
        &mut tx,
        id,
        payload.official_name.as_deref(),
        payload.description.as_deref(),
        payload.origin_region.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Meal"))?;
    if let Some(url) = &payload.image_url {
        repo::delete_images_tx(&mut tx, id).await?;
        repo::insert_image_tx(&mut tx, id, url).await?;
    }
    tx.commit().await?;
    info!(id_meal = id, "meal updated");
    Ok(meal)
}

pub async fn delete_meal(db: &PgPool, id: i32) -> Result<(), AppError> {
    let deleted = repo::delete(db, id).await?;
    if deleted == 0 {
        return Err(AppError::not_found("Meal"));
    }
    info!(id_meal = id, "meal deleted");
    Ok(())
}

pub async fn add_image(db: &PgPool, id_meal: i32, url: &str) -> Result<MealImage, AppError> {
    if !repo::exists(db, id_meal).await? {
        return Err(AppError::not_found("Meal"));
    }
    Ok(repo::insert_image(db, id_meal, url).await?)
}

pub async fn add_alias(db: &PgPool, id_meal: i32, alias_name: &str) -> Result<MealAlias, AppError> {
    if !repo::exists(db, id_meal).await? {
        return Err(AppError::not_found("Meal"));
    }
    Ok(repo::insert_alias(db, id_meal, alias_name).await?)
}

/// Duplicate favorites are rejected twice over: a pre-check for the pair, and
/// the primary-key constraint for the race where two writers pass the check.
/// Both surface as Conflict.
pub async fn add_favorite(db: &PgPool, id_user: i32, id_meal: i32) -> Result<(), AppError> {
    if !repo::exists(db, id_meal).await? {
        return Err(AppError::not_found("Meal"));
    }
    if repo::favorite_exists(db, id_user, id_meal).await? {
        return Err(AppError::Conflict(
            "User-Meal association already exists".into(),
        ));
    }
    repo::insert_favorite(db, id_user, id_meal).await?;
    info!(id_user, id_meal, "favorite added");
    Ok(())
}

pub async fn clear_aliases(db: &PgPool, id_meal: i32) -> Result<(), AppError> {
    if !repo::exists(db, id_meal).await? {
        return Err(AppError::not_found("Meal"));
    }
    let removed = repo::delete_aliases(db, id_meal).await?;
    info!(id_meal, removed, "aliases cleared");
    Ok(())
}

async fn shape_meals(db: &PgPool, meals: Vec<Meal>) -> Result<Vec<MealDetails>, AppError> {
    let meal_ids: Vec<i32> = meals.iter().map(|m| m.id_meal).collect();
    let images = repo::images_for(db, &meal_ids).await?;
    let aliases = repo::aliases_for(db, &meal_ids).await?;
    let recipes = repo::recipes_for(db, &meal_ids).await?;
    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id_recipe).collect();
    let etapes = repo::etapes_for_recipes(db, &recipe_ids).await?;
    let links = repo::restaurant_links_for(db, &meal_ids).await?;
    Ok(assemble(meals, images, aliases, recipes, etapes, links))
}
