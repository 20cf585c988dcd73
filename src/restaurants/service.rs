use sqlx::PgPool;
use tracing::info;

use crate::error::AppError;
use crate::meals;

use super::dto::{
    assemble, CreateRestaurantRequest, RestaurantDetails, UpdateRestaurantRequest,
};
use super::repo::{self, Restaurant};

pub async fn create_restaurant(
    db: &PgPool,
    payload: &CreateRestaurantRequest,
) -> Result<Restaurant, AppError> {
    let restaurant = repo::insert(
        db,
        &payload.name,
        payload.region.as_deref(),
        payload.city.as_deref(),
        payload.contact.as_deref(),
        payload.latitude,
        payload.longitude,
    )
    .await?;
    info!(id_restaurant = restaurant.id_restaurant, "restaurant created");
    Ok(restaurant)
}

pub async fn list_restaurants(db: &PgPool) -> Result<Vec<RestaurantDetails>, AppError> {
    let restaurants = repo::list_all(db).await?;
    shape_restaurants(db, restaurants).await
}

pub async fn get_restaurant(db: &PgPool, id: i32) -> Result<RestaurantDetails, AppError> {
    let restaurant = repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Restaurant"))?;
    let mut shaped = shape_restaurants(db, vec![restaurant]).await?;
    Ok(shaped.remove(0))
}

pub async fn update_restaurant(
    db: &PgPool,
    id: i32,
    payload: &UpdateRestaurantRequest,
) -> Result<Restaurant, AppError> {
    let restaurant = repo::update(
        db,
        id,
        payload.name.as_deref(),
        payload.region.as_deref(),
        payload.city.as_deref(),
        payload.contact.as_deref(),
        payload.latitude,
        payload.longitude,
    )
    .await?
    .ok_or_else(|| AppError::not_found("Restaurant"))?;
    info!(id_restaurant = id, "restaurant updated");
    Ok(restaurant)
}

pub async fn delete_restaurant(db: &PgPool, id: i32) -> Result<(), AppError> {
    let deleted = repo::delete(db, id).await?;
    if deleted == 0 {
        return Err(AppError::not_found("Restaurant"));
    }
    info!(id_restaurant = id, "restaurant deleted");
    Ok(())
}

/// Link a meal to a restaurant with a price. Uniqueness of the pair is the
/// join table's primary key; a violation surfaces as Conflict.
pub async fn add_meal_restaurant(
    db: &PgPool,
    id_meal: i32,
    id_restaurant: i32,
    prix: f64,
) -> Result<(), AppError> {
    if !meals::repo::exists(db, id_meal).await? {
        return Err(AppError::not_found("Meal"));
    }
    if !repo::exists(db, id_restaurant).await? {
        return Err(AppError::not_found("Restaurant"));
    }
    repo::insert_meal_link(db, id_meal, id_restaurant, prix).await?;
    info!(id_meal, id_restaurant, prix, "meal-restaurant link added");
    Ok(())
}

async fn shape_restaurants(
    db: &PgPool,
    restaurants: Vec<Restaurant>,
) -> Result<Vec<RestaurantDetails>, AppError> {
    let ids: Vec<i32> = restaurants.iter().map(|r| r.id_restaurant).collect();
    let links = repo::meal_links_for(db, &ids).await?;
    Ok(assemble(restaurants, links))
}
