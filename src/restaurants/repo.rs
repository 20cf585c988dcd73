use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Restaurant {
    pub id_restaurant: i32,
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the join from the restaurant side: meal fields plus the price.
#[derive(Debug, Clone, FromRow)]
pub struct MealLink {
    pub id_restaurant: i32,
    pub id_meal: i32,
    pub official_name: String,
    pub description: Option<String>,
    pub origin_region: Option<String>,
    pub prix: f64,
}

const RESTAURANT_COLUMNS: &str =
    "id_restaurant, name, region, city, contact, latitude, longitude";

pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id_restaurant = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn exists(db: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM restaurants WHERE id_restaurant = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(found.is_some())
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Restaurant>, sqlx::Error> {
    sqlx::query_as::<_, Restaurant>(&format!(
        "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY id_restaurant"
    ))
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    name: &str,
    region: Option<&str>,
    city: Option<&str>,
    contact: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Restaurant, sqlx::Error> {
    sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        INSERT INTO restaurants (name, region, city, contact, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(region)
    .bind(city)
    .bind(contact)
    .bind(latitude)
    .bind(longitude)
    .fetch_one(db)
    .await
}

/// Partial-field merge; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: i32,
    name: Option<&str>,
    region: Option<&str>,
    city: Option<&str>,
    contact: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as::<_, Restaurant>(&format!(
        r#"
        UPDATE restaurants
        SET name      = COALESCE($2, name),
            region    = COALESCE($3, region),
            city      = COALESCE($4, city),
            contact   = COALESCE($5, contact),
            latitude  = COALESCE($6, latitude),
            longitude = COALESCE($7, longitude)
        WHERE id_restaurant = $1
        RETURNING {RESTAURANT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(region)
    .bind(city)
    .bind(contact)
    .bind(latitude)
    .bind(longitude)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM restaurants WHERE id_restaurant = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn meal_links_for(
    db: &PgPool,
    restaurant_ids: &[i32],
) -> Result<Vec<MealLink>, sqlx::Error> {
    sqlx::query_as::<_, MealLink>(
        r#"
        SELECT mr.id_restaurant, m.id_meal, m.official_name, m.description,
               m.origin_region, mr.prix
        FROM meal_restaurants mr
        JOIN meals m ON m.id_meal = mr.id_meal
        WHERE mr.id_restaurant = ANY($1)
        ORDER BY m.id_meal
        "#,
    )
    .bind(restaurant_ids)
    .fetch_all(db)
    .await
}

pub async fn insert_meal_link(
    db: &PgPool,
    id_meal: i32,
    id_restaurant: i32,
    prix: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO meal_restaurants (id_meal, id_restaurant, prix) VALUES ($1, $2, $3)")
        .bind(id_meal)
        .bind(id_restaurant)
        .bind(prix)
        .execute(db)
        .await?;
    Ok(())
}
