use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Meal {
    pub id_meal: i32,
    pub official_name: String,
    pub description: Option<String>,
    pub origin_region: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealImage {
    pub id_image: i32,
    pub id_meal: i32,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MealAlias {
    pub id_alias: i32,
    pub id_meal: i32,
    pub alias_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id_recipe: i32,
    pub id_meal: i32,
    pub title: String,
    pub url_video: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EtapeRow {
    pub id_etape: i32,
    pub id_recipe: i32,
    pub ordre: i32,
    pub texte: String,
}

/// One row of the meal<->restaurant join, restaurant fields plus the price.
#[derive(Debug, Clone, FromRow)]
pub struct RestaurantLink {
    pub id_meal: i32,
    pub id_restaurant: i32,
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prix: f64,
}

const MEAL_COLUMNS: &str = "id_meal, official_name, description, origin_region";

pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE id_meal = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn exists(db: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM meals WHERE id_meal = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals ORDER BY id_meal"
    ))
    .fetch_all(db)
    .await
}

/// Case-insensitive substring match on official name, description or any
/// alias, capped at five results.
pub async fn search(db: &PgPool, query: &str) -> Result<Vec<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(
        r#"
        SELECT DISTINCT m.id_meal, m.official_name, m.description, m.origin_region
        FROM meals m
        LEFT JOIN meal_aliases a ON a.id_meal = m.id_meal
        WHERE m.official_name ILIKE $1
           OR m.description ILIKE $1
           OR a.alias_name ILIKE $1
        ORDER BY m.id_meal
        LIMIT 5
        "#,
    )
    .bind(like_pattern(query))
    .fetch_all(db)
    .await
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    official_name: &str,
    description: Option<&str>,
    origin_region: Option<&str>,
) -> Result<Meal, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!(
        r#"
        INSERT INTO meals (official_name, description, origin_region)
        VALUES ($1, $2, $3)
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(official_name)
    .bind(description)
    .bind(origin_region)
    .fetch_one(&mut **tx)
    .await
}

/// Partial-field merge; absent fields keep their current value.
pub async fn update_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: i32,
    official_name: Option<&str>,
    description: Option<&str>,
    origin_region: Option<&str>,
) -> Result<Option<Meal>, sqlx::Error> {
    sqlx::query_as::<_, Meal>(&format!(
        r#"
        UPDATE meals
        SET official_name = COALESCE($2, official_name),
            description   = COALESCE($3, description),
            origin_region = COALESCE($4, origin_region)
        WHERE id_meal = $1
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(official_name)
    .bind(description)
    .bind(origin_region)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM meals WHERE id_meal = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

// --- related rows, fetched in bulk for nested reads ---

pub async fn images_for(db: &PgPool, meal_ids: &[i32]) -> Result<Vec<MealImage>, sqlx::Error> {
    sqlx::query_as::<_, MealImage>(
        "SELECT id_image, id_meal, url FROM meal_images WHERE id_meal = ANY($1) ORDER BY id_image",
    )
    .bind(meal_ids)
    .fetch_all(db)
    .await
}

pub async fn aliases_for(db: &PgPool, meal_ids: &[i32]) -> Result<Vec<MealAlias>, sqlx::Error> {
    sqlx::query_as::<_, MealAlias>(
        "SELECT id_alias, id_meal, alias_name FROM meal_aliases WHERE id_meal = ANY($1) ORDER BY id_alias",
    )
    .bind(meal_ids)
    .fetch_all(db)
    .await
}

pub async fn recipes_for(db: &PgPool, meal_ids: &[i32]) -> Result<Vec<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(
        "SELECT id_recipe, id_meal, title, url_video FROM recipes WHERE id_meal = ANY($1) ORDER BY id_recipe",
    )
    .bind(meal_ids)
    .fetch_all(db)
    .await
}

pub async fn etapes_for_recipes(
    db: &PgPool,
    recipe_ids: &[i32],
) -> Result<Vec<EtapeRow>, sqlx::Error> {
    sqlx::query_as::<_, EtapeRow>(
        "SELECT id_etape, id_recipe, ordre, texte FROM etapes WHERE id_recipe = ANY($1) ORDER BY id_etape",
    )
    .bind(recipe_ids)
    .fetch_all(db)
    .await
}

pub async fn restaurant_links_for(
    db: &PgPool,
    meal_ids: &[i32],
) -> Result<Vec<RestaurantLink>, sqlx::Error> {
    sqlx::query_as::<_, RestaurantLink>(
        r#"
        SELECT mr.id_meal, r.id_restaurant, r.name, r.region, r.city, r.contact,
               r.latitude, r.longitude, mr.prix
        FROM meal_restaurants mr
        JOIN restaurants r ON r.id_restaurant = mr.id_restaurant
        WHERE mr.id_meal = ANY($1)
        ORDER BY r.id_restaurant
        "#,
    )
    .bind(meal_ids)
    .fetch_all(db)
    .await
}

// --- images ---

pub async fn insert_image(db: &PgPool, id_meal: i32, url: &str) -> Result<MealImage, sqlx::Error> {
    sqlx::query_as::<_, MealImage>(
        "INSERT INTO meal_images (id_meal, url) VALUES ($1, $2) RETURNING id_image, id_meal, url",
    )
    .bind(id_meal)
    .bind(url)
    .fetch_one(db)
    .await
}

pub async fn insert_image_tx(
    tx: &mut Transaction<'_, Postgres>,
    id_meal: i32,
    url: &str,
) -> Result<MealImage, sqlx::Error> {
    sqlx::query_as::<_, MealImage>(
        "INSERT INTO meal_images (id_meal, url) VALUES ($1, $2) RETURNING id_image, id_meal, url",
    )
    .bind(id_meal)
    .bind(url)
    .fetch_one(&mut **tx)
    .await
}

pub async fn delete_images_tx(
    tx: &mut Transaction<'_, Postgres>,
    id_meal: i32,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM meal_images WHERE id_meal = $1")
        .bind(id_meal)
        .execute(&mut **tx)
        .await?;
    Ok(res.rows_affected())
}

// --- aliases ---

pub async fn insert_alias(
    db: &PgPool,
    id_meal: i32,
    alias_name: &str,
) -> Result<MealAlias, sqlx::Error> {
    sqlx::query_as::<_, MealAlias>(
        r#"
        INSERT INTO meal_aliases (id_meal, alias_name)
        VALUES ($1, $2)
        RETURNING id_alias, id_meal, alias_name
        "#,
    )
    .bind(id_meal)
    .bind(alias_name)
    .fetch_one(db)
    .await
}

pub async fn delete_aliases(db: &PgPool, id_meal: i32) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM meal_aliases WHERE id_meal = $1")
        .bind(id_meal)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

// --- favorites ---

pub async fn favorite_exists(
    db: &PgPool,
    id_user: i32,
    id_meal: i32,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM user_meals WHERE id_user = $1 AND id_meal = $2")
            .bind(id_user)
            .bind(id_meal)
            .fetch_optional(db)
            .await?;
    Ok(found.is_some())
}

pub async fn insert_favorite(db: &PgPool, id_user: i32, id_meal: i32) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO user_meals (id_user, id_meal) VALUES ($1, $2)")
        .bind(id_user)
        .bind(id_meal)
        .execute(db)
        .await?;
    Ok(())
}

/// Escape LIKE wildcards so user input matches literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn plain_terms_get_wrapped() {
        assert_eq!(like_pattern("ndo"), "%ndo%");
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("back\\slash"), "%back\\\\slash%");
    }
}
