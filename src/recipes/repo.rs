use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recipe {
    pub id_recipe: i32,
    pub id_meal: i32,
    pub title: String,
    pub url_video: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Etape {
    pub id_etape: i32,
    pub id_recipe: i32,
    pub ordre: i32,
    pub texte: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Ingredient {
    pub id_ingredient: i32,
    pub name: String,
}

const RECIPE_COLUMNS: &str = "id_recipe, id_meal, title, url_video";

pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id_recipe = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn exists(db: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM recipes WHERE id_recipe = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY id_recipe"
    ))
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    id_meal: i32,
    title: &str,
    url_video: Option<&str>,
) -> Result<Recipe, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (id_meal, title, url_video)
        VALUES ($1, $2, $3)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(id_meal)
    .bind(title)
    .bind(url_video)
    .fetch_one(db)
    .await
}

/// Partial-field merge; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: i32,
    title: Option<&str>,
    url_video: Option<&str>,
) -> Result<Option<Recipe>, sqlx::Error> {
    sqlx::query_as::<_, Recipe>(&format!(
        r#"
        UPDATE recipes
        SET title     = COALESCE($2, title),
            url_video = COALESCE($3, url_video)
        WHERE id_recipe = $1
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(title)
    .bind(url_video)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: i32) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM recipes WHERE id_recipe = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}

pub async fn etapes_for(db: &PgPool, recipe_ids: &[i32]) -> Result<Vec<Etape>, sqlx::Error> {
    sqlx::query_as::<_, Etape>(
        "SELECT id_etape, id_recipe, ordre, texte FROM etapes WHERE id_recipe = ANY($1) ORDER BY id_etape",
    )
    .bind(recipe_ids)
    .fetch_all(db)
    .await
}

/// Ingredients linked to each recipe, with the owning recipe id for grouping.
#[derive(Debug, Clone, FromRow)]
pub struct IngredientLink {
    pub id_recipe: i32,
    pub id_ingredient: i32,
    pub name: String,
}

pub async fn ingredients_for(
    db: &PgPool,
    recipe_ids: &[i32],
) -> Result<Vec<IngredientLink>, sqlx::Error> {
    sqlx::query_as::<_, IngredientLink>(
        r#"
        SELECT ri.id_recipe, i.id_ingredient, i.name
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id_ingredient = ri.id_ingredient
        WHERE ri.id_recipe = ANY($1)
        ORDER BY i.id_ingredient
        "#,
    )
    .bind(recipe_ids)
    .fetch_all(db)
    .await
}

pub async fn insert_etape(
    db: &PgPool,
    id_recipe: i32,
    ordre: i32,
    texte: &str,
) -> Result<Etape, sqlx::Error> {
    sqlx::query_as::<_, Etape>(
        r#"
        INSERT INTO etapes (id_recipe, ordre, texte)
        VALUES ($1, $2, $3)
        RETURNING id_etape, id_recipe, ordre, texte
        "#,
    )
    .bind(id_recipe)
    .bind(ordre)
    .bind(texte)
    .fetch_one(db)
    .await
}

pub async fn ingredient_exists(db: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM ingredients WHERE id_ingredient = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(found.is_some())
}

pub async fn insert_ingredient_link(
    db: &PgPool,
    id_recipe: i32,
    id_ingredient: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO recipe_ingredients (id_recipe, id_ingredient) VALUES ($1, $2)")
        .bind(id_recipe)
        .bind(id_ingredient)
        .execute(db)
        .await?;
    Ok(())
}
