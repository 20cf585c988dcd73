use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::repo::{Etape, Ingredient, IngredientLink, Recipe};

/// Recipe with nested steps (sorted by ordre) and ingredients.
#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub id_recipe: i32,
    pub id_meal: i32,
    pub title: String,
    pub url_video: Option<String>,
    pub etapes: Vec<Etape>,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub id_meal: i32,
    pub title: String,
    pub url_video: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub url_video: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddEtapeRequest {
    pub id_recipe: i32,
    pub ordre: i32,
    pub texte: String,
}

#[derive(Debug, Deserialize)]
pub struct AddIngredientRequest {
    pub id_recipe: i32,
    pub id_ingredient: i32,
}

/// Nest steps and ingredients under their recipe, in the input recipe order.
pub fn assemble(
    recipes: Vec<Recipe>,
    etapes: Vec<Etape>,
    ingredients: Vec<IngredientLink>,
) -> Vec<RecipeDetails> {
    let mut etapes_by_recipe: HashMap<i32, Vec<Etape>> = HashMap::new();
    for etape in etapes {
        etapes_by_recipe.entry(etape.id_recipe).or_default().push(etape);
    }
    for steps in etapes_by_recipe.values_mut() {
        steps.sort_by_key(|s| s.ordre);
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<Ingredient>> = HashMap::new();
    for link in ingredients {
        ingredients_by_recipe
            .entry(link.id_recipe)
            .or_default()
            .push(Ingredient {
                id_ingredient: link.id_ingredient,
                name: link.name,
            });
    }

    recipes
        .into_iter()
        .map(|recipe| RecipeDetails {
            etapes: etapes_by_recipe
                .remove(&recipe.id_recipe)
                .unwrap_or_default(),
            ingredients: ingredients_by_recipe
                .remove(&recipe.id_recipe)
                .unwrap_or_default(),
            id_recipe: recipe.id_recipe,
            id_meal: recipe.id_meal,
            title: recipe.title,
            url_video: recipe.url_video,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i32, title: &str) -> Recipe {
        Recipe {
            id_recipe: id,
            id_meal: 1,
            title: title.into(),
            url_video: None,
        }
    }

    #[test]
    fn recipe_without_relations_gets_empty_collections() {
        let shaped = assemble(vec![recipe(1, "Eru traditionnel")], vec![], vec![]);
        assert!(shaped[0].etapes.is_empty());
        assert!(shaped[0].ingredients.is_empty());
    }

    #[test]
    fn etapes_sorted_by_ordre_per_recipe() {
        let shaped = assemble(
            vec![recipe(1, "Eru traditionnel"), recipe(2, "Ndolé maison")],
            vec![
                Etape {
                    id_etape: 3,
                    id_recipe: 1,
                    ordre: 2,
                    texte: "Cuire avec la viande".into(),
                },
                Etape {
                    id_etape: 4,
                    id_recipe: 2,
                    ordre: 1,
                    texte: "Faire bouillir les feuilles".into(),
                },
                Etape {
                    id_etape: 5,
                    id_recipe: 1,
                    ordre: 1,
                    texte: "Laver les feuilles".into(),
                },
            ],
            vec![IngredientLink {
                id_recipe: 1,
                id_ingredient: 9,
                name: "Feuilles d'eru".into(),
            }],
        );

        assert_eq!(shaped[0].etapes.iter().map(|e| e.ordre).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(shaped[0].etapes[0].texte, "Laver les feuilles");
        assert_eq!(shaped[0].ingredients[0].name, "Feuilles d'eru");
        assert_eq!(shaped[1].etapes.len(), 1);
        assert!(shaped[1].ingredients.is_empty());
    }
}
