use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::repo::{EtapeRow, Meal, MealAlias, MealImage, RecipeRow, RestaurantLink};

/// Meal with every relation nested, the shape of all meal reads.
/// Missing relations are empty arrays, never null.
#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id_meal: i32,
    pub official_name: String,
    pub description: Option<String>,
    pub origin_region: Option<String>,
    pub images: Vec<String>,
    pub aliases: Vec<String>,
    pub recipes: Vec<RecipeSummary>,
    pub restaurants: Vec<RestaurantAvailability>,
}

#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id_recipe: i32,
    pub title: String,
    pub url_video: Option<String>,
    pub etapes: Vec<EtapeView>,
}

#[derive(Debug, Serialize)]
pub struct EtapeView {
    pub id_etape: i32,
    pub ordre: i32,
    pub texte: String,
}

/// Restaurant serving the meal, with the price from the join row.
#[derive(Debug, Serialize)]
pub struct RestaurantAvailability {
    pub id_restaurant: i32,
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prix: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub official_name: String,
    pub description: Option<String>,
    pub origin_region: Option<String>,
    /// When present, one initial image is attached in the same transaction.
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub official_name: Option<String>,
    pub description: Option<String>,
    pub origin_region: Option<String>,
    /// When present, replaces every existing image with this one.
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddImageRequest {
    pub id_meal: i32,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AddAliasRequest {
    pub id_meal: i32,
    pub alias_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub id_meal: i32,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// Assemble nested meal shapes from flat row sets, in the input meal order.
/// Steps are sorted by `ordre`; ties keep their fetch order.
pub fn assemble(
    meals: Vec<Meal>,
    images: Vec<MealImage>,
    aliases: Vec<MealAlias>,
    recipes: Vec<RecipeRow>,
    etapes: Vec<EtapeRow>,
    links: Vec<RestaurantLink>,
) -> Vec<MealDetails> {
    let mut images_by_meal: HashMap<i32, Vec<String>> = HashMap::new();
    for img in images {
        images_by_meal.entry(img.id_meal).or_default().push(img.url);
    }

    let mut aliases_by_meal: HashMap<i32, Vec<String>> = HashMap::new();
    for alias in aliases {
        aliases_by_meal
            .entry(alias.id_meal)
            .or_default()
            .push(alias.alias_name);
    }

    let mut etapes_by_recipe: HashMap<i32, Vec<EtapeView>> = HashMap::new();
    for etape in etapes {
        etapes_by_recipe
            .entry(etape.id_recipe)
            .or_default()
            .push(EtapeView {
                id_etape: etape.id_etape,
                ordre: etape.ordre,
                texte: etape.texte,
            });
    }
    for steps in etapes_by_recipe.values_mut() {
        steps.sort_by_key(|s| s.ordre);
    }

    let mut recipes_by_meal: HashMap<i32, Vec<RecipeSummary>> = HashMap::new();
    for recipe in recipes {
        let etapes = etapes_by_recipe
            .remove(&recipe.id_recipe)
            .unwrap_or_default();
        recipes_by_meal
            .entry(recipe.id_meal)
            .or_default()
            .push(RecipeSummary {
                id_recipe: recipe.id_recipe,
                title: recipe.title,
                url_video: recipe.url_video,
                etapes,
            });
    }

    let mut restaurants_by_meal: HashMap<i32, Vec<RestaurantAvailability>> = HashMap::new();
    for link in links {
        restaurants_by_meal
            .entry(link.id_meal)
            .or_default()
            .push(RestaurantAvailability {
                id_restaurant: link.id_restaurant,
                name: link.name,
                region: link.region,
                city: link.city,
                contact: link.contact,
                latitude: link.latitude,
                longitude: link.longitude,
                prix: link.prix,
            });
    }

    meals
        .into_iter()
        .map(|meal| MealDetails {
            images: images_by_meal.remove(&meal.id_meal).unwrap_or_default(),
            aliases: aliases_by_meal.remove(&meal.id_meal).unwrap_or_default(),
            recipes: recipes_by_meal.remove(&meal.id_meal).unwrap_or_default(),
            restaurants: restaurants_by_meal
                .remove(&meal.id_meal)
                .unwrap_or_default(),
            id_meal: meal.id_meal,
            official_name: meal.official_name,
            description: meal.description,
            origin_region: meal.origin_region,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(id: i32, name: &str) -> Meal {
        Meal {
            id_meal: id,
            official_name: name.into(),
            description: None,
            origin_region: None,
        }
    }

    #[test]
    fn meal_without_relations_gets_empty_collections() {
        let shaped = assemble(
            vec![meal(1, "Ndolé")],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].official_name, "Ndolé");
        assert!(shaped[0].images.is_empty());
        assert!(shaped[0].aliases.is_empty());
        assert!(shaped[0].recipes.is_empty());
        assert!(shaped[0].restaurants.is_empty());
    }

    #[test]
    fn relations_attach_to_their_meal_only() {
        let shaped = assemble(
            vec![meal(1, "Eru"), meal(2, "Koki")],
            vec![
                MealImage {
                    id_image: 10,
                    id_meal: 1,
                    url: "https://img/eru.jpg".into(),
                },
                MealImage {
                    id_image: 11,
                    id_meal: 2,
                    url: "https://img/koki.jpg".into(),
                },
            ],
            vec![MealAlias {
                id_alias: 20,
                id_meal: 1,
                alias_name: "Eru soup".into(),
            }],
            vec![RecipeRow {
                id_recipe: 30,
                id_meal: 1,
                title: "Eru traditionnel".into(),
                url_video: None,
            }],
            vec![],
            vec![RestaurantLink {
                id_meal: 2,
                id_restaurant: 40,
                name: "Chez Mado".into(),
                region: Some("Littoral".into()),
                city: Some("Douala".into()),
                contact: None,
                latitude: None,
                longitude: None,
                prix: 2500.0,
            }],
        );

        assert_eq!(shaped[0].images, vec!["https://img/eru.jpg"]);
        assert_eq!(shaped[0].aliases, vec!["Eru soup"]);
        assert_eq!(shaped[0].recipes.len(), 1);
        assert!(shaped[0].restaurants.is_empty());

        assert_eq!(shaped[1].images, vec!["https://img/koki.jpg"]);
        assert!(shaped[1].aliases.is_empty());
        assert!(shaped[1].recipes.is_empty());
        assert_eq!(shaped[1].restaurants[0].name, "Chez Mado");
        assert_eq!(shaped[1].restaurants[0].prix, 2500.0);
    }

    #[test]
    fn etapes_come_back_sorted_by_ordre() {
        let shaped = assemble(
            vec![meal(1, "Eru")],
            vec![],
            vec![],
            vec![RecipeRow {
                id_recipe: 30,
                id_meal: 1,
                title: "Eru traditionnel".into(),
                url_video: None,
            }],
            vec![
                EtapeRow {
                    id_etape: 2,
                    id_recipe: 30,
                    ordre: 2,
                    texte: "Cuire avec la viande".into(),
                },
                EtapeRow {
                    id_etape: 1,
                    id_recipe: 30,
                    ordre: 1,
                    texte: "Laver les feuilles".into(),
                },
            ],
            vec![],
        );

        let etapes = &shaped[0].recipes[0].etapes;
        assert_eq!(etapes[0].ordre, 1);
        assert_eq!(etapes[0].texte, "Laver les feuilles");
        assert_eq!(etapes[1].ordre, 2);
        assert_eq!(etapes[1].texte, "Cuire avec la viande");
    }

    #[test]
    fn duplicate_ordre_keeps_fetch_order() {
        // ordre is caller-supplied and not unique; ties must not reorder.
        let shaped = assemble(
            vec![meal(1, "Mbongo")],
            vec![],
            vec![],
            vec![RecipeRow {
                id_recipe: 5,
                id_meal: 1,
                title: "Mbongo tchobi".into(),
                url_video: None,
            }],
            vec![
                EtapeRow {
                    id_etape: 1,
                    id_recipe: 5,
                    ordre: 1,
                    texte: "Griller les épices".into(),
                },
                EtapeRow {
                    id_etape: 2,
                    id_recipe: 5,
                    ordre: 1,
                    texte: "Piler le mbongo".into(),
                },
            ],
            vec![],
        );

        let etapes = &shaped[0].recipes[0].etapes;
        assert_eq!(etapes[0].id_etape, 1);
        assert_eq!(etapes[1].id_etape, 2);
    }

    #[test]
    fn serialized_shape_uses_empty_arrays_not_null() {
        let shaped = assemble(
            vec![meal(1, "Ndolé")],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        let json = serde_json::to_value(&shaped[0]).unwrap();
        assert!(json["images"].as_array().unwrap().is_empty());
        assert!(json["aliases"].as_array().unwrap().is_empty());
        assert!(json["recipes"].as_array().unwrap().is_empty());
        assert!(json["restaurants"].as_array().unwrap().is_empty());
    }
}
