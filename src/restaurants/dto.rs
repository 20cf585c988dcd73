use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::repo::{MealLink, Restaurant};

/// Restaurant with the meals it serves and their prices.
#[derive(Debug, Serialize)]
pub struct RestaurantDetails {
    pub id_restaurant: i32,
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub meals: Vec<MealAtRestaurant>,
}

#[derive(Debug, Serialize)]
pub struct MealAtRestaurant {
    pub id_meal: i32,
    pub official_name: String,
    pub description: Option<String>,
    pub origin_region: Option<String>,
    pub prix: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AddMealRestaurantRequest {
    pub id_meal: i32,
    pub id_restaurant: i32,
    pub prix: f64,
}

/// Nest priced meals under their restaurant, in the input restaurant order.
pub fn assemble(restaurants: Vec<Restaurant>, links: Vec<MealLink>) -> Vec<RestaurantDetails> {
    let mut meals_by_restaurant: HashMap<i32, Vec<MealAtRestaurant>> = HashMap::new();
    for link in links {
        meals_by_restaurant
            .entry(link.id_restaurant)
            .or_default()
            .push(MealAtRestaurant {
                id_meal: link.id_meal,
                official_name: link.official_name,
                description: link.description,
                origin_region: link.origin_region,
                prix: link.prix,
            });
    }

    restaurants
        .into_iter()
        .map(|r| RestaurantDetails {
            meals: meals_by_restaurant
                .remove(&r.id_restaurant)
                .unwrap_or_default(),
            id_restaurant: r.id_restaurant,
            name: r.name,
            region: r.region,
            city: r.city,
            contact: r.contact,
            latitude: r.latitude,
            longitude: r.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meals_nest_with_their_price() {
        let shaped = assemble(
            vec![
                Restaurant {
                    id_restaurant: 1,
                    name: "Chez Mado".into(),
                    region: Some("Littoral".into()),
                    city: Some("Douala".into()),
                    contact: None,
                    latitude: Some(4.05),
                    longitude: Some(9.7),
                },
                Restaurant {
                    id_restaurant: 2,
                    name: "Saveurs du Mboa".into(),
                    region: None,
                    city: None,
                    contact: None,
                    latitude: None,
                    longitude: None,
                },
            ],
            vec![MealLink {
                id_restaurant: 1,
                id_meal: 10,
                official_name: "Ndolé".into(),
                description: None,
                origin_region: Some("Littoral".into()),
                prix: 3000.0,
            }],
        );

        assert_eq!(shaped[0].meals.len(), 1);
        assert_eq!(shaped[0].meals[0].official_name, "Ndolé");
        assert_eq!(shaped[0].meals[0].prix, 3000.0);
        assert!(shaped[1].meals.is_empty());
    }
}
