//! Reference rows loaded when no database is configured.

use crate::domain::{Activity, ActivityId, Food, FoodId, IdValidationError, PetType, PetTypeId};

/// Catalog contents for an in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSeed {
    pub pet_types: Vec<PetType>,
    pub foods: Vec<Food>,
    pub activities: Vec<Activity>,
}

impl CatalogSeed {
    /// A small catalog suitable for local runs and behaviour tests.
    pub fn demo() -> Result<Self, IdValidationError> {
        let pet_types = [(1, "Dog"), (2, "Cat"), (3, "Rabbit")]
            .into_iter()
            .map(|(id, name)| {
                Ok(PetType {
                    id: PetTypeId::new(id)?,
                    name: name.to_owned(),
                })
            })
            .collect::<Result<_, IdValidationError>>()?;
        let foods = [(1, "Kibble", 20), (2, "Fish", 15), (3, "Carrot", 10), (4, "Feast", 60)]
            .into_iter()
            .map(|(id, name, nutrition_value)| {
                Ok(Food {
                    id: FoodId::new(id)?,
                    name: name.to_owned(),
                    nutrition_value,
                })
            })
            .collect::<Result<_, IdValidationError>>()?;
        let activities = [(1, "Fetch", 15), (2, "Nap", 5), (3, "Puzzle toy", 10)]
            .into_iter()
            .map(|(id, name, happiness_boost)| {
                Ok(Activity {
                    id: ActivityId::new(id)?,
                    name: name.to_owned(),
                    happiness_boost,
                })
            })
            .collect::<Result<_, IdValidationError>>()?;
        Ok(Self {
            pet_types,
            foods,
            activities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_has_positive_effects() {
        let seed = CatalogSeed::demo().expect("demo ids are positive");
        assert_eq!(seed.pet_types.len(), 3);
        assert!(seed.foods.iter().all(|food| food.nutrition_value > 0));
        assert!(seed.activities.iter().all(|a| a.happiness_boost > 0));
    }
}
