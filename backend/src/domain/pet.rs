//! Pet aggregate and the validated input for creating one.

use serde::{Deserialize, Serialize};

use super::ids::{PetId, PetTypeId, UserId};
use super::vital_stat::{StatAdjustment, StatKind, VitalStat};

/// Longest accepted pet name, in characters.
pub const PET_NAME_MAX_CHARS: usize = 50;

/// Validation failures raised while constructing pet values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetValidationError {
    #[error("pet name must not be blank")]
    BlankName,
    #[error("pet name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("age must be between 0 and {max}, got {age}")]
    AgeOutOfRange { age: i64, max: i64 },
}

/// Species reference row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: PetTypeId,
    pub name: String,
}

/// Input for [`Pet::new`].
#[derive(Debug, Clone)]
pub struct PetDraft {
    pub id: PetId,
    pub user_id: UserId,
    pub name: String,
    pub pet_type: PetType,
    pub age: u32,
    pub hunger: VitalStat,
    pub happiness: VitalStat,
}

/// A user's pet with its current vital statistics.
///
/// Statistics are only changed through [`Pet::with_adjustment`], which
/// clamps, so a `Pet` value always holds in-range stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    id: PetId,
    user_id: UserId,
    name: String,
    pet_type: PetType,
    age: u32,
    hunger: VitalStat,
    happiness: VitalStat,
}

impl Pet {
    #[must_use]
    pub fn new(draft: PetDraft) -> Self {
        let PetDraft {
            id,
            user_id,
            name,
            pet_type,
            age,
            hunger,
            happiness,
        } = draft;
        Self {
            id,
            user_id,
            name,
            pet_type,
            age,
            hunger,
            happiness,
        }
    }

    #[must_use]
    pub fn id(&self) -> PetId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pet_type(&self) -> &PetType {
        &self.pet_type
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[must_use]
    pub fn hunger(&self) -> VitalStat {
        self.hunger
    }

    #[must_use]
    pub fn happiness(&self) -> VitalStat {
        self.happiness
    }

    #[must_use]
    pub fn stat(&self, kind: StatKind) -> VitalStat {
        match kind {
            StatKind::Hunger => self.hunger,
            StatKind::Happiness => self.happiness,
        }
    }

    /// Copy of this pet with `adjustment` applied to the matching stat.
    #[must_use]
    pub fn with_adjustment(mut self, adjustment: StatAdjustment) -> Self {
        match adjustment.kind() {
            StatKind::Hunger => self.hunger = adjustment.apply_to(self.hunger),
            StatKind::Happiness => self.happiness = adjustment.apply_to(self.happiness),
        }
        self
    }
}

/// Validated request to register a new pet.
///
/// # Examples
/// ```
/// use pet_backend::domain::{NewPet, PetTypeId, UserId};
///
/// let user = UserId::new(1).expect("user id");
/// let kind = PetTypeId::new(2).expect("type id");
/// let pet = NewPet::new(user, "  Rex ", kind, 3).expect("valid pet");
/// assert_eq!(pet.name(), "Rex");
/// assert!(NewPet::new(user, "   ", kind, 3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    user_id: UserId,
    name: String,
    pet_type_id: PetTypeId,
    age: u32,
}

impl NewPet {
    const MAX_AGE: i64 = 200;

    pub fn new(
        user_id: UserId,
        name: &str,
        pet_type_id: PetTypeId,
        age: i64,
    ) -> Result<Self, PetValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PetValidationError::BlankName);
        }
        if trimmed.chars().count() > PET_NAME_MAX_CHARS {
            return Err(PetValidationError::NameTooLong {
                max: PET_NAME_MAX_CHARS,
            });
        }
        let age = u32::try_from(age)
            .ok()
            .filter(|value| i64::from(*value) <= Self::MAX_AGE)
            .ok_or(PetValidationError::AgeOutOfRange {
                age,
                max: Self::MAX_AGE,
            })?;
        Ok(Self {
            user_id,
            name: trimmed.to_owned(),
            pet_type_id,
            age,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn pet_type_id(&self) -> PetTypeId {
        self.pet_type_id
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Materialise the pet once storage has assigned an id.
    #[must_use]
    pub fn into_pet(self, id: PetId, pet_type: PetType) -> Pet {
        Pet::new(PetDraft {
            id,
            user_id: self.user_id,
            name: self.name,
            pet_type,
            age: self.age,
            hunger: VitalStat::DEFAULT,
            happiness: VitalStat::DEFAULT,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn user() -> UserId {
        UserId::new(1).expect("user id")
    }

    #[fixture]
    fn dog() -> PetType {
        PetType {
            id: PetTypeId::new(1).expect("type id"),
            name: "Dog".to_owned(),
        }
    }

    #[rstest]
    #[case("", PetValidationError::BlankName)]
    #[case("   ", PetValidationError::BlankName)]
    #[case(
        "a-name-that-is-far-too-long-for-any-reasonable-pet-to-carry",
        PetValidationError::NameTooLong { max: PET_NAME_MAX_CHARS }
    )]
    fn rejects_bad_names(user: UserId, #[case] name: &str, #[case] expected: PetValidationError) {
        let kind = PetTypeId::new(1).expect("type id");
        assert_eq!(NewPet::new(user, name, kind, 1), Err(expected));
    }

    #[rstest]
    #[case(-1)]
    #[case(201)]
    fn rejects_ages_out_of_range(user: UserId, #[case] age: i64) {
        let kind = PetTypeId::new(1).expect("type id");
        let err = NewPet::new(user, "Rex", kind, age).expect_err("age rejected");
        assert!(matches!(err, PetValidationError::AgeOutOfRange { .. }));
    }

    #[rstest]
    fn new_pets_start_at_default_stats(user: UserId, dog: PetType) {
        let pet = NewPet::new(user, "Rex", dog.id, 0)
            .expect("valid pet")
            .into_pet(PetId::new(9).expect("pet id"), dog);
        assert_eq!(pet.hunger().value(), 50);
        assert_eq!(pet.happiness().value(), 50);
        assert_eq!(pet.age(), 0);
    }

    #[rstest]
    fn adjustments_only_touch_their_stat(user: UserId, dog: PetType) {
        let pet = NewPet::new(user, "Rex", dog.id, 2)
            .expect("valid pet")
            .into_pet(PetId::new(9).expect("pet id"), dog)
            .with_adjustment(StatAdjustment::increase(StatKind::Happiness, 70));
        assert_eq!(pet.happiness().value(), 100);
        assert_eq!(pet.hunger().value(), 50);
        assert_eq!(pet.stat(StatKind::Happiness).value(), 100);
    }
}
