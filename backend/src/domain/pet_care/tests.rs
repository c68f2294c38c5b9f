//! Tests for the pet care service against mocked ports.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    ActionCatalogError, LedgerRepositoryError, MockActionCatalog, MockLedgerRepository,
    MockPetRepository, PetRepositoryError,
};
use crate::domain::{
    ErrorCode, LedgerEntry, LedgerEntryId, PetDraft, PetType, PetTypeId, VitalStat,
};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

struct FirstCandidate;

impl DecayTargetPicker for FirstCandidate {
    fn pick(&self, candidates: &[PetId]) -> Option<PetId> {
        candidates.first().copied()
    }
}

#[derive(Default)]
struct Mocks {
    pets: MockPetRepository,
    ledger: MockLedgerRepository,
    catalog: MockActionCatalog,
}

impl Mocks {
    fn into_service(self) -> PetCareService {
        let runtime = PetCareRuntime {
            picker: Arc::new(FirstCandidate),
            locks: Arc::new(PetLocks::new()),
        };
        PetCareService::with_runtime(
            PetCarePorts::new(
                Arc::new(self.pets),
                Arc::new(self.ledger),
                Arc::new(self.catalog),
            ),
            Arc::new(FixtureClock),
            runtime,
            PetCareConfig::default(),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks::default()
}

fn pet_id() -> PetId {
    PetId::new(7).expect("pet id")
}

fn pet_with(hunger: i64, happiness: i64) -> Pet {
    Pet::new(PetDraft {
        id: pet_id(),
        user_id: UserId::new(1).expect("user id"),
        name: "Rex".to_owned(),
        pet_type: PetType {
            id: PetTypeId::new(1).expect("type id"),
            name: "Dog".to_owned(),
        },
        age: 3,
        hunger: VitalStat::clamp(hunger),
        happiness: VitalStat::clamp(happiness),
    })
}

fn kibble() -> Food {
    Food {
        id: FoodId::new(2).expect("food id"),
        name: "Kibble".to_owned(),
        nutrition_value: 20,
    }
}

fn fetch() -> Activity {
    Activity {
        id: ActivityId::new(3).expect("activity id"),
        name: "Fetch".to_owned(),
        happiness_boost: 15,
    }
}

fn entry_for(entry: &NewLedgerEntry) -> LedgerEntry {
    LedgerEntry::from_new(LedgerEntryId::new(11).expect("entry id"), entry)
}

fn feed_request() -> FeedRequest {
    FeedRequest {
        pet_id: pet_id(),
        food_id: kibble().id,
    }
}

fn expect_pet_and_food(mocks: &mut Mocks, hunger: i64) {
    let pet = pet_with(hunger, 50);
    mocks
        .pets
        .expect_find_by_id()
        .with(eq(pet_id()))
        .times(1)
        .return_once(move |_| Ok(Some(pet)));
    mocks
        .catalog
        .expect_lookup_food()
        .with(eq(kibble().id))
        .times(1)
        .return_once(|_| Ok(Some(kibble())));
}

#[rstest]
#[tokio::test]
async fn feed_uses_atomic_path_and_reports_nominal_value(mut mocks: Mocks) {
    expect_pet_and_food(&mut mocks, 90);
    mocks
        .pets
        .expect_record_and_adjust()
        .withf(|entry, adjustment| {
            entry.action == LedgerAction::Fed(kibble().id)
                && *adjustment == StatAdjustment::increase(StatKind::Hunger, 20)
        })
        .times(1)
        .returning(|entry, adjustment| {
            Ok(AtomicActionOutcome::Applied {
                pet: pet_with(90, 50).with_adjustment(adjustment),
                entry: entry_for(entry),
            })
        });
    mocks.ledger.expect_record().times(0);

    let response = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect("feed succeeds");

    assert_eq!(response.message, "Pet has been fed with Kibble! (+20 hunger)");
    assert_eq!(response.nutrition_gained, 20);
    assert_eq!(response.pet.hunger_level, 100);
}

#[rstest]
#[tokio::test]
async fn feed_on_missing_pet_touches_nothing(mut mocks: Mocks) {
    mocks.pets.expect_find_by_id().times(1).return_once(|_| Ok(None));
    mocks.catalog.expect_lookup_food().times(0);
    mocks.pets.expect_record_and_adjust().times(0);
    mocks.ledger.expect_record().times(0);

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("missing pet");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Pet not found");
}

#[rstest]
#[tokio::test]
async fn feed_with_unknown_food_is_rejected_before_writing(mut mocks: Mocks) {
    let pet = pet_with(40, 50);
    mocks
        .pets
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pet)));
    mocks.catalog.expect_lookup_food().return_once(|_| Ok(None));
    mocks.pets.expect_record_and_adjust().times(0);
    mocks.pets.expect_adjust_stat().times(0);
    mocks.ledger.expect_record().times(0);

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("unknown food");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Food not found");
    assert_eq!(
        error.details().and_then(|d| d.get("code")).and_then(|c| c.as_str()),
        Some("food_not_found")
    );
}

#[rstest]
#[tokio::test]
async fn unsupported_atomic_path_falls_back_to_two_writes(mut mocks: Mocks) {
    expect_pet_and_food(&mut mocks, 30);
    mocks
        .pets
        .expect_record_and_adjust()
        .times(1)
        .return_once(|_, _| Ok(AtomicActionOutcome::Unsupported));
    mocks
        .ledger
        .expect_record()
        .times(1)
        .returning(|entry| Ok(entry_for(entry)));
    mocks
        .pets
        .expect_adjust_stat()
        .with(eq(pet_id()), eq(StatAdjustment::increase(StatKind::Hunger, 20)))
        .times(1)
        .returning(|_, adjustment| Ok(Some(pet_with(30, 50).with_adjustment(adjustment))));

    let response = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect("fallback feed succeeds");

    assert_eq!(response.pet.hunger_level, 50);
}

#[rstest]
#[tokio::test]
async fn fallback_ledger_failure_aborts_before_the_stat_update(mut mocks: Mocks) {
    expect_pet_and_food(&mut mocks, 30);
    mocks
        .pets
        .expect_record_and_adjust()
        .return_once(|_, _| Ok(AtomicActionOutcome::Unsupported));
    mocks
        .ledger
        .expect_record()
        .times(1)
        .return_once(|_| Err(LedgerRepositoryError::connection("refused")));
    mocks.pets.expect_adjust_stat().times(0);

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("ledger failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn fallback_stat_failure_keeps_the_entry_and_reports_generic_failure(mut mocks: Mocks) {
    expect_pet_and_food(&mut mocks, 30);
    mocks
        .pets
        .expect_record_and_adjust()
        .return_once(|_, _| Ok(AtomicActionOutcome::Unsupported));
    mocks
        .ledger
        .expect_record()
        .times(1)
        .returning(|entry| Ok(entry_for(entry)));
    mocks
        .pets
        .expect_adjust_stat()
        .times(1)
        .return_once(|_, _| Err(PetRepositoryError::query("deadlock detected")));

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("partial consistency");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Failed to update pet hunger");
}

#[rstest]
#[tokio::test]
async fn atomic_storage_errors_are_not_retried_through_the_fallback(mut mocks: Mocks) {
    expect_pet_and_food(&mut mocks, 30);
    mocks
        .pets
        .expect_record_and_adjust()
        .return_once(|_, _| Err(PetRepositoryError::query("serialization failure")));
    mocks.ledger.expect_record().times(0);
    mocks.pets.expect_adjust_stat().times(0);

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("atomic failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Database error");
}

#[rstest]
#[tokio::test]
async fn atomic_path_reporting_missing_pet_is_not_found(mut mocks: Mocks) {
    expect_pet_and_food(&mut mocks, 30);
    mocks
        .pets
        .expect_record_and_adjust()
        .return_once(|_, _| Ok(AtomicActionOutcome::PetMissing));
    mocks.ledger.expect_record().times(0);

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("pet deleted concurrently");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn play_raises_happiness_with_activity_message(mut mocks: Mocks) {
    let pet = pet_with(50, 95);
    mocks
        .pets
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pet)));
    mocks
        .catalog
        .expect_lookup_activity()
        .with(eq(fetch().id))
        .return_once(|_| Ok(Some(fetch())));
    mocks
        .pets
        .expect_record_and_adjust()
        .withf(|entry, adjustment| {
            entry.action == LedgerAction::Played(fetch().id)
                && adjustment.kind() == StatKind::Happiness
        })
        .returning(|entry, adjustment| {
            Ok(AtomicActionOutcome::Applied {
                pet: pet_with(50, 95).with_adjustment(adjustment),
                entry: entry_for(entry),
            })
        });

    let response = mocks
        .into_service()
        .play(PlayRequest {
            pet_id: pet_id(),
            activity_id: fetch().id,
        })
        .await
        .expect("play succeeds");

    assert_eq!(
        response.message,
        "You played Fetch with the pet! (+15 happiness)"
    );
    assert_eq!(response.happiness_gained, 15);
    assert_eq!(response.pet.happiness_level, 100);
}

#[rstest]
#[tokio::test]
async fn play_with_unknown_activity_is_rejected(mut mocks: Mocks) {
    let pet = pet_with(50, 50);
    mocks
        .pets
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pet)));
    mocks
        .catalog
        .expect_lookup_activity()
        .return_once(|_| Ok(None));
    mocks.pets.expect_record_and_adjust().times(0);

    let error = mocks
        .into_service()
        .play(PlayRequest {
            pet_id: pet_id(),
            activity_id: fetch().id,
        })
        .await
        .expect_err("unknown activity");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Activity not found");
}

#[rstest]
#[tokio::test]
async fn catalog_outage_maps_to_service_unavailable(mut mocks: Mocks) {
    let pet = pet_with(50, 50);
    mocks
        .pets
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pet)));
    mocks
        .catalog
        .expect_lookup_food()
        .return_once(|_| Err(ActionCatalogError::connection("pool timed out")));

    let error = mocks
        .into_service()
        .feed(feed_request())
        .await
        .expect_err("catalog outage");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn decay_without_pets_is_a_no_op(mut mocks: Mocks) {
    mocks
        .pets
        .expect_list_ids_for_user()
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    mocks.pets.expect_adjust_stat().times(0);

    let response = mocks
        .into_service()
        .decay(DecayRequest {
            user_id: UserId::new(1).expect("user id"),
        })
        .await
        .expect("decay succeeds");

    assert_eq!(response.message, "No pets found for this user");
    assert!(response.updated_pet.is_none());
}

#[rstest]
#[tokio::test]
async fn decay_lowers_hunger_of_exactly_one_pet(mut mocks: Mocks) {
    let ids = vec![pet_id(), PetId::new(8).expect("pet id")];
    mocks
        .pets
        .expect_list_ids_for_user()
        .return_once(move |_| Ok(ids));
    mocks
        .pets
        .expect_adjust_stat()
        .with(
            eq(pet_id()),
            eq(StatAdjustment::decrease(StatKind::Hunger, DECAY_AMOUNT)),
        )
        .times(1)
        .returning(|_, adjustment| Ok(Some(pet_with(5, 50).with_adjustment(adjustment))));
    mocks.ledger.expect_record().times(0);

    let response = mocks
        .into_service()
        .decay(DecayRequest {
            user_id: UserId::new(1).expect("user id"),
        })
        .await
        .expect("decay succeeds");

    assert_eq!(response.message, "Decreased hunger for 1 pet (-10)");
    let pet = response.updated_pet.expect("updated pet");
    assert_eq!(pet.hunger_level, 0);
}

#[rstest]
#[tokio::test]
async fn status_reports_current_stats(mut mocks: Mocks) {
    let pet = pet_with(35, 80);
    mocks
        .pets
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(pet)));

    let status = mocks
        .into_service()
        .status(pet_id())
        .await
        .expect("status succeeds");

    assert_eq!(status.pet_name, "Rex");
    assert_eq!(status.pet_type, "Dog");
    assert_eq!(status.hunger_level, 35);
    assert_eq!(status.happiness_level, 80);
}

#[rstest]
#[tokio::test]
async fn status_for_missing_pet_is_not_found(mut mocks: Mocks) {
    mocks.pets.expect_find_by_id().return_once(|_| Ok(None));

    let error = mocks
        .into_service()
        .status(pet_id())
        .await
        .expect_err("missing pet");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn catalog_listing_outage_is_service_unavailable(mut mocks: Mocks) {
    mocks
        .catalog
        .expect_list_foods()
        .return_once(|| Err(ActionCatalogError::connection("refused")));

    let error = mocks
        .into_service()
        .foods()
        .await
        .expect_err("catalog offline");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
