//! Diesel table definitions. Must match `backend/migrations` exactly.

diesel::table! {
    pet_types (pet_type_id) {
        pet_type_id -> Int8,
        type_name -> Varchar,
    }
}

diesel::table! {
    foods (food_id) {
        food_id -> Int8,
        food_name -> Varchar,
        nutrition_value -> Int4,
    }
}

diesel::table! {
    activities (activity_id) {
        activity_id -> Int8,
        activity_name -> Varchar,
        happiness_boost -> Int4,
    }
}

diesel::table! {
    /// Pets and their vital statistics, each constrained to `0..=100`.
    pets (pet_id) {
        pet_id -> Int8,
        user_id -> Int8,
        pet_name -> Varchar,
        pet_type_id -> Int8,
        age -> Int4,
        happiness_level -> Int4,
        hunger_level -> Int4,
    }
}

diesel::table! {
    /// Feeding ledger. `pet_id` is not a foreign key so history survives
    /// pet deletion.
    pet_feeding_log (log_id) {
        log_id -> Int8,
        pet_id -> Int8,
        food_id -> Int8,
        fed_at -> Timestamptz,
    }
}

diesel::table! {
    /// Activity ledger, retained like `pet_feeding_log`.
    pet_activity_log (log_id) {
        log_id -> Int8,
        pet_id -> Int8,
        activity_id -> Int8,
        played_at -> Timestamptz,
    }
}

diesel::joinable!(pets -> pet_types (pet_type_id));
diesel::joinable!(pet_feeding_log -> pets (pet_id));
diesel::joinable!(pet_feeding_log -> foods (food_id));
diesel::joinable!(pet_activity_log -> pets (pet_id));
diesel::joinable!(pet_activity_log -> activities (activity_id));

diesel::allow_tables_to_appear_in_same_query!(
    pet_types,
    foods,
    activities,
    pets,
    pet_feeding_log,
    pet_activity_log,
);
