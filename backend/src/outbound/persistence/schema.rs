//! Diesel table definitions; must match `backend/migrations`.

diesel::table! {
    /// Registered accounts. `email` is unique.
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Varchar,
        /// `volunteer` or `association`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Missions; `(owner_id, title)` is unique.
    missions (id) {
        id -> Int8,
        owner_id -> Int8,
        title -> Varchar,
        description -> Text,
        start_date -> Date,
        end_date -> Date,
        /// `open` or `closed`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applications; `(volunteer_id, mission_id)` is unique and rows cascade
    /// with their mission.
    applications (id) {
        id -> Int8,
        volunteer_id -> Int8,
        mission_id -> Int8,
        /// `pending`, `accepted`, or `rejected`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(missions -> users (owner_id));
diesel::joinable!(applications -> missions (mission_id));

diesel::allow_tables_to_appear_in_same_query!(applications, missions, users);
