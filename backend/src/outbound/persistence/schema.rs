//! Diesel table definitions for the SQLite schema.
//!
//! `ensure_schema` in the student repository creates this table at startup;
//! keep the two in step.

diesel::table! {
    /// Student records.
    ///
    /// `id` is assigned by SQLite (`INTEGER PRIMARY KEY AUTOINCREMENT`) and is
    /// never reused after a delete.
    students (id) {
        id -> BigInt,
        name -> Text,
        email -> Text,
        age -> Integer,
    }
}
