//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; rows are validated back
//! into domain types before they are returned.

use diesel::prelude::*;

use super::schema::students;

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct StudentRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i32,
}

/// Column values written on insert and on full replacement.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = students)]
pub(crate) struct StudentFields<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub age: i32,
}
