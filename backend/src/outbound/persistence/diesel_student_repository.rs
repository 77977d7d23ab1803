//! SQLite-backed `StudentRepository` implementation using Diesel ORM.
//!
//! Rows are returned as stored. Writes go through a validated
//! `StudentDraft`, but reads never reject a row, so one record edited outside
//! the service cannot fail a whole listing.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{Student, StudentDraft, StudentId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{StudentFields, StudentRow};
use super::pool::{DbPool, PoolError};
use super::schema::students;

const CREATE_STUDENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL
)";

/// Diesel-backed implementation of the student repository port.
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create the `students` table when it does not exist yet.
    ///
    /// Safe to call on every start; existing rows are left untouched.
    pub async fn ensure_schema(&self) -> Result<(), StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::sql_query(CREATE_STUDENTS_TABLE)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> StudentRepositoryError {
    map_basic_pool_error(error, StudentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StudentRepositoryError {
    map_basic_diesel_error(
        error,
        StudentRepositoryError::query,
        StudentRepositoryError::connection,
    )
}

fn draft_to_fields(draft: &StudentDraft) -> StudentFields<'_> {
    StudentFields {
        name: draft.name(),
        email: draft.email(),
        age: draft.age(),
    }
}

fn row_to_student(row: StudentRow) -> Student {
    let StudentRow {
        id,
        name,
        email,
        age,
    } = row;
    Student::from_stored(StudentId::new(id), name, email, age)
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn create(&self, draft: &StudentDraft) -> Result<StudentId, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id = diesel::insert_into(students::table)
            .values(&draft_to_fields(draft))
            .returning(students::id)
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(student_id = id, "student row inserted");
        Ok(StudentId::new(id))
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Student, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = students::table
            .find(id.get())
            .select(StudentRow::as_select())
            .first::<StudentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_student)
            .ok_or_else(|| StudentRepositoryError::not_found(id))
    }

    async fn list(&self) -> Result<Vec<Student>, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StudentRow> = students::table
            .order(students::id.asc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_student).collect())
    }

    async fn update(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<u64, StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(students::table.find(id.get()))
            .set(&draft_to_fields(draft))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(StudentRepositoryError::not_found(id));
        }
        Ok(affected as u64)
    }

    async fn delete_by_id(&self, id: StudentId) -> Result<(), StudentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(students::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if affected == 0 {
            return Err(StudentRepositoryError::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> StudentRow {
        StudentRow {
            id: 4,
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            age: 36,
        }
    }

    #[rstest]
    fn row_conversion_keeps_all_columns(valid_row: StudentRow) {
        let student = row_to_student(valid_row);

        assert_eq!(student.id(), StudentId::new(4));
        assert_eq!(student.name(), "Ada");
        assert_eq!(student.email(), "ada@example.com");
        assert_eq!(student.age(), 36);
    }

    #[rstest]
    #[case::blank_name(" ", "ada@example.com", 36)]
    #[case::empty_email("Ada", "", 36)]
    #[case::zero_age("Ada", "ada@example.com", 0)]
    fn row_conversion_keeps_rows_the_validator_would_reject(
        mut valid_row: StudentRow,
        #[case] name: &str,
        #[case] email: &str,
        #[case] age: i32,
    ) {
        valid_row.name = name.to_owned();
        valid_row.email = email.to_owned();
        valid_row.age = age;

        let student = row_to_student(valid_row);

        assert_eq!(student.name(), name);
        assert_eq!(student.email(), email);
        assert_eq!(student.age(), age);
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("database is locked"));

        assert!(matches!(repo_err, StudentRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("database is locked"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, StudentRepositoryError::Query { .. }));
    }
}
