//! Port for student persistence.
//!
//! Handlers only ever see `Arc<dyn StudentRepository>`, so a backend can be
//! swapped without touching the HTTP adapter.

use async_trait::async_trait;

use crate::domain::{Student, StudentDraft, StudentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "student repository query failed: {message}",
        /// No row matched the identifier.
        NotFound { id: StudentId } => "no student found with id {id}",
    }
}

/// CRUD operations over student records.
///
/// Every method issues a single statement; there is no cross-call
/// transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new record and return the identifier the store assigned.
    async fn create(&self, draft: &StudentDraft) -> Result<StudentId, StudentRepositoryError>;

    /// Fetch one record.
    ///
    /// Returns [`StudentRepositoryError::NotFound`] when no row matches.
    async fn find_by_id(&self, id: StudentId) -> Result<Student, StudentRepositoryError>;

    /// Fetch all records in ascending identifier order.
    async fn list(&self) -> Result<Vec<Student>, StudentRepositoryError>;

    /// Replace name, email and age for `id`, returning the affected row count.
    ///
    /// Returns [`StudentRepositoryError::NotFound`] when nothing was updated.
    async fn update(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<u64, StudentRepositoryError>;

    /// Remove the record for `id`.
    ///
    /// Returns [`StudentRepositoryError::NotFound`] when nothing was deleted.
    async fn delete_by_id(&self, id: StudentId) -> Result<(), StudentRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_message_names_the_identifier() {
        let err = StudentRepositoryError::not_found(StudentId::new(7));
        assert_eq!(err.to_string(), "no student found with id 7");
    }

    #[rstest]
    #[tokio::test]
    async fn mock_repository_is_object_safe() {
        let mut mock = MockStudentRepository::new();
        mock.expect_list().times(1).returning(|| Ok(Vec::new()));

        let repo: std::sync::Arc<dyn StudentRepository> = std::sync::Arc::new(mock);
        let students = repo.list().await.expect("mock returns an empty list");
        assert!(students.is_empty());
    }
}
