//! Process-local student repository.
//!
//! Mirrors the SQLite adapter's observable behaviour: identifiers start at 1,
//! grow monotonically and are never reused after a delete.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{Student, StudentDraft, StudentId};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, StudentDraft>,
}

/// `StudentRepository` backed by an ordered map behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    table: Mutex<Table>,
}

impl InMemoryStudentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StudentRepositoryError> {
        self.table
            .lock()
            .map_err(|_| StudentRepositoryError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, draft: &StudentDraft) -> Result<StudentId, StudentRepositoryError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, draft.clone());
        Ok(StudentId::new(id))
    }

    async fn find_by_id(&self, id: StudentId) -> Result<Student, StudentRepositoryError> {
        let table = self.lock()?;
        table
            .rows
            .get(&id.get())
            .map(|fields| Student::new(id, fields.clone()))
            .ok_or_else(|| StudentRepositoryError::not_found(id))
    }

    async fn list(&self) -> Result<Vec<Student>, StudentRepositoryError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .iter()
            .map(|(id, fields)| Student::new(StudentId::new(*id), fields.clone()))
            .collect())
    }

    async fn update(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<u64, StudentRepositoryError> {
        let mut table = self.lock()?;
        let row = table
            .rows
            .get_mut(&id.get())
            .ok_or_else(|| StudentRepositoryError::not_found(id))?;
        *row = draft.clone();
        Ok(1)
    }

    async fn delete_by_id(&self, id: StudentId) -> Result<(), StudentRepositoryError> {
        let mut table = self.lock()?;
        table
            .rows
            .remove(&id.get())
            .map(|_| ())
            .ok_or_else(|| StudentRepositoryError::not_found(id))
    }
}
