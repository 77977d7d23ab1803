//! Domain primitives and ports.
//!
//! Purpose: define the student record, its validation rules, the transport
//! agnostic error payload and the persistence port. Nothing here knows about
//! HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: error payload shared by every adapter.
//! - Student, StudentDraft, StudentId: the record and its validated fields.
//! - TraceId: request-scoped correlation identifier.
//! - ports::StudentRepository: persistence port.

pub mod error;
pub mod ports;
pub mod student;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::student::{
    FieldRule, FieldViolation, Student, StudentDraft, StudentField, StudentId,
    StudentValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
