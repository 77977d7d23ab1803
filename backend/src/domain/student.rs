//! Student record model and its validation rules.
//!
//! A [`StudentDraft`] can only be built through
//! [`StudentDraft::try_from_parts`], so every create or update that reaches a
//! store has already passed the presence rules below:
//!
//! - `name` and `email` must be present and non-empty. Whitespace counts as
//!   content.
//! - `age` must be present and non-zero, and must fit the 32-bit column.
//!
//! Zero is treated as "absent" for `age`. Newborn records are therefore
//! rejected; see DESIGN.md before relaxing this.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store when a student is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(i64);

impl StudentId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for StudentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for StudentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// Student fields subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
    Age,
}

impl StudentField {
    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
        }
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Missing, empty, or (for `age`) zero.
    Required,
    /// Outside the range the store can hold.
    OutOfRange,
}

impl FieldRule {
    /// Stable machine-readable rule code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// A single failed field check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: StudentField,
    pub rule: FieldRule,
}

impl FieldViolation {
    const fn new(field: StudentField, rule: FieldRule) -> Self {
        Self { field, rule }
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        match self.rule {
            FieldRule::Required => format!("{} is required", self.field),
            FieldRule::OutOfRange => format!(
                "{} must be between {} and {}",
                self.field,
                i32::MIN,
                i32::MAX
            ),
        }
    }
}

/// Every field check that failed for one payload, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentValidationError {
    violations: Vec<FieldViolation>,
}

impl StudentValidationError {
    /// The failed checks. Never empty.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether `field` failed any check.
    pub fn has_field(&self, field: StudentField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(FieldViolation::message).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for StudentValidationError {}

/// Validated field set for creating or replacing a student.
///
/// # Examples
/// ```
/// use students::domain::StudentDraft;
///
/// let draft = StudentDraft::try_from_parts(
///     Some("Ada".to_owned()),
///     Some("ada@example.com".to_owned()),
///     Some(36),
/// )
/// .expect("valid draft");
/// assert_eq!(draft.age(), 36);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    name: String,
    email: String,
    age: i32,
}

fn required_text(
    value: Option<String>,
    field: StudentField,
    violations: &mut Vec<FieldViolation>,
) -> String {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => {
            violations.push(FieldViolation::new(field, FieldRule::Required));
            String::new()
        }
    }
}

fn required_age(value: Option<i64>, violations: &mut Vec<FieldViolation>) -> i32 {
    match value {
        None | Some(0) => {
            violations.push(FieldViolation::new(StudentField::Age, FieldRule::Required));
            0
        }
        Some(raw) => i32::try_from(raw).unwrap_or_else(|_| {
            violations.push(FieldViolation::new(StudentField::Age, FieldRule::OutOfRange));
            0
        }),
    }
}

impl StudentDraft {
    /// Validate raw payload fields, reporting every violation at once.
    pub fn try_from_parts(
        name: Option<String>,
        email: Option<String>,
        age: Option<i64>,
    ) -> Result<Self, StudentValidationError> {
        let mut violations = Vec::new();
        let name = required_text(name, StudentField::Name, &mut violations);
        let email = required_text(email, StudentField::Email, &mut violations);
        let age = required_age(age, &mut violations);

        if violations.is_empty() {
            Ok(Self { name, email, age })
        } else {
            Err(StudentValidationError { violations })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// A persisted student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    fields: StudentDraft,
}

impl Student {
    /// Pair a store-assigned identifier with validated fields.
    #[must_use]
    pub fn new(id: StudentId, fields: StudentDraft) -> Self {
        Self { id, fields }
    }

    /// Rebuild a record exactly as a store holds it.
    ///
    /// Stored rows are not revalidated: a row written by an older schema or
    /// another tool is still returned rather than failing the whole read.
    #[must_use]
    pub fn from_stored(id: StudentId, name: String, email: String, age: i32) -> Self {
        Self {
            id,
            fields: StudentDraft { name, email, age },
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.fields.name()
    }

    pub fn email(&self) -> &str {
        self.fields.email()
    }

    pub fn age(&self) -> i32 {
        self.fields.age()
    }

    /// The mutable part of the record.
    pub fn fields(&self) -> &StudentDraft {
        &self.fields
    }
}
