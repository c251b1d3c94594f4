use crate::domain::model::Collection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Per-field validation outcome surfaced to the presentation layer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[error("Value cannot be empty")]
    Empty,

    #[error("Value is too long")]
    TooLong,

    #[error("Email address must contain an @ sign")]
    MissingAt,

    #[error("Please enter a valid email address")]
    InvalidFormat,

    #[error("Email address needs at least one character before the @ sign")]
    NoLocalPart,

    #[error("Email address needs a domain after the @ sign")]
    NoDomain,

    #[error("Email domain must contain a dot (.)")]
    NoDot,

    #[error("Domain extension must be at least 2 characters (e.g. .com, .edu)")]
    InvalidDomainExt,

    #[error("Email address contains invalid characters")]
    InvalidChars,

    #[error("Score must be between 0 and 100")]
    OutOfRange,

    #[error("A student with this full name already exists")]
    DuplicateName,

    #[error("A student with this number already exists")]
    DuplicateNumber,

    #[error("A student with this email address already exists")]
    DuplicateEmail,

    #[error("A student with this GSM number already exists")]
    DuplicateGsm,

    #[error("Please fill in all fields")]
    Required,

    #[error("A course with this name already exists")]
    DuplicateCourseName,

    #[error("Selected student does not exist")]
    UnknownStudent,

    #[error("Selected course does not exist")]
    UnknownCourse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Number,
    Email,
    GsmNumber,
    Name,
    StudentId,
    CourseId,
    Score,
    General,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Number => "number",
            Field::Email => "email",
            Field::GsmNumber => "gsm_number",
            Field::Name => "name",
            Field::StudentId => "student_id",
            Field::CourseId => "course_id",
            Field::Score => "score",
            Field::General => "general",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FieldErrors = BTreeMap<Field, ErrorKind>;

fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, kind)| format!("{}: {}", field, kind))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum EdulistError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Storage error for '{key}': {message}")]
    StorageError { key: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: u64 },

    #[error("No identifier left for a new entry in {collection}")]
    IdExhausted { collection: Collection },

    #[error("Validation failed: {}", describe(.0))]
    Validation(FieldErrors),
}

impl EdulistError {
    /// Field errors carried by a rejected form, if this is one.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            EdulistError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EdulistError>;
