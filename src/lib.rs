pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::{FileStorage, MemoryStorage};
pub use config::AppSettings;
pub use crate::core::{repository::Repository, roster::Roster};
pub use utils::error::{EdulistError, ErrorKind, Field, FieldErrors, Result};
