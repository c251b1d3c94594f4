pub mod aggregator;
pub mod duplicates;
pub mod forms;
pub mod report;
pub mod repository;
pub mod roster;
pub mod validators;

pub use crate::domain::model::{
    Collection, Course, CourseCompletion, CourseDraft, CourseProgress, ExamResult,
    ExamResultDraft, Student, StudentDraft,
};
pub use crate::domain::ports::{ChangeEvent, ChangeKind, Storage};
pub use crate::utils::error::Result;
