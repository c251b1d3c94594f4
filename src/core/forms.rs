// Form-level gates the presentation layer runs before calling a repository mutator.

use crate::core::duplicates::{check_student_duplicates, course_name_taken};
use crate::core::validators::{validate_email, validate_gsm, validate_score};
use crate::domain::model::{Course, CourseDraft, ExamResultDraft, Student, StudentDraft};
use crate::utils::error::{ErrorKind, Field, FieldErrors};

fn required() -> FieldErrors {
    FieldErrors::from([(Field::General, ErrorKind::Required)])
}

/// Checks a student form. `editing` names the record being edited, which is
/// left out of the duplicate checks.
///
/// A blank field short-circuits to a single `general` error; otherwise field
/// errors and duplicate collisions are reported together.
pub fn validate_student_form(
    draft: &StudentDraft,
    students: &[Student],
    editing: Option<u64>,
) -> FieldErrors {
    let blank = [
        &draft.full_name,
        &draft.number,
        &draft.email,
        &draft.gsm_number,
    ]
    .iter()
    .any(|value| value.trim().is_empty());
    if blank {
        return required();
    }

    let mut errors = FieldErrors::new();
    if let Err(kind) = validate_email(&draft.email) {
        errors.insert(Field::Email, kind);
    }
    if let Err(kind) = validate_gsm(&draft.gsm_number) {
        errors.insert(Field::GsmNumber, kind);
    }
    errors.extend(check_student_duplicates(draft, students, editing));
    errors
}

/// Checks a course form. Name collisions are only rejected when editing an
/// existing course; new courses may repeat a name.
pub fn validate_course_form(
    draft: &CourseDraft,
    courses: &[Course],
    editing: Option<u64>,
) -> FieldErrors {
    if draft.name.trim().is_empty() {
        return FieldErrors::from([(Field::Name, ErrorKind::Required)]);
    }

    let mut errors = FieldErrors::new();
    if editing.is_some() && course_name_taken(&draft.name, courses, editing) {
        errors.insert(Field::Name, ErrorKind::DuplicateCourseName);
    }
    errors
}

/// Checks an exam result form and, when it passes, returns the draft with the
/// parsed score.
pub fn validate_exam_result_form(
    student_id: Option<u64>,
    course_id: Option<u64>,
    score: &str,
    students: &[Student],
    courses: &[Course],
) -> Result<ExamResultDraft, FieldErrors> {
    let (Some(student_id), Some(course_id)) = (student_id, course_id) else {
        return Err(required());
    };
    if score.trim().is_empty() {
        return Err(required());
    }

    let mut errors = FieldErrors::new();
    if !students.iter().any(|s| s.id == student_id) {
        errors.insert(Field::StudentId, ErrorKind::UnknownStudent);
    }
    if !courses.iter().any(|c| c.id == course_id) {
        errors.insert(Field::CourseId, ErrorKind::UnknownCourse);
    }
    let parsed = validate_score(score);
    if let Err(kind) = parsed {
        errors.insert(Field::Score, kind);
    }

    match parsed {
        Ok(score) if errors.is_empty() => Ok(ExamResultDraft {
            student_id,
            course_id,
            score,
        }),
        _ => Err(errors),
    }
}
