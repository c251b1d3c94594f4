use crate::core::forms::{validate_course_form, validate_exam_result_form, validate_student_form};
use crate::core::repository::Repository;
use crate::core::validators::{sanitize_gsm, GSM_MAX_LENGTH};
use crate::domain::model::{
    Course, CourseCompletion, CourseDraft, CourseProgress, ExamResult, Student, StudentDraft,
};
use crate::domain::ports::Storage;
use crate::utils::error::{EdulistError, FieldErrors, Result};

fn reject(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Form rejected: {:?}", errors);
        Err(EdulistError::Validation(errors))
    }
}

/// Validate-then-mutate facade over a [`Repository`].
///
/// Validation failures come back as [`EdulistError::Validation`] and leave the
/// repository untouched.
pub struct Roster<S: Storage> {
    repository: Repository<S>,
}

impl<S: Storage> Roster<S> {
    pub fn new(repository: Repository<S>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut Repository<S> {
        &mut self.repository
    }

    pub fn into_repository(self) -> Repository<S> {
        self.repository
    }

    /// Stores a validated student. The GSM number is kept as digits only.
    pub fn register_student(&mut self, mut draft: StudentDraft) -> Result<Student> {
        reject(validate_student_form(&draft, self.repository.students(), None))?;
        draft.gsm_number = sanitize_gsm(&draft.gsm_number, GSM_MAX_LENGTH);
        self.repository.add_student(draft)
    }

    pub fn edit_student(&mut self, id: u64, mut draft: StudentDraft) -> Result<Student> {
        if self.repository.student(id).is_none() {
            return Err(EdulistError::MissingReference {
                entity: "Student",
                id,
            });
        }
        reject(validate_student_form(&draft, self.repository.students(), Some(id)))?;
        draft.gsm_number = sanitize_gsm(&draft.gsm_number, GSM_MAX_LENGTH);
        self.repository.update_student(id, draft.clone());
        Ok(draft.into_student(id))
    }

    pub fn remove_student(&mut self, id: u64) -> Result<()> {
        if !self.repository.delete_student(id) {
            return Err(EdulistError::MissingReference {
                entity: "Student",
                id,
            });
        }
        Ok(())
    }

    pub fn register_course(&mut self, draft: CourseDraft) -> Result<Course> {
        reject(validate_course_form(&draft, self.repository.courses(), None))?;
        self.repository.add_course(draft)
    }

    pub fn edit_course(&mut self, id: u64, draft: CourseDraft) -> Result<Course> {
        if self.repository.course(id).is_none() {
            return Err(EdulistError::MissingReference {
                entity: "Course",
                id,
            });
        }
        reject(validate_course_form(&draft, self.repository.courses(), Some(id)))?;
        self.repository.update_course(id, draft.clone());
        Ok(draft.into_course(id))
    }

    pub fn remove_course(&mut self, id: u64) -> Result<()> {
        if !self.repository.delete_course(id) {
            return Err(EdulistError::MissingReference {
                entity: "Course",
                id,
            });
        }
        Ok(())
    }

    pub fn record_exam_result(
        &mut self,
        student_id: Option<u64>,
        course_id: Option<u64>,
        score: &str,
    ) -> Result<ExamResult> {
        let draft = validate_exam_result_form(
            student_id,
            course_id,
            score,
            self.repository.students(),
            self.repository.courses(),
        )
        .map_err(EdulistError::Validation)?;
        self.repository.add_exam_result(draft)
    }

    pub fn remove_exam_result(&mut self, id: u64) -> Result<()> {
        if !self.repository.delete_exam_result(id) {
            return Err(EdulistError::MissingReference {
                entity: "Exam result",
                id,
            });
        }
        Ok(())
    }

    pub fn completed_courses(&self, student_id: u64) -> Vec<CourseCompletion> {
        self.repository.completed_courses(student_id)
    }

    pub fn course_progress(&self, student_id: u64) -> Vec<CourseProgress> {
        self.repository.course_progress(student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::utils::error::{ErrorKind, Field};

    fn roster() -> Roster<MemoryStorage> {
        Roster::new(Repository::load(MemoryStorage::new(), true))
    }

    #[test]
    fn test_rejected_student_is_not_stored() {
        let mut roster = roster();
        let err = roster
            .register_student(StudentDraft {
                full_name: "Ahmet Yılmaz".into(),
                number: "2021001".into(),
                email: "ahmet@example.com".into(),
                gsm_number: "05551234567".into(),
            })
            .unwrap_err();

        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[&Field::Number], ErrorKind::DuplicateNumber);
        assert_eq!(roster.repository().students().len(), 3);
    }

    #[test]
    fn test_register_student_stores_gsm_digits() {
        let mut roster = roster();
        let student = roster
            .register_student(StudentDraft {
                full_name: "Zeynep Ak".into(),
                number: "2021004".into(),
                email: "zeynep@example.com".into(),
                gsm_number: "+90 (532) 111-22-33".into(),
            })
            .unwrap();

        assert_eq!(student.gsm_number, "905321112233");
        assert_eq!(
            roster.repository().student(student.id).unwrap().gsm_number,
            "905321112233"
        );
    }

    #[test]
    fn test_record_exam_result_parses_score() {
        let mut roster = roster();
        let result = roster.record_exam_result(Some(3), Some(4), "66.6").unwrap();

        assert_eq!(result.id, 13);
        assert_eq!(result.score, 66.6);
    }

    #[test]
    fn test_edit_unknown_course() {
        let mut roster = roster();
        let err = roster
            .edit_course(
                77,
                CourseDraft {
                    name: "Tarih".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EdulistError::MissingReference { id: 77, .. }));
    }

    #[test]
    fn test_edit_course_rename() {
        let mut roster = roster();
        let renamed = roster
            .edit_course(
                2,
                CourseDraft {
                    name: "Fizik II".into(),
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "Fizik II");
        assert_eq!(roster.repository().course(2).unwrap().name, "Fizik II");
    }
}
