use crate::core::validators::{normalize_gsm, validate_email, GSM_MAX_LENGTH};
use crate::domain::model::{Course, Student, StudentDraft};
use crate::utils::error::{ErrorKind, Field, FieldErrors};

fn same_folded(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Reports every field of `candidate` that collides with an existing student.
///
/// `exclude` skips one record, normally the student being edited. All four
/// checks run; nothing short-circuits.
pub fn check_student_duplicates(
    candidate: &StudentDraft,
    students: &[Student],
    exclude: Option<u64>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let others: Vec<&Student> = students
        .iter()
        .filter(|s| Some(s.id) != exclude)
        .collect();

    if others
        .iter()
        .any(|s| same_folded(&s.full_name, &candidate.full_name))
    {
        errors.insert(Field::FullName, ErrorKind::DuplicateName);
    }

    let number = candidate.number.trim();
    if others.iter().any(|s| s.number.trim() == number) {
        errors.insert(Field::Number, ErrorKind::DuplicateNumber);
    }

    // Malformed emails are reported by the email validator instead.
    if validate_email(&candidate.email).is_ok()
        && others.iter().any(|s| same_folded(&s.email, &candidate.email))
    {
        errors.insert(Field::Email, ErrorKind::DuplicateEmail);
    }

    let gsm = normalize_gsm(&candidate.gsm_number);
    if !gsm.is_empty()
        && gsm.len() <= GSM_MAX_LENGTH
        && others.iter().any(|s| normalize_gsm(&s.gsm_number) == gsm)
    {
        errors.insert(Field::GsmNumber, ErrorKind::DuplicateGsm);
    }

    errors
}

/// Case-insensitive, trimmed course name collision, skipping `exclude`.
pub fn course_name_taken(name: &str, courses: &[Course], exclude: Option<u64>) -> bool {
    courses
        .iter()
        .filter(|c| Some(c.id) != exclude)
        .any(|c| same_folded(&c.name, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<Student> {
        vec![Student {
            id: 1,
            full_name: "Ahmet Yılmaz".to_string(),
            number: "2021001".to_string(),
            email: "a@b.com".to_string(),
            gsm_number: "05551234567".to_string(),
        }]
    }

    fn draft(full_name: &str, number: &str, email: &str, gsm: &str) -> StudentDraft {
        StudentDraft {
            full_name: full_name.to_string(),
            number: number.to_string(),
            email: email.to_string(),
            gsm_number: gsm.to_string(),
        }
    }

    #[test]
    fn test_same_number_only() {
        let candidate = draft("Zeynep Ak", "2021001", "zeynep@example.com", "05550000000");
        let errors = check_student_duplicates(&candidate, &existing(), None);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(&Field::Number), Some(&ErrorKind::DuplicateNumber));
    }

    #[test]
    fn test_all_collisions_reported_together() {
        let candidate = draft("  ahmet yılmaz ", " 2021001 ", "A@B.COM", "0555 123 45 67");
        let errors = check_student_duplicates(&candidate, &existing(), None);

        assert_eq!(errors.get(&Field::FullName), Some(&ErrorKind::DuplicateName));
        assert_eq!(errors.get(&Field::Number), Some(&ErrorKind::DuplicateNumber));
        assert_eq!(errors.get(&Field::Email), Some(&ErrorKind::DuplicateEmail));
        assert_eq!(errors.get(&Field::GsmNumber), Some(&ErrorKind::DuplicateGsm));
    }

    #[test]
    fn test_invalid_email_and_gsm_are_not_compared() {
        let mut students = existing();
        students[0].email = "not-an-email".to_string();
        students[0].gsm_number = "1234567890123".to_string();

        let candidate = draft("Other", "999", "not-an-email", "1234567890123");
        let errors = check_student_duplicates(&candidate, &students, None);

        assert!(errors.is_empty());
    }

    #[test]
    fn test_excluded_record_is_ignored() {
        let candidate = StudentDraft::from(&existing()[0]);
        assert!(check_student_duplicates(&candidate, &existing(), Some(1)).is_empty());
        assert_eq!(check_student_duplicates(&candidate, &existing(), None).len(), 4);
    }

    #[test]
    fn test_course_name_taken() {
        let courses = vec![
            Course { id: 1, name: "Matematik".to_string() },
            Course { id: 2, name: "Fizik".to_string() },
        ];

        assert!(course_name_taken(" matematik ", &courses, None));
        assert!(course_name_taken("FIZIK", &courses, Some(1)));
        assert!(!course_name_taken("Fizik", &courses, Some(2)));
        assert!(!course_name_taken("Kimya", &courses, None));
    }
}
