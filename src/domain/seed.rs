// First-run datasets, used when a collection has nothing stored or fails to load.

use crate::domain::model::{Course, ExamResult, Student};

fn student(id: u64, full_name: &str, number: &str, email: &str, gsm_number: &str) -> Student {
    Student {
        id,
        full_name: full_name.to_string(),
        number: number.to_string(),
        email: email.to_string(),
        gsm_number: gsm_number.to_string(),
    }
}

pub fn students() -> Vec<Student> {
    vec![
        student(1, "Ahmet Yılmaz", "2021001", "ahmet@example.com", "05551234567"),
        student(2, "Ayşe Demir", "2021002", "ayse@example.com", "05559876543"),
        student(3, "Mehmet Kaya", "2021003", "mehmet@example.com", "05555555555"),
    ]
}

pub fn courses() -> Vec<Course> {
    ["Matematik", "Fizik", "Kimya", "Biyoloji"]
        .iter()
        .enumerate()
        .map(|(i, name)| Course {
            id: i as u64 + 1,
            name: name.to_string(),
        })
        .collect()
}

pub fn exam_results() -> Vec<ExamResult> {
    let rows: [(u64, u64, f64); 12] = [
        (1, 1, 85.0),
        (1, 1, 90.0),
        (1, 1, 88.0),
        (1, 2, 75.0),
        (1, 2, 80.0),
        (1, 2, 82.0),
        (2, 1, 95.0),
        (2, 1, 92.0),
        (2, 1, 98.0),
        (2, 3, 88.0),
        (2, 3, 85.0),
        (2, 3, 90.0),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, &(student_id, course_id, score))| ExamResult {
            id: i as u64 + 1,
            student_id,
            course_id,
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_results_reference_seed_entities() {
        let students = students();
        let courses = courses();

        for result in exam_results() {
            assert!(students.iter().any(|s| s.id == result.student_id));
            assert!(courses.iter().any(|c| c.id == result.course_id));
        }
    }
}
