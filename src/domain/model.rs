use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub full_name: String,
    pub number: String,
    pub email: String,
    pub gsm_number: String,
}

/// Student fields as entered on a form, before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub full_name: String,
    pub number: String,
    pub email: String,
    pub gsm_number: String,
}

impl StudentDraft {
    pub fn into_student(self, id: u64) -> Student {
        Student {
            id,
            full_name: self.full_name,
            number: self.number,
            email: self.email,
            gsm_number: self.gsm_number,
        }
    }
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            full_name: student.full_name.clone(),
            number: student.number.clone(),
            email: student.email.clone(),
            gsm_number: student.gsm_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub name: String,
}

impl CourseDraft {
    pub fn into_course(self, id: u64) -> Course {
        Course {
            id,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: u64,
    pub student_id: u64,
    pub course_id: u64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamResultDraft {
    pub student_id: u64,
    pub course_id: u64,
    pub score: f64,
}

impl ExamResultDraft {
    pub fn into_exam_result(self, id: u64) -> ExamResult {
        ExamResult {
            id,
            student_id: self.student_id,
            course_id: self.course_id,
            score: self.score,
        }
    }
}

/// A course a student has finished: at least three scores recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCompletion {
    pub course: Course,
    pub scores: Vec<f64>,
    pub average: f64,
}

impl CourseCompletion {
    pub fn average_display(&self) -> String {
        format!("{:.2}", self.average)
    }
}

/// Every result a student has for one course, finished or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProgress {
    pub course_id: u64,
    pub course_name: Option<String>,
    pub results: Vec<ExamResult>,
    pub completed: bool,
    pub remaining: usize,
}

/// The three independently persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Students,
    Courses,
    ExamResults,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Students,
        Collection::Courses,
        Collection::ExamResults,
    ];

    /// Fixed storage key the collection is saved under.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Collection::Students => "edulist_students",
            Collection::Courses => "edulist_courses",
            Collection::ExamResults => "edulist_examResults",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Students => "students",
            Collection::Courses => "courses",
            Collection::ExamResults => "exam results",
        };
        f.write_str(name)
    }
}
