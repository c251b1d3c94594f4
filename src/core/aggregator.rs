use crate::domain::model::{Course, CourseCompletion, CourseProgress, ExamResult};
use std::collections::BTreeMap;

/// Number of scores after which a course counts as completed.
pub const COMPLETION_THRESHOLD: usize = 3;

pub fn round_2_decimals(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn group_by_course(student_id: u64, results: &[ExamResult]) -> BTreeMap<u64, Vec<&ExamResult>> {
    let mut groups: BTreeMap<u64, Vec<&ExamResult>> = BTreeMap::new();
    for result in results.iter().filter(|r| r.student_id == student_id) {
        groups.entry(result.course_id).or_default().push(result);
    }
    groups
}

/// Courses `student_id` has completed, ordered by course id.
///
/// Scores keep insertion order. Groups whose course can no longer be found
/// are skipped.
pub fn completed_courses(
    student_id: u64,
    results: &[ExamResult],
    courses: &[Course],
) -> Vec<CourseCompletion> {
    group_by_course(student_id, results)
        .into_iter()
        .filter(|(_, group)| group.len() >= COMPLETION_THRESHOLD)
        .filter_map(|(course_id, group)| {
            let Some(course) = courses.iter().find(|c| c.id == course_id) else {
                tracing::warn!(
                    "Student {} has results for unknown course {}, skipping",
                    student_id,
                    course_id
                );
                return None;
            };

            let scores: Vec<f64> = group.iter().map(|r| r.score).collect();
            let average = scores.iter().sum::<f64>() / scores.len() as f64;

            Some(CourseCompletion {
                course: course.clone(),
                scores,
                average: round_2_decimals(average),
            })
        })
        .collect()
}

/// Every course the student has at least one result in, completed or not.
pub fn course_progress(
    student_id: u64,
    results: &[ExamResult],
    courses: &[Course],
) -> Vec<CourseProgress> {
    group_by_course(student_id, results)
        .into_iter()
        .map(|(course_id, group)| {
            let count = group.len();
            CourseProgress {
                course_id,
                course_name: courses
                    .iter()
                    .find(|c| c.id == course_id)
                    .map(|c| c.name.clone()),
                results: group.into_iter().cloned().collect(),
                completed: count >= COMPLETION_THRESHOLD,
                remaining: COMPLETION_THRESHOLD.saturating_sub(count),
            }
        })
        .collect()
}
