use crate::core::repository::Repository;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct CompletionRow<'a> {
    student_id: u64,
    full_name: &'a str,
    number: &'a str,
    course_id: u64,
    course: &'a str,
    scores: String,
    average: String,
}

/// Writes one CSV row per completed (student, course) pair, students in
/// repository order. Returns the number of rows written.
pub fn write_completion_report<S: Storage, W: Write>(
    repository: &Repository<S>,
    writer: W,
) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for student in repository.students() {
        for completion in repository.completed_courses(student.id) {
            let scores = completion
                .scores
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(";");

            csv_writer.serialize(CompletionRow {
                student_id: student.id,
                full_name: &student.full_name,
                number: &student.number,
                course_id: completion.course.id,
                course: &completion.course.name,
                scores,
                average: completion.average_display(),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    tracing::info!("Completion report written with {} rows", rows);
    Ok(rows)
}
