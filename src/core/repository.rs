use crate::core::aggregator;
use crate::domain::model::{
    Collection, Course, CourseCompletion, CourseDraft, CourseProgress, ExamResult,
    ExamResultDraft, Student, StudentDraft,
};
use crate::domain::ports::{ChangeEvent, ChangeKind, ChangeListener, Storage};
use crate::domain::seed;
use crate::utils::error::{EdulistError, Result};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

fn next_id(collection: Collection, ids: impl Iterator<Item = u64>) -> Result<u64> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(EdulistError::IdExhausted { collection })
}

fn fallback<T>(use_seed: bool, seed: fn() -> Vec<T>) -> Vec<T> {
    if use_seed {
        seed()
    } else {
        Vec::new()
    }
}

/// Owns the students, courses and exam results.
///
/// Mutators do not validate their input (see `core::forms`). Each applied
/// mutation writes the affected collection to storage, then notifies
/// listeners. Storage failures are logged and never returned; the in-memory
/// collections stay authoritative.
pub struct Repository<S: Storage> {
    storage: S,
    students: Vec<Student>,
    courses: Vec<Course>,
    exam_results: Vec<ExamResult>,
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_listener: u64,
}

impl<S: Storage> Repository<S> {
    /// Loads every collection from `storage`.
    ///
    /// A collection with nothing stored, or whose payload cannot be read,
    /// falls back to the built-in seed (or to empty when `use_seed` is false) and
    /// the fallback is written back.
    pub fn load(storage: S, use_seed: bool) -> Self {
        let mut fallbacks = Vec::new();

        let students = load_collection(&storage, Collection::Students).unwrap_or_else(|| {
            fallbacks.push(Collection::Students);
            fallback(use_seed, seed::students)
        });
        let courses = load_collection(&storage, Collection::Courses).unwrap_or_else(|| {
            fallbacks.push(Collection::Courses);
            fallback(use_seed, seed::courses)
        });
        let exam_results =
            load_collection(&storage, Collection::ExamResults).unwrap_or_else(|| {
                fallbacks.push(Collection::ExamResults);
                fallback(use_seed, seed::exam_results)
            });

        let mut repository = Self::from_parts(storage, students, courses, exam_results);
        for collection in fallbacks {
            repository.persist(collection);
        }

        tracing::info!(
            "Loaded {} students, {} courses, {} exam results",
            repository.students.len(),
            repository.courses.len(),
            repository.exam_results.len()
        );
        repository
    }

    /// Wraps already-loaded collections without touching storage.
    pub fn from_parts(
        storage: S,
        students: Vec<Student>,
        courses: Vec<Course>,
        exam_results: Vec<ExamResult>,
    ) -> Self {
        Self {
            storage,
            students,
            courses,
            exam_results,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // Students

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, id: u64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn add_student(&mut self, draft: StudentDraft) -> Result<Student> {
        let id = next_id(Collection::Students, self.students.iter().map(|s| s.id))?;
        let student = draft.into_student(id);
        self.students.push(student.clone());
        tracing::info!("Added student {} ({})", student.id, student.full_name);
        self.commit(Collection::Students, ChangeKind::Added, student.id);
        Ok(student)
    }

    /// Replaces every field of student `id`. Returns false, changing nothing,
    /// when there is no such student.
    pub fn update_student(&mut self, id: u64, draft: StudentDraft) -> bool {
        let Some(slot) = self.students.iter_mut().find(|s| s.id == id) else {
            tracing::debug!("Update skipped: student {} not found", id);
            return false;
        };
        *slot = draft.into_student(id);
        tracing::info!("Updated student {}", id);
        self.commit(Collection::Students, ChangeKind::Updated, id);
        true
    }

    /// Removes the student and every exam result recorded for them.
    pub fn delete_student(&mut self, id: u64) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        if self.students.len() == before {
            return false;
        }
        tracing::info!("Deleted student {}", id);
        self.commit(Collection::Students, ChangeKind::Deleted, id);
        self.cascade(|r| r.student_id == id);
        true
    }

    pub fn search_students(&self, term: &str) -> Vec<&Student> {
        let needle = term.to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                s.full_name.to_lowercase().contains(&needle)
                    || s.number.to_lowercase().contains(&needle)
                    || s.email.to_lowercase().contains(&needle)
                    || s.gsm_number.contains(term)
            })
            .collect()
    }

    // Courses

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: u64) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn add_course(&mut self, draft: CourseDraft) -> Result<Course> {
        let id = next_id(Collection::Courses, self.courses.iter().map(|c| c.id))?;
        let course = draft.into_course(id);
        self.courses.push(course.clone());
        tracing::info!("Added course {} ({})", course.id, course.name);
        self.commit(Collection::Courses, ChangeKind::Added, course.id);
        Ok(course)
    }

    pub fn update_course(&mut self, id: u64, draft: CourseDraft) -> bool {
        let Some(slot) = self.courses.iter_mut().find(|c| c.id == id) else {
            tracing::debug!("Update skipped: course {} not found", id);
            return false;
        };
        *slot = draft.into_course(id);
        tracing::info!("Updated course {}", id);
        self.commit(Collection::Courses, ChangeKind::Updated, id);
        true
    }

    /// Removes the course and every exam result recorded against it.
    pub fn delete_course(&mut self, id: u64) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != id);
        if self.courses.len() == before {
            return false;
        }
        tracing::info!("Deleted course {}", id);
        self.commit(Collection::Courses, ChangeKind::Deleted, id);
        self.cascade(|r| r.course_id == id);
        true
    }

    // Exam results

    pub fn exam_results(&self) -> &[ExamResult] {
        &self.exam_results
    }

    pub fn results_for_student(&self, student_id: u64) -> Vec<&ExamResult> {
        self.exam_results
            .iter()
            .filter(|r| r.student_id == student_id)
            .collect()
    }

    pub fn exam_count_for_student(&self, student_id: u64) -> usize {
        self.exam_results
            .iter()
            .filter(|r| r.student_id == student_id)
            .count()
    }

    pub fn exam_count_for_course(&self, course_id: u64) -> usize {
        self.exam_results
            .iter()
            .filter(|r| r.course_id == course_id)
            .count()
    }

    /// Records a score. The student and course must exist at this point.
    pub fn add_exam_result(&mut self, draft: ExamResultDraft) -> Result<ExamResult> {
        if self.student(draft.student_id).is_none() {
            return Err(EdulistError::MissingReference {
                entity: "Student",
                id: draft.student_id,
            });
        }
        if self.course(draft.course_id).is_none() {
            return Err(EdulistError::MissingReference {
                entity: "Course",
                id: draft.course_id,
            });
        }

        let id = next_id(
            Collection::ExamResults,
            self.exam_results.iter().map(|r| r.id),
        )?;
        let result = draft.into_exam_result(id);
        self.exam_results.push(result.clone());
        tracing::info!(
            "Recorded score {} for student {} in course {}",
            result.score,
            result.student_id,
            result.course_id
        );
        self.commit(Collection::ExamResults, ChangeKind::Added, result.id);
        Ok(result)
    }

    pub fn delete_exam_result(&mut self, id: u64) -> bool {
        let before = self.exam_results.len();
        self.exam_results.retain(|r| r.id != id);
        if self.exam_results.len() == before {
            return false;
        }
        tracing::info!("Deleted exam result {}", id);
        self.commit(Collection::ExamResults, ChangeKind::Deleted, id);
        true
    }

    // Aggregates

    pub fn completed_courses(&self, student_id: u64) -> Vec<CourseCompletion> {
        aggregator::completed_courses(student_id, &self.exam_results, &self.courses)
    }

    pub fn course_progress(&self, student_id: u64) -> Vec<CourseProgress> {
        aggregator::course_progress(student_id, &self.exam_results, &self.courses)
    }

    fn cascade(&mut self, matches: impl Fn(&ExamResult) -> bool) {
        let (removed, kept): (Vec<ExamResult>, Vec<ExamResult>) =
            std::mem::take(&mut self.exam_results)
                .into_iter()
                .partition(|r| matches(r));
        self.exam_results = kept;

        if removed.is_empty() {
            return;
        }
        tracing::info!("Cascade removed {} exam results", removed.len());
        self.persist(Collection::ExamResults);
        for result in &removed {
            self.notify(&ChangeEvent {
                collection: Collection::ExamResults,
                kind: ChangeKind::Cascaded,
                id: result.id,
            });
        }
    }

    fn commit(&mut self, collection: Collection, kind: ChangeKind, id: u64) {
        self.persist(collection);
        self.notify(&ChangeEvent {
            collection,
            kind,
            id,
        });
    }

    fn persist(&mut self, collection: Collection) {
        let key = collection.storage_key();
        let payload = match collection {
            Collection::Students => serde_json::to_string(&self.students),
            Collection::Courses => serde_json::to_string(&self.courses),
            Collection::ExamResults => serde_json::to_string(&self.exam_results),
        };

        let written = payload
            .map_err(EdulistError::from)
            .and_then(|json| self.storage.set_item(key, &json));
        match written {
            Ok(()) => tracing::debug!("Saved {} to '{}'", collection, key),
            Err(e) => tracing::error!("Error saving {} to '{}': {}", collection, key, e),
        }
    }

    fn notify(&mut self, event: &ChangeEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

fn load_collection<S, T>(storage: &S, collection: Collection) -> Option<Vec<T>>
where
    S: Storage,
    T: DeserializeOwned,
{
    let key = collection.storage_key();
    match storage.get_item(key) {
        Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
            Ok(items) => {
                tracing::debug!("Loaded {} from '{}'", collection, key);
                Some(items)
            }
            Err(e) => {
                tracing::error!("Error loading {} from '{}': {}", collection, key, e);
                None
            }
        },
        Ok(_) => {
            tracing::debug!("Nothing stored under '{}', using defaults", key);
            None
        }
        Err(e) => {
            tracing::error!("Error loading {} from '{}': {}", collection, key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_repo() -> Repository<MemoryStorage> {
        Repository::load(MemoryStorage::new(), false)
    }

    fn draft(n: u32) -> StudentDraft {
        StudentDraft {
            full_name: format!("Student {}", n),
            number: format!("20240{}", n),
            email: format!("s{}@example.com", n),
            gsm_number: format!("0555000000{}", n),
        }
    }

    #[test]
    fn test_first_id_is_one() {
        let mut repo = empty_repo();
        assert_eq!(repo.add_student(draft(1)).unwrap().id, 1);
        assert_eq!(repo.add_course(CourseDraft { name: "Art".into() }).unwrap().id, 1);
    }

    #[test]
    fn test_new_id_follows_max_despite_gaps() {
        let students = vec![draft(1).into_student(3), draft(2).into_student(7)];
        let mut repo = Repository::from_parts(MemoryStorage::new(), students, vec![], vec![]);

        assert_eq!(repo.add_student(draft(3)).unwrap().id, 8);
        repo.delete_student(8);
        assert_eq!(repo.add_student(draft(4)).unwrap().id, 8);
    }

    #[test]
    fn test_add_after_largest_id_is_refused() {
        let students = vec![draft(1).into_student(u64::MAX)];
        let mut repo = Repository::from_parts(MemoryStorage::new(), students, vec![], vec![]);

        let err = repo.add_student(draft(2)).unwrap_err();
        assert!(matches!(
            err,
            EdulistError::IdExhausted {
                collection: Collection::Students
            }
        ));
        assert_eq!(repo.students().len(), 1);
        assert_eq!(repo.storage().get_item("edulist_students").unwrap(), None);
    }

    #[test]
    fn test_fallback_respects_seed_flag() {
        assert_eq!(fallback(true, seed::courses), seed::courses());
        assert!(fallback(false, seed::courses).is_empty());
    }

    #[test]
    fn test_update_missing_student_is_noop() {
        let mut repo = empty_repo();
        repo.add_student(draft(1)).unwrap();
        let saved = repo.storage().get_item("edulist_students").unwrap();

        assert!(!repo.update_student(99, draft(2)));
        assert_eq!(repo.students().len(), 1);
        assert_eq!(repo.storage().get_item("edulist_students").unwrap(), saved);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let mut repo = empty_repo();
        let student = repo.add_student(draft(1)).unwrap();

        assert!(repo.update_student(student.id, draft(2)));
        assert_eq!(repo.student(student.id), Some(&draft(2).into_student(student.id)));
    }

    #[test]
    fn test_exam_result_requires_existing_references() {
        let mut repo = empty_repo();
        let student = repo.add_student(draft(1)).unwrap();

        let err = repo
            .add_exam_result(ExamResultDraft {
                student_id: student.id,
                course_id: 5,
                score: 50.0,
            })
            .unwrap_err();
        assert!(matches!(err, EdulistError::MissingReference { entity: "Course", id: 5 }));
        assert!(repo.exam_results().is_empty());
    }

    #[test]
    fn test_search_students() {
        let repo = Repository::load(MemoryStorage::new(), true);

        assert_eq!(repo.search_students("").len(), 3);
        assert_eq!(repo.search_students("AYŞE")[0].id, 2);
        assert_eq!(repo.search_students("2021003")[0].id, 3);
        assert_eq!(repo.search_students("mehmet@")[0].id, 3);
        assert_eq!(repo.search_students("0555987").len(), 1);
        assert!(repo.search_students("nobody").is_empty());
    }

    #[test]
    fn test_listeners_receive_events_until_unsubscribed() {
        let mut repo = Repository::load(MemoryStorage::new(), true);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = repo.subscribe(move |event| sink.borrow_mut().push(*event));

        repo.delete_course(3);
        assert_eq!(
            events.borrow()[0],
            ChangeEvent {
                collection: Collection::Courses,
                kind: ChangeKind::Deleted,
                id: 3
            }
        );
        let cascaded: Vec<u64> = events.borrow()[1..].iter().map(|e| e.id).collect();
        assert_eq!(cascaded, vec![10, 11, 12]);

        assert!(repo.unsubscribe(id));
        repo.delete_course(4);
        assert_eq!(events.borrow().len(), 4);
    }
}
