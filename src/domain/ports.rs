use crate::domain::model::Collection;
use crate::utils::error::Result;

/// Key/value persistence the repository saves its collections into.
///
/// `get_item` returns `Ok(None)` when nothing has been stored under `key` yet.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
    /// Exam results removed because their student or course was deleted.
    Cascaded,
}

/// Emitted to listeners after a mutation has been applied and persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: u64,
}

pub type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;
