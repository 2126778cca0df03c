//! Book category entity.

use crate::domain::CategoryId;

/// A named grouping of books. Immutable from the lending coordinator's
/// perspective; books reference it by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Display name, e.g. "Sci-Fi".
    pub name: String,
}

impl Category {
    /// Create a new category with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
        }
    }
}
