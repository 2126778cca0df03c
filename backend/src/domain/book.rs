//! Catalogue book entity.

use crate::domain::{BookId, CategoryId};

/// A catalogue entry for a physical book.
///
/// `available` is derived state: true iff no open loan references this book.
/// Only the lending coordinator mutates it, and only inside the store
/// transaction that creates or closes the matching loan record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Unique identifier.
    pub id: BookId,
    /// Title as shelved.
    pub name: String,
    /// Author as shelved.
    pub author: String,
    /// Category this book belongs to.
    pub category_id: CategoryId,
    /// Whether the book can currently be picked up.
    pub available: bool,
}

impl Book {
    /// Create a new catalogue entry. New books start available.
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: BookId::new(),
            name: name.into(),
            author: author.into(),
            category_id,
            available: true,
        }
    }
}
