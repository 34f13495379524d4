//! Book catalog - the user's library as an ordered list of books.
//!
//! Books are addressed by their position in the list. Every mutation rewrites
//! the whole backing file, so the file is always a snapshot of the in-memory
//! catalog.

mod json;
mod query;
mod types;
mod validate;

pub use json::JsonCatalog;
pub use query::{compute_stats, search_books};
pub use types::*;
pub use validate::{validate_new_book, ValidatedBook};

/// Trait for book catalog storage.
pub trait BookCatalog: Send + Sync {
    /// (Re)load the catalog from its backing store.
    ///
    /// Unparseable content is not an error: the catalog is reset to empty and
    /// the outcome says so.
    fn load(&self) -> Result<LoadOutcome, CatalogError>;

    /// Validate and append a book, then persist.
    ///
    /// Returns the stored record, including its `added_date`.
    fn add(&self, new_book: NewBook) -> Result<Book, CatalogError>;

    /// Remove the book at `index`, then persist.
    ///
    /// Returns `Ok(None)` without touching anything when `index` is out of range.
    fn remove(&self, index: usize) -> Result<Option<Book>, CatalogError>;

    /// Flip the read status of the book at `index`, then persist.
    ///
    /// Returns the updated book, or `Ok(None)` when `index` is out of range.
    fn toggle_read_status(&self, index: usize) -> Result<Option<Book>, CatalogError>;

    /// Case-insensitive substring search on one field. Blank terms match nothing.
    fn search(&self, term: &str, field: SearchField) -> Vec<IndexedBook>;

    /// Read/unread statistics for the current catalog.
    fn statistics(&self) -> CatalogStats;

    /// All books in catalog order.
    fn list(&self) -> Vec<IndexedBook>;

    /// The book at `index`, if any.
    fn get(&self, index: usize) -> Option<Book>;

    /// Number of books in the catalog.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
