//! Read-only views computed over a slice of books.

use std::collections::BTreeMap;

use super::{Book, CatalogStats, IndexedBook, SearchField};

/// Case-insensitive substring search over one field, preserving order.
///
/// A blank term matches nothing. Otherwise the term is matched as given,
/// surrounding whitespace included.
pub fn search_books(books: &[Book], term: &str, field: SearchField) -> Vec<IndexedBook> {
    if term.trim().is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();

    books
        .iter()
        .enumerate()
        .filter(|(_, book)| field.value(book).to_lowercase().contains(&needle))
        .map(|(index, book)| IndexedBook {
            index,
            book: book.clone(),
        })
        .collect()
}

/// Read/unread counts and per-genre breakdown.
pub fn compute_stats(books: &[Book]) -> CatalogStats {
    let total = books.len();
    let read = books.iter().filter(|book| book.read_status).count();
    let read_percent = if total == 0 {
        0.0
    } else {
        read as f64 / total as f64 * 100.0
    };

    let mut by_genre = BTreeMap::new();
    for book in books {
        *by_genre.entry(book.genre.label().to_string()).or_insert(0) += 1;
    }

    CatalogStats {
        total,
        read,
        unread: total - read,
        read_percent,
        by_genre,
    }
}
