//! Field validation for new catalog entries.

use super::{Genre, NewBook, ValidationError, MIN_PUBLICATION_YEAR};

/// A `NewBook` that passed validation, with trimmed text and a parsed genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: Genre,
    pub read_status: bool,
}

/// Check a new book against the catalog's field rules.
///
/// `current_year` is the upper bound for `publication_year`. Fields are
/// checked in form order and the first failure is returned.
pub fn validate_new_book(
    new_book: &NewBook,
    current_year: i32,
) -> Result<ValidatedBook, ValidationError> {
    let title = new_book.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let author = new_book.author.trim();
    if author.is_empty() {
        return Err(ValidationError::EmptyAuthor);
    }

    let year = new_book.publication_year;
    if !(MIN_PUBLICATION_YEAR..=current_year).contains(&year) {
        return Err(ValidationError::YearOutOfRange {
            year,
            max: current_year,
        });
    }

    let genre: Genre = new_book.genre.parse()?;

    Ok(ValidatedBook {
        title: title.to_string(),
        author: author.to_string(),
        publication_year: year,
        genre,
        read_status: new_book.read_status,
    })
}
