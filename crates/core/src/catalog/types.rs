//! Types for the book catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Earliest publication year accepted by `add`.
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// Book genre. Closed set; the labels are what the backing file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Genre {
    Fiction,
    NonFiction,
    Science,
    Fantasy,
    Biography,
    History,
    SelfHelp,
    Art,
    Poetry,
    Technology,
    Romance,
    Others,
}

impl Genre {
    /// Every genre, in the order a form should offer them.
    pub const ALL: [Genre; 12] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::Fantasy,
        Genre::Biography,
        Genre::History,
        Genre::SelfHelp,
        Genre::Art,
        Genre::Poetry,
        Genre::Technology,
        Genre::Romance,
        Genre::Others,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Science => "Science",
            Genre::Fantasy => "Fantasy",
            Genre::Biography => "Biography",
            Genre::History => "History",
            Genre::SelfHelp => "Self-Help",
            Genre::Art => "Art",
            Genre::Poetry => "Poetry",
            Genre::Technology => "Technology",
            Genre::Romance => "Romance",
            Genre::Others => "Others",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        // Older library files use the singular label. It is written back
        // as "Others" on the next save.
        if wanted.eq_ignore_ascii_case("other") {
            return Ok(Genre::Others);
        }
        Genre::ALL
            .iter()
            .copied()
            .find(|genre| genre.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownGenre(s.to_string()))
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Genre {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A book in the catalog, exactly as it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: Genre,
    /// `true` once the book has been read.
    pub read_status: bool,
    /// Set when the book is added; never changed afterwards.
    #[serde(with = "added_date_format")]
    pub added_date: NaiveDateTime,
}

/// `added_date` is stored as local wall-clock time, second precision.
pub mod added_date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Request to add a book. Fields are raw user input until validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    #[serde(default)]
    pub read_status: bool,
}

/// A book together with its current position in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedBook {
    pub index: usize,
    pub book: Book,
}

/// Field matched by `search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    Title,
    Author,
    Genre,
}

impl SearchField {
    /// The text of `book` this field selects.
    pub fn value<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
            SearchField::Genre => book.genre.label(),
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "genre" => Ok(SearchField::Genre),
            other => Err(format!(
                "unknown search field '{}', expected title, author or genre",
                other
            )),
        }
    }
}

/// Catalog statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Total books in the catalog.
    pub total: usize,
    /// Books marked as read.
    pub read: usize,
    /// Books not yet read.
    pub unread: usize,
    /// `read / total * 100`, or 0 for an empty catalog.
    pub read_percent: f64,
    /// Book count per genre label; genres with no books are omitted.
    pub by_genre: BTreeMap<String, usize>,
}

/// What `load` found in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// No backing file yet; the catalog starts empty.
    Missing,
    /// The file was parsed successfully.
    Loaded { count: usize },
    /// The file could not be parsed and the catalog was reset to empty.
    Recovered {
        reason: String,
        /// Copy of the unreadable file, if one was written.
        #[serde(skip_serializing_if = "Option::is_none")]
        backup: Option<PathBuf>,
    },
}

impl LoadOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered { .. })
    }
}

/// Rejection reasons for `add`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("author must not be empty")]
    EmptyAuthor,

    #[error("publication year {year} must be between 1000 and {max}")]
    YearOutOfRange { year: i32, max: i32 },

    #[error("unknown genre '{0}'")]
    UnknownGenre(String),
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_book() -> Book {
        Book {
            title: "The Great Gatsby".to_string(),
            author: "F. Scott Fitzgerald".to_string(),
            publication_year: 1925,
            genre: Genre::Fiction,
            read_status: true,
            added_date: NaiveDate::from_ymd_opt(2025, 3, 14)
                .unwrap()
                .and_hms_opt(9, 26, 53)
                .unwrap(),
        }
    }

    #[test]
    fn test_genre_labels_parse_back() {
        for genre in Genre::ALL {
            assert_eq!(genre.label().parse::<Genre>().unwrap(), genre);
        }
    }

    #[test]
    fn test_genre_parse_is_case_insensitive() {
        assert_eq!("non-fiction".parse::<Genre>().unwrap(), Genre::NonFiction);
        assert_eq!("  SELF-HELP ".parse::<Genre>().unwrap(), Genre::SelfHelp);
    }

    #[test]
    fn test_genre_accepts_singular_other() {
        assert_eq!("Other".parse::<Genre>().unwrap(), Genre::Others);
    }

    #[test]
    fn test_genre_rejects_unknown() {
        let err = "Cookbook".parse::<Genre>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownGenre("Cookbook".to_string()));
    }

    #[test]
    fn test_book_serialization_matches_file_format() {
        let json = serde_json::to_value(sample_book()).unwrap();
        assert_eq!(json["title"], "The Great Gatsby");
        assert_eq!(json["publication_year"], 1925);
        assert_eq!(json["genre"], "Fiction");
        assert_eq!(json["read_status"], true);
        assert_eq!(json["added_date"], "2025-03-14 09:26:53");
    }

    #[test]
    fn test_book_deserializes_legacy_record() {
        let json = r#"{
            "title": "Dune",
            "author": "Frank Herbert",
            "publication_year": 1965,
            "genre": "Other",
            "read_status": false,
            "added_date": "2024-11-02 18:00:01"
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.genre, Genre::Others);
        assert!(!book.read_status);
        assert_eq!(book.added_date.to_string(), "2024-11-02 18:00:01");
    }

    #[test]
    fn test_book_rejects_bad_date() {
        let json = r#"{
            "title": "Dune",
            "author": "Frank Herbert",
            "publication_year": 1965,
            "genre": "Fiction",
            "read_status": false,
            "added_date": "yesterday"
        }"#;
        assert!(serde_json::from_str::<Book>(json).is_err());
    }

    #[test]
    fn test_search_field_parse() {
        assert_eq!("title".parse::<SearchField>().unwrap(), SearchField::Title);
        assert_eq!("Author".parse::<SearchField>().unwrap(), SearchField::Author);
        assert_eq!("GENRE".parse::<SearchField>().unwrap(), SearchField::Genre);
        assert!("isbn".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_search_field_value() {
        let book = sample_book();
        assert_eq!(SearchField::Title.value(&book), "The Great Gatsby");
        assert_eq!(SearchField::Author.value(&book), "F. Scott Fitzgerald");
        assert_eq!(SearchField::Genre.value(&book), "Fiction");
    }

    #[test]
    fn test_load_outcome_serialization() {
        let json = serde_json::to_value(LoadOutcome::Loaded { count: 3 }).unwrap();
        assert_eq!(json["type"], "loaded");
        assert_eq!(json["count"], 3);

        let json = serde_json::to_value(LoadOutcome::Recovered {
            reason: "bad".to_string(),
            backup: None,
        })
        .unwrap();
        assert_eq!(json["type"], "recovered");
        assert!(json.get("backup").is_none());
    }

    #[test]
    fn test_new_book_read_status_defaults_to_unread() {
        let json = r#"{"title": "A", "author": "B", "publication_year": 2000, "genre": "Art"}"#;
        let new_book: NewBook = serde_json::from_str(json).unwrap();
        assert!(!new_book.read_status);
    }
}
