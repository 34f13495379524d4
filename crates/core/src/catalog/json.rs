//! JSON-file-backed book catalog implementation.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Datelike, Local, SubsecRound};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{
    compute_stats, search_books, validate_new_book, Book, BookCatalog, CatalogError,
    CatalogStats, IndexedBook, LoadOutcome, NewBook, SearchField,
};
use crate::config::StorageConfig;

/// Book catalog held in memory and mirrored to a single JSON file.
pub struct JsonCatalog {
    path: PathBuf,
    atomic_writes: bool,
    backup_on_recover: bool,
    books: Mutex<Vec<Book>>,
}

impl JsonCatalog {
    /// Create an empty catalog for the configured file without reading it.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: config.path.clone(),
            atomic_writes: config.atomic_writes,
            backup_on_recover: config.backup_on_recover,
            books: Mutex::new(Vec::new()),
        }
    }

    /// Create the catalog and load the backing file.
    pub fn open(config: &StorageConfig) -> Result<(Self, LoadOutcome), CatalogError> {
        let catalog = Self::new(config);
        let outcome = catalog.load()?;
        Ok((catalog, outcome))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current catalog to the backing file.
    pub fn save(&self) -> Result<(), CatalogError> {
        let books = self.lock();
        self.persist(&books)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Book>> {
        // A panic mid-operation cannot leave the Vec itself invalid.
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rewrite the backing file from `books`.
    ///
    /// Only the atomic path guarantees the old file survives a failed write.
    /// An in-place write can leave it truncated.
    fn persist(&self, books: &[Book]) -> Result<(), CatalogError> {
        let json = serde_json::to_vec_pretty(books)
            .map_err(|e| CatalogError::Serialize(e.to_string()))?;

        let result = if self.atomic_writes {
            write_atomic(&self.path, &json)
        } else {
            ensure_parent_dir(&self.path).and_then(|_| fs::write(&self.path, &json))
        };

        result.map_err(|e| {
            CatalogError::Io(format!("writing {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), books = books.len(), "Persisted catalog");
        Ok(())
    }

    fn write_backup(&self, data: &[u8]) -> Option<PathBuf> {
        let stamp = Local::now().format("%Y%m%d%H%M%S");
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".corrupt-{}", stamp));
        let backup = PathBuf::from(name);

        match fs::write(&backup, data) {
            Ok(()) => Some(backup),
            Err(e) => {
                warn!(
                    "Failed to back up unreadable catalog to {}: {}",
                    backup.display(),
                    e
                );
                None
            }
        }
    }
}

impl BookCatalog for JsonCatalog {
    fn load(&self) -> Result<LoadOutcome, CatalogError> {
        let mut books = self.lock();

        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No catalog file at {}, starting empty",
                    self.path.display()
                );
                books.clear();
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => {
                return Err(CatalogError::Io(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice::<Vec<Book>>(&data) {
            Ok(loaded) => {
                let count = loaded.len();
                *books = loaded;
                info!("Loaded {} books from {}", count, self.path.display());
                Ok(LoadOutcome::Loaded { count })
            }
            Err(e) => {
                let backup = if self.backup_on_recover {
                    self.write_backup(&data)
                } else {
                    None
                };
                warn!(
                    path = %self.path.display(),
                    backup = ?backup,
                    "Catalog file is not valid, starting empty: {}",
                    e
                );
                books.clear();
                Ok(LoadOutcome::Recovered {
                    reason: e.to_string(),
                    backup,
                })
            }
        }
    }

    fn add(&self, new_book: NewBook) -> Result<Book, CatalogError> {
        let now = Local::now();
        let validated = validate_new_book(&new_book, now.year())?;

        let book = Book {
            title: validated.title,
            author: validated.author,
            publication_year: validated.publication_year,
            genre: validated.genre,
            read_status: validated.read_status,
            // The file keeps whole seconds; match it in memory.
            added_date: now.naive_local().trunc_subsecs(0),
        };

        let mut books = self.lock();
        books.push(book.clone());
        if let Err(e) = self.persist(&books) {
            books.pop();
            return Err(e);
        }

        debug!(index = books.len() - 1, title = %book.title, "Added book");
        Ok(book)
    }

    fn remove(&self, index: usize) -> Result<Option<Book>, CatalogError> {
        let mut books = self.lock();
        if index >= books.len() {
            debug!(index, len = books.len(), "Remove ignored, index out of range");
            return Ok(None);
        }

        let removed = books.remove(index);
        if let Err(e) = self.persist(&books) {
            books.insert(index, removed);
            return Err(e);
        }

        debug!(index, title = %removed.title, "Removed book");
        Ok(Some(removed))
    }

    fn toggle_read_status(&self, index: usize) -> Result<Option<Book>, CatalogError> {
        let mut books = self.lock();
        let Some(book) = books.get_mut(index) else {
            debug!(index, "Toggle ignored, index out of range");
            return Ok(None);
        };

        book.read_status = !book.read_status;
        let updated = book.clone();
        if let Err(e) = self.persist(&books) {
            books[index].read_status = !updated.read_status;
            return Err(e);
        }

        debug!(index, read = updated.read_status, "Toggled read status");
        Ok(Some(updated))
    }

    fn search(&self, term: &str, field: SearchField) -> Vec<IndexedBook> {
        search_books(&self.lock(), term, field)
    }

    fn statistics(&self) -> CatalogStats {
        compute_stats(&self.lock())
    }

    fn list(&self) -> Vec<IndexedBook> {
        self.lock()
            .iter()
            .enumerate()
            .map(|(index, book)| IndexedBook {
                index,
                book: book.clone(),
            })
            .collect()
    }

    fn get(&self, index: usize) -> Option<Book> {
        self.lock().get(index).cloned()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(parent_dir(path))
}

/// Write to a temp file beside `path`, then rename it into place.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
