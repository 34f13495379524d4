pub mod catalog;
pub mod config;

pub use catalog::{
    compute_stats, search_books, validate_new_book, Book, BookCatalog, CatalogError,
    CatalogStats, Genre, IndexedBook, JsonCatalog, LoadOutcome, NewBook, SearchField,
    ValidationError, MIN_PUBLICATION_YEAR,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, ServerConfig, StorageConfig,
};
