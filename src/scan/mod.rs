pub mod filesystem;

pub use filesystem::{is_missing_or_empty, list_source_files, SkipPolicy};
