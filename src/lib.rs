//! folder-cleaner - sort a directory's files into category subfolders
//!
//! This library classifies the top-level files of a directory by extension,
//! moves each into a subfolder named after its category (renaming instead of
//! overwriting on collision), and reports progress through plain callbacks so
//! any front end can drive it from a background thread.

pub mod category;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod mover;
pub mod output;

pub use category::{CategoryTable, DEFAULT_CATEGORY, TableError};
pub use cleaner::{
    Callbacks, ChannelReporter, CleanError, CleanEvent, CleanHandle, FolderCleaner, PassOutcome,
    PassState, Reporter, RunSummary, StopFlag,
};
pub use config::{CleanerConfig, ConfigError};
pub use mover::{MoveError, unique_name};
