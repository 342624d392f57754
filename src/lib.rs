//! Universalist - list the annotations buried in a source tree
//!
//! Walks a directory, finds comment annotations such as `TODO`, `FIXME`,
//! `URGENT` and `BUG`, and prints them grouped by keyword with the file and
//! line where each one lives.
//!
//! # Example
//!
//! ```rust,no_run
//! use universalist::*;
//! use std::path::Path;
//!
//! // Load configuration
//! let config = config::load_config(None).unwrap();
//! let registry = Registry::from_config(&config).unwrap();
//! let exclusions = filters::ExclusionSet::new(config.excluded.as_slice()).unwrap();
//!
//! // Scan directory
//! let results = scanner::scan_directory(Path::new("."), &registry, &exclusions).unwrap();
//!
//! // Print the report
//! reporter::render(&results, &registry, &mut std::io::stdout()).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod registry;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::{Annotation, AnnotationReport, Config, MatchRecord, ResultSet};
pub use registry::Registry;
