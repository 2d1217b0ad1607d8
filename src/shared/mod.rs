//! Gemeinsame Typen: Optionen und Fehler-Taxonomie.

pub mod error;
pub mod options;

pub use error::{Result, ViewerError};
pub use options::{CompositeProfile, ViewerOptions};
