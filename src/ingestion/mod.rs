//! Turning external document sources into chunked datasets.

pub mod loader;

pub use loader::{DocumentFormat, detect_format, load_documents};
