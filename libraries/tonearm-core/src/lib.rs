//! Tonearm Core
//!
//! Platform-agnostic domain types shared by the Tonearm libraries.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Catalog`, `Theme`
//! - **Collaborator Traits**: `ThemeStore` for persisting the theme flag
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::{Catalog, Track};
//!
//! let catalog = Catalog::new(vec![
//!     Track::new("Moment", "Serge Quadrado", "https://cdn.example/moment.mp3"),
//!     Track::new("Just Relax", "Lesfm", "https://cdn.example/relax.mp3"),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.search("relax").len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod time;
pub mod types;

pub use catalog::Catalog;
pub use error::{CoreError, Result};
pub use time::{format_time, parse_time};
pub use types::{Theme, ThemeStore, Track, INSTRUMENTAL_MARKER};
