/// Domain types for Tonearm
mod theme;
mod track;

pub use theme::{Theme, ThemeStore};
pub use track::{Track, INSTRUMENTAL_MARKER};
