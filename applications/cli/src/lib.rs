//! Tonearm CLI
//!
//! Headless host for the playback core: configuration loading, a file-backed
//! theme store, catalog files and a scripted simulation of the page that
//! normally drives the player.

pub mod catalog_file;
pub mod config;
pub mod script;
pub mod simulator;
pub mod theme_store;
pub mod transport;
