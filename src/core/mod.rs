//! Data model, file formats and persistence plumbing.

pub mod config;
pub mod csv;
pub mod model;
pub mod storage;
pub mod utils;
