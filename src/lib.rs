//! Ditherdeck
//!
//! Project documents, PNG I/O and frame-sequence processing around the
//! `tone-dither` core. This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
