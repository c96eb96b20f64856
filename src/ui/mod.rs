//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing and list formatting
//! - [`report`] - Text rendering of validation reports and listings
//!
//! # Design
//!
//! Command handlers never print directly. Rendering functions return
//! strings so they can be tested; printing goes through [`output`] so the
//! quiet flag is honored everywhere.

pub mod output;
pub mod report;
