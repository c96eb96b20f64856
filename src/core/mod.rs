//! core
//!
//! Core domain types, schemas, and operations for skillgraph.
//!
//! # Modules
//!
//! - [`types`] - Strong types: SkillId, Layer, CompositionRef, Fingerprint
//! - [`metadata`] - Frontmatter schema and parsing
//! - [`document`] - A loaded skill document
//! - [`rules`] - Layer ruleset schema, loading and built-in defaults
//! - [`graph`] - Composition graph representation and cycle detection
//! - [`verify`] - Structural validation of documents and the graph
//! - [`analytics`] - Orphans, rankings and per-layer statistics
//! - [`registry`] - Registry snapshot building and atomic writing
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for corpus locations
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - All verification is deterministic

pub mod analytics;
pub mod config;
pub mod document;
pub mod graph;
pub mod metadata;
pub mod paths;
pub mod registry;
pub mod rules;
pub mod types;
pub mod verify;
