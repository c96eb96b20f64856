//! skillgraph - Validate and analyze a layered skill documentation corpus
//!
//! A skill corpus is a directory of Markdown documents, one per skill,
//! grouped by abstraction layer (primitives, atoms, molecules, ...). Each
//! document carries YAML frontmatter declaring its identity, its layer and
//! the lower-layer skills it composes. skillgraph builds the composition
//! graph from that metadata, validates it, computes statistics, and writes
//! a registry snapshot for other tools.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to handlers)
//! - [`engine`] - Loads everything a command needs, once
//! - [`corpus`] - Document discovery and loading
//! - [`core`] - Domain types, rules, graph, validation, analytics, registry
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! skillgraph maintains the following invariants:
//!
//! 1. The corpus is never modified; the registry snapshot is the only output file
//! 2. Results are deterministic for a given set of files
//! 3. The snapshot is replaced atomically or not at all

pub mod cli;
pub mod core;
pub mod corpus;
pub mod engine;
pub mod ui;
