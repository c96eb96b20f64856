//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`SkillId`] - Corpus-unique document identifier
//! - [`Layer`] - Ordered abstraction rank (`L0`, `L1`, ...)
//! - [`CompositionRef`] - A `composes` entry split into directory and basename
//! - [`Fingerprint`] - Content hash of a composition graph
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the graph and validator never see an empty
//! identifier or a malformed rank.
//!
//! # Examples
//!
//! ```
//! use skillgraph::core::types::{CompositionRef, Layer, SkillId};
//!
//! let id = SkillId::new("a-button").unwrap();
//! let layer: Layer = "L1".parse().unwrap();
//! let reference = CompositionRef::parse("../atoms/button.md").unwrap();
//!
//! assert_eq!(id.as_str(), "a-button");
//! assert_eq!(layer.rank(), 1);
//! assert_eq!(reference.directory(), "atoms");
//!
//! assert!(SkillId::new("").is_err());
//! assert!("layer-one".parse::<Layer>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid skill id: {0}")]
    InvalidSkillId(String),

    #[error("invalid layer: {0}")]
    InvalidLayer(String),

    #[error("invalid composition reference: {0}")]
    InvalidReference(String),
}

/// A document identifier, unique across the corpus.
///
/// Identifiers cannot be empty; any other text is accepted. Prefix rules
/// (`a-` for atoms and so on) depend on the layer ruleset and are checked
/// by the validator, not here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillId(String);

impl SkillId {
    /// Create a new validated skill id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSkillId` if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::InvalidSkillId("id cannot be empty".into()));
        }
        Ok(Self(id))
    }

    /// Build the id a layer prefix and file basename resolve to.
    ///
    /// ```
    /// use skillgraph::core::types::SkillId;
    ///
    /// let id = SkillId::from_parts("m-", "search-bar").unwrap();
    /// assert_eq!(id.as_str(), "m-search-bar");
    /// ```
    pub fn from_parts(prefix: &str, basename: &str) -> Result<Self, TypeError> {
        Self::new(format!("{prefix}{basename}"))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SkillId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SkillId> for String {
    fn from(id: SkillId) -> Self {
        id.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SkillId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An abstraction rank, written `L<n>`.
///
/// Lower ranks are primitive; higher ranks recombine lower ones. Ordering
/// follows the numeric rank, so `L0 < L1 < ... < L6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Layer(u8);

impl Layer {
    /// Create a layer from its numeric rank.
    pub const fn new(rank: u8) -> Self {
        Self(rank)
    }

    /// The numeric rank.
    pub fn rank(self) -> u8 {
        self.0
    }
}

impl FromStr for Layer {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('L')
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .filter(|d| *d == "0" || !d.starts_with('0'))
            .ok_or_else(|| TypeError::InvalidLayer(format!("'{s}' is not of the form L<n>")))?;
        digits
            .parse::<u8>()
            .map(Self)
            .map_err(|_| TypeError::InvalidLayer(format!("'{s}' rank out of range")))
    }
}

impl TryFrom<String> for Layer {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Layer> for String {
    fn from(layer: Layer) -> Self {
        layer.to_string()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A `composes` entry of the shape `../<directory>/<basename>.md`.
///
/// Parsing is lenient about the characters used in each segment; the
/// stricter lowercase-kebab syntax is a validator concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRef {
    directory: String,
    basename: String,
}

impl CompositionRef {
    /// Split a reference into directory and basename.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidReference` if the reference is not a
    /// `../dir/file.md` path.
    pub fn parse(reference: &str) -> Result<Self, TypeError> {
        let invalid = || TypeError::InvalidReference(reference.to_string());

        let rest = reference.strip_prefix("../").ok_or_else(invalid)?;
        let (directory, file) = rest.split_once('/').ok_or_else(invalid)?;
        let basename = file.strip_suffix(".md").ok_or_else(invalid)?;

        if directory.is_empty() || basename.is_empty() || basename.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            directory: directory.to_string(),
            basename: basename.to_string(),
        })
    }

    /// The directory segment (e.g. `atoms`).
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// The file name without `.md` (e.g. `button`).
    pub fn basename(&self) -> &str {
        &self.basename
    }
}

/// Content hash of a composition graph.
///
/// Computed over the sorted adjacency, so two graphs with the same edges
/// have the same fingerprint regardless of load order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint from `(composer, composed)` pairs.
    pub fn compute<'a>(edges: impl IntoIterator<Item = (&'a SkillId, &'a SkillId)>) -> Self {
        let mut sorted: Vec<_> = edges.into_iter().collect();
        sorted.sort();

        let mut hasher = Sha256::new();
        for (from, to) in sorted {
            hasher.update(from.as_str().as_bytes());
            hasher.update(b"\0");
            hasher.update(to.as_str().as_bytes());
            hasher.update(b"\n");
        }

        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod skill_id {
        use super::*;

        #[test]
        fn accepts_prefixed_ids() {
            assert!(SkillId::new("p-colors").is_ok());
            assert!(SkillId::new("pt-infinite-scroll").is_ok());
        }

        #[test]
        fn rejects_only_empty() {
            assert!(SkillId::new("").is_err());
            assert_eq!(SkillId::new("a-x y").unwrap().as_str(), "a-x y");
        }

        #[test]
        fn serde_uses_plain_string() {
            let id = SkillId::new("o-header").unwrap();
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, "\"o-header\"");

            let bad: Result<SkillId, _> = serde_json::from_str("\"\"");
            assert!(bad.is_err());
        }
    }

    mod layer {
        use super::*;

        #[test]
        fn parses_and_displays() {
            let layer: Layer = "L4".parse().unwrap();
            assert_eq!(layer.rank(), 4);
            assert_eq!(layer.to_string(), "L4");
        }

        #[test]
        fn rejects_malformed() {
            for bad in ["", "L", "4", "l4", "L-1", "L4a", "Layer4", "L999", "L01", "L007", "L00"] {
                assert!(bad.parse::<Layer>().is_err(), "{bad} should not parse");
            }
        }

        #[test]
        fn orders_by_rank() {
            assert!(Layer::new(0) < Layer::new(1));
            assert!(Layer::new(6) > Layer::new(5));
        }
    }

    mod composition_ref {
        use super::*;

        #[test]
        fn splits_directory_and_basename() {
            let r = CompositionRef::parse("../molecules/search-bar.md").unwrap();
            assert_eq!(r.directory(), "molecules");
            assert_eq!(r.basename(), "search-bar");
        }

        #[test]
        fn rejects_other_shapes() {
            for bad in [
                "atoms/button.md",
                "../button.md",
                "../atoms/button",
                "../atoms/nested/button.md",
                "..//button.md",
                "../atoms/.md",
            ] {
                assert!(CompositionRef::parse(bad).is_err(), "{bad} should not parse");
            }
        }
    }

    mod fingerprint {
        use super::*;

        #[test]
        fn independent_of_edge_order() {
            let a = SkillId::new("m-a").unwrap();
            let b = SkillId::new("a-b").unwrap();
            let c = SkillId::new("a-c").unwrap();

            let fp1 = Fingerprint::compute([(&a, &b), (&a, &c)]);
            let fp2 = Fingerprint::compute([(&a, &c), (&a, &b)]);
            assert_eq!(fp1, fp2);
            assert_eq!(fp1.as_str().len(), 64);
        }

        #[test]
        fn differs_for_different_edges() {
            let a = SkillId::new("m-a").unwrap();
            let b = SkillId::new("a-b").unwrap();
            let c = SkillId::new("a-c").unwrap();

            assert_ne!(
                Fingerprint::compute([(&a, &b)]),
                Fingerprint::compute([(&a, &c)])
            );
        }
    }
}
