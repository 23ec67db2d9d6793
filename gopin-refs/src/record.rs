//! A single advertised reference.

use gix_hash::ObjectId;

use crate::{Error, Result};

/// Suffix git appends to the name of a peeled annotated tag.
pub const PEELED_SUFFIX: &str = "^{}";

/// A reference record with its object id and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRecord {
    /// The object id the reference points to.
    pub id: ObjectId,
    /// The fully qualified reference name.
    pub name: String,
}

impl RefRecord {
    /// Create a new reference record.
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Parse `<40-hex> <name>` as it appears in an advertisement, without trailing newline.
    pub fn from_line(line: &str) -> Result<Self> {
        let (hex, name) = line.split_once(' ').ok_or_else(|| Error::MalformedRefLine {
            line: line.to_owned(),
        })?;
        if name.is_empty() {
            return Err(Error::MalformedRefLine { line: line.to_owned() });
        }
        let id = ObjectId::from_hex(hex.as_bytes()).map_err(|_| Error::InvalidObjectId { hex: hex.to_owned() })?;
        Ok(Self::new(id, name))
    }

    /// Return `true` if this is the `^{}` line naming the commit an annotated tag points to.
    pub fn is_peeled(&self) -> bool {
        self.name.ends_with(PEELED_SUFFIX)
    }

    /// The name with any `^{}` suffix removed.
    pub fn unpeeled_name(&self) -> &str {
        self.name.strip_suffix(PEELED_SUFFIX).unwrap_or(&self.name)
    }
}
