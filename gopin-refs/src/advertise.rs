//! Parsing and virtualization of git smart-HTTP ref advertisements.
//!
//! Format, as served by `GET <repo>/info/refs?service=git-upload-pack`:
//!
//! ```text
//! # service=git-upload-pack
//! FLUSH
//! <oid> <refname>\0<capabilities space-separated>
//! <oid> <refname>
//! …
//! FLUSH
//! ```
//!
//! The service announcement is optional; `git upload-pack --advertise-refs` omits it. An empty
//! repository advertises a single placeholder ref named `capabilities^{}` with a zero oid.

use bstr::ByteSlice;
use gix_hash::oid;

use crate::{
    pktline::{read_sections, text_writer, write_section},
    Error, RefRecord, Result,
};

/// Prefix of the first line of a smart-HTTP advertisement.
pub const SERVICE_PREFIX: &str = "# service=";

/// Name of the placeholder ref advertised by empty repositories.
pub const EMPTY_REPOSITORY_REF: &str = "capabilities^{}";

/// A ref advertisement: the bytes as received plus their parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advertisement {
    data: Vec<u8>,
    service: Option<String>,
    refs: Vec<RefRecord>,
    capabilities: String,
}

impl Advertisement {
    /// Parse `data`, keeping it for later pass-through.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut sections = read_sections(&data)?.into_iter();
        let mut service = None;
        let mut ref_lines = sections.next().unwrap_or_default();

        let announced = match ref_lines.first() {
            Some(line) => text(line)?.strip_prefix(SERVICE_PREFIX).map(str::to_owned),
            None => None,
        };
        if announced.is_some() {
            service = announced;
            ref_lines = sections.next().unwrap_or_default();
        }

        let mut refs = Vec::with_capacity(ref_lines.len());
        let mut capabilities = String::new();
        for (idx, line) in ref_lines.iter().enumerate() {
            let line = text(line)?;
            let record = if idx == 0 {
                let (head, caps) = line.split_once('\0').ok_or_else(|| Error::MissingCapabilities {
                    line: line.to_owned(),
                })?;
                capabilities = caps.to_owned();
                RefRecord::from_line(head)?
            } else {
                RefRecord::from_line(line)?
            };
            if record.name != EMPTY_REPOSITORY_REF {
                refs.push(record);
            }
        }

        Ok(Self {
            data,
            service,
            refs,
            capabilities,
        })
    }

    /// The bytes this advertisement was parsed from.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the advertisement, returning the original bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The announced service, e.g. `git-upload-pack`.
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// All advertised refs in order, peeled `^{}` lines included and the empty-repository
    /// placeholder excluded.
    pub fn refs(&self) -> &[RefRecord] {
        &self.refs
    }

    /// The capability list carried by the first ref line.
    pub fn capabilities(&self) -> &str {
        &self.capabilities
    }

    /// Produce a new advertisement in which `target_ref_name` at `target_hash` is the only ref.
    ///
    /// The service announcement and capability list are carried over unchanged.
    pub fn virtualize(&self, target_ref_name: &str, target_hash: &oid) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(128 + self.capabilities.len());
        let mut w = text_writer(&mut out);
        if let Some(service) = &self.service {
            let announcement = format!("{SERVICE_PREFIX}{service}");
            write_section(&mut w, &[announcement.as_bytes()])?;
        }
        let line = format!("{} {}\0{}", target_hash.to_hex(), target_ref_name, self.capabilities);
        write_section(&mut w, &[line.as_bytes()])?;
        Ok(out)
    }
}

/// Rewrite the advertisement in `original` so that its only ref is `target_ref_name` at
/// `target_hash`.
pub fn virtualize(original: &[u8], target_ref_name: &str, target_hash: &oid) -> Result<Vec<u8>> {
    Advertisement::from_bytes(original.to_vec())?.virtualize(target_ref_name, target_hash)
}

fn text(line: &[u8]) -> Result<&str> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.to_str().map_err(|_| Error::MalformedRefLine {
        line: line.to_str_lossy().into_owned(),
    })
}
