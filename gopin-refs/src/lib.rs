//! gopin-refs: git smart-HTTP ref advertisements for the gopin package proxy.
//!
//! This crate knows how to read the `info/refs` advertisement a git server sends before a clone,
//! and how to rewrite it so that a client sees exactly one ref: the version the proxy resolved.
//!
#![deny(missing_docs, rust_2018_idioms)]

pub mod advertise;
pub mod pktline;
pub mod record;

pub use advertise::{virtualize, Advertisement};
pub use record::RefRecord;

/// The ways reading or rewriting an advertisement can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Writing pkt-lines into the output buffer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The input is not valid pkt-line framing.
    #[error("pkt-line decode error: {0}")]
    Decode(#[from] gix_packetline_blocking::decode::Error),
    /// The input ends in the middle of a pkt-line.
    #[error("advertisement is truncated, {bytes_needed} more bytes expected")]
    Truncated {
        /// How many bytes the last packet still needs.
        bytes_needed: usize,
    },
    /// A ref line is not of the form `<hash> <name>`.
    #[error("malformed ref line: {line:?}")]
    MalformedRefLine {
        /// The offending line, lossily decoded.
        line: String,
    },
    /// A hash in the advertisement is not a valid object id.
    #[error("invalid object id {hex:?}")]
    InvalidObjectId {
        /// The text that failed to decode.
        hex: String,
    },
    /// The first ref line does not carry a NUL-separated capability list.
    #[error("first ref line carries no capabilities: {line:?}")]
    MissingCapabilities {
        /// The offending line, lossily decoded.
        line: String,
    },
}

/// A convenience alias for results of this crate.
pub type Result<T> = std::result::Result<T, Error>;
