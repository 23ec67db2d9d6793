//! The request-facing half of gopin, a proxy serving version-pinned Go packages straight from
//! GitHub.
//!
//! A request path like `/alice/bob@~1.2/info/refs` is matched against three URL grammars, the
//! selector is resolved against the tags GitHub advertises for `alice/bob`, and the advertisement
//! is rewritten so that git sees the resolved commit as the only ref.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use gopin_router::{Dispatcher, GithubRefSource, IncomingRequest, RouterOptions};
//!
//! # async fn run() -> gopin_router::Result<()> {
//! let options = RouterOptions::default().with_domain("gopin.example");
//! let source = Arc::new(GithubRefSource::new(&options)?);
//! let dispatcher = Dispatcher::new(options, source)?;
//!
//! let response = dispatcher
//!     .handle(&IncomingRequest::new("/alice/bob@1.x/info/refs"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(rust_2018_idioms)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod grammar;
pub mod server;
pub mod shape;
pub mod upstream;
mod types;

pub use config::RouterOptions;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use shape::PackageResponse;
pub use types::*;
pub use upstream::{GithubRefSource, RefSource, UpstreamRefs};

/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
