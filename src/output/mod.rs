//! Output module
//!
//! Persists fetched pages into object storage.
//!
//! # Overview
//!
//! - [`CloudDestination`] turns a destination URL into an `ObjectStore`
//! - [`PageSink`] is the seam the paginator writes through
//! - [`BlobPageSink`] names each page deterministically and writes it once

mod cloud;
mod sink;

pub use cloud::CloudDestination;
pub use sink::{page_object_key, BlobPageSink, PageSink};
