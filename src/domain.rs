//! Domain module - category tree model and the crawl-and-merge algorithms
//!
//! Everything in here is free of network and file I/O. The service traits
//! in [`services`] mark the seams where infrastructure plugs in.

pub mod category;
pub mod deadline;
pub mod flatten;
pub mod merge;
pub mod services;

pub use category::{CategoryNode, FlatEntry, PLACEHOLDER_RANK, PendingFetch, ProductRecord};
pub use deadline::{Clock, Deadline, SystemClock};
pub use flatten::{Flattened, flatten_category};
pub use merge::merge_products;
pub use services::{EmptyReason, FetchOutcome, JsonSource, ReportWriter};
