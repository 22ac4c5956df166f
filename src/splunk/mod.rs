//! Splunk REST API access
//!
//! Paginated retrieval of tracked alerts (saved searches) and of the fired
//! alert events behind each of them.

pub mod client;
pub mod model;
pub mod source;

pub use client::{ClientConfig, SplunkClient, TransportError, PAGE_SIZE};
pub use model::{AlertRecord, PageEnvelope, Paging, Severity};
pub use source::{FiredAlertSource, TrackedAlertSource};
