//! Alert discovery
//!
//! Turns tracked Splunk alerts into addressable targets and keeps the last
//! good list available between refresh cycles.

pub mod cache;
pub mod projector;
pub mod target;

pub use cache::{DiscoveryCache, DEFAULT_REFRESH_INTERVAL};
pub use projector::AlertDiscovery;
pub use target::{
    attribute_descriptions, target_description, AttributeDescription, DiscoveryDescription,
    Target, TargetDescription, ATTRIBUTE_AUTHOR, ATTRIBUTE_ID, ATTRIBUTE_NAME,
    ATTRIBUTE_SEVERITY, ATTRIBUTE_URL, TARGET_TYPE,
};
