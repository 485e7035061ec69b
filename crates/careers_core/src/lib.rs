//! Careers core: pure job records, location parsing and region filtering.
mod filter;
mod job;
mod location;
mod region;

pub use filter::{filter_entries, ParseFailurePolicy};
pub use job::{Job, RawEntry};
pub use location::{parse_location, LocationError, ParsedLocation};
pub use region::{Region, EUROPE};
