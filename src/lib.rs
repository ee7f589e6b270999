//! Client for the Glances REST API.
//!
//! Fetches `/api/2/all` from a remote host running Glances, throttled to one
//! network request per minute, and projects the payload into a fixed set of
//! named, unit-tagged sensor values.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod sensor;

pub use error::{GlancesError, Result};
