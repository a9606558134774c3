#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Multi-criteria incident filtering and heat-intensity projection.
//!
//! [`filter_incidents`] is pure and does no I/O, so it can be re-run on
//! every filter change. The [`export`] module turns its output into the
//! shapes map renderers consume.

pub mod export;
pub mod filter;
pub mod weight;

pub use export::{DEFAULT_CENTER, heat_triples, map_center, to_feature_collection};
pub use filter::{FilterOutcome, available_types, filter_incidents, time_cutoff};
pub use weight::{severity_weight, weight_of};
