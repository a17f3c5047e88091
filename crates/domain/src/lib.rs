//! # estatefeed-domain
//!
//! Pure domain model for the estatefeed property-listing home feed.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Listings** (the summaries shown on cards) and their property types
//! - Define **Search parameters** and the backend **listing query** built from them
//! - Define the **fetch state machine** and the request sequencing used to
//!   suppress stale results
//! - Define the **greeting** and the **feed view projection** (rendering policy)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod feed;
pub mod fetch;
pub mod greeting;
pub mod listing;
pub mod search;
