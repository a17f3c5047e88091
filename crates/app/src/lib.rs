//! # estatefeed-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ListingRepository` — persist and query listings
//!   - `Navigator` — fire-and-forget navigation requests
//! - Define **driving/inbound** use-cases:
//!   - `ListingService` — latest listings, filtered search, lookup, create
//!   - `FeedController` — coordinates the two feed requests against changing
//!     search parameters and suppresses stale results
//! - Provide **in-process infrastructure** (navigation bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `estatefeed-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod feed_controller;
pub mod navigation_bus;
pub mod ports;
pub mod services;
