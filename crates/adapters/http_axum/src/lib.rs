//! # estatefeed-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for listings (`/api/listings`, …)
//! - Host long-lived **feed sessions**: one feed controller per session,
//!   driven over HTTP and observed through a Server-Sent Events stream
//! - Serve the **server-side-rendered home feed** (`/`) and listing detail
//!   pages (`/properties/{id}`) that work with **zero JavaScript**
//! - Map HTTP requests into application calls (driving adapter) and
//!   application results into HTTP responses (JSON or HTML)
//!
//! ## No-JS feed approach
//! - The query string (`?query=…&filter=…`) is the navigation parameter
//!   source; the search box is a plain `GET` form and filter chips are links.
//! - Each page render mounts a fresh feed controller, feeds it the query
//!   string, and waits a bounded time for both requests to settle.
//! - Sections still loading at render time show a spinner and the page
//!   carries `<meta http-equiv="refresh">` so it reloads shortly after.
//!
//! ## Dependency rule
//! Depends on `estatefeed-app` (for port traits and services) and
//! `estatefeed-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod sessions;
pub mod state;

#[cfg(test)]
mod test_support;
