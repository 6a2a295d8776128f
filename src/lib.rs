//! slobweb — minimalistic web front-end for dictionary containers.
//!
//! Opens one or more read-only dictionary containers and serves them over
//! HTTP: a lookup page that searches all containers, JSON container info,
//! raw entry/blob content with cache headers, and a diagnostics page.

pub mod dict;
pub mod error;
pub mod handlers;
pub mod render;
pub mod router;
pub mod state;
