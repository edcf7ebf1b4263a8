//! Flickbox film catalogue client.
//!
//! View controllers for list collections, film search, review likes, review
//! moderation and user administration, backed by the Flickbox PHP gateway and
//! the TMDB metadata API.

// === PUBLIC CONTRACT ===
pub mod contract;

pub use contract::{error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{Flickbox, FlickboxPorts, MODULE_NAME};

// === INTERNAL MODULES ===
// Exposed for the front-end and integration tests; `contract` is the stable surface.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
