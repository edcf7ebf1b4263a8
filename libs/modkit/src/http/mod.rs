//! HTTP utilities for modkit
//!
//! Outgoing, traced HTTP used by module adapters.

pub mod client;
