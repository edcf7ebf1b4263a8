//! # ModKit - module wiring helpers
//!
//! Shared plumbing for Flickbox modules:
//!
//! - **Context**: a [`ModuleCtx`] scoped to one module, exposing its typed configuration
//!   section and the shared outgoing HTTP client.
//! - **HTTP**: [`TracedClient`], a `reqwest` wrapper that traces every outgoing call.
//!
//! ## Example
//!
//! ```rust,ignore
//! use modkit::{ModuleCtxBuilder, TracedClient};
//!
//! let ctx = ModuleCtxBuilder::new("flickbox")
//!     .with_config_provider(provider)
//!     .with_http(TracedClient::default())
//!     .build();
//! let cfg: MyConfig = ctx.module_config_required()?;
//! ```

pub mod context;
pub use context::{ConfigError, ConfigProvider, ModuleCtx, ModuleCtxBuilder};

// HTTP utilities
pub mod http;
pub use http::client::TracedClient;
