use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::TracedClient;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// Errors raised by the strict config accessor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no ConfigProvider")]
    NoProvider,
    #[error("missing module config: {module}")]
    Missing { module: String },
    #[error("invalid {module} config: {source}")]
    Invalid {
        module: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct ModuleCtx {
    config_provider: Option<Arc<dyn ConfigProvider>>,
    http: TracedClient,
    module_name: Arc<str>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(module_name: &str) -> Self {
        Self {
            inner: ModuleCtx {
                config_provider: None,
                http: TracedClient::default(),
                module_name: Arc::<str>::from(module_name),
            },
        }
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    pub fn with_http(mut self, client: TracedClient) -> Self {
        self.inner.http = client;
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    pub fn current_module(&self) -> &str {
        &self.module_name
    }

    /// Shared outgoing HTTP client (cheap to clone).
    pub fn http(&self) -> TracedClient {
        self.http.clone()
    }

    /// Best-effort: deserialize the module's config into `T`, fallback to `T::default()`
    /// if section is missing or invalid.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> T {
        self.config_provider
            .as_ref()
            .and_then(|p| p.get_module_config(&self.module_name))
            .and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Strict: deserialize the module's config into `T`, returning a pathful error on failure.
    pub fn module_config_required<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let prov = self
            .config_provider
            .as_ref()
            .ok_or(ConfigError::NoProvider)?;

        let val = prov
            .get_module_config(&self.module_name)
            .ok_or_else(|| ConfigError::Missing {
                module: self.module_name.to_string(),
            })?;

        serde_json::from_value(val.clone()).map_err(|source| ConfigError::Invalid {
            module: self.module_name.to_string(),
            source,
        })
    }
}
