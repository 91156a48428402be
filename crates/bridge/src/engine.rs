//! Entry point: a resolved engine table shared by every wrapper.

use std::sync::Arc;

use abi::{AbiError, EngineApi, RawHandle};

/// A loaded native engine. Cheap to clone; every wrapper holds one so its
/// free action can reach the right entry points no matter which thread runs
/// it.
#[derive(Clone)]
pub struct Engine {
    api: Arc<EngineApi>,
}

impl Engine {
    #[must_use]
    pub fn new(api: EngineApi) -> Self {
        Self { api: Arc::new(api) }
    }

    /// Resolve the entry-point table through `resolve` (symbol name to
    /// address) and wrap it.
    ///
    /// # Errors
    ///
    /// Forwards [`AbiError`] from table resolution: a missing entry point or
    /// a version mismatch.
    pub fn load(resolve: impl FnMut(&str) -> RawHandle) -> Result<Self, AbiError> {
        let api = EngineApi::from_loader(resolve)?;
        tracing::info!("native engine table loaded");
        Ok(Self::new(api))
    }

    pub(crate) fn api(&self) -> &EngineApi {
        &self.api
    }

    pub(crate) fn api_arc(&self) -> Arc<EngineApi> {
        Arc::clone(&self.api)
    }
}
