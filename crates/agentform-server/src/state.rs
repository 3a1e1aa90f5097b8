use agentform::sink::{InputSink, JsonlInputSink, MemoryInputSink};
use std::sync::Arc;

use crate::configuration::StorageSettings;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn InputSink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn InputSink>) -> Self {
        Self { sink }
    }

    /// State backed by an in-process sink
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryInputSink::new()))
    }

    /// Appends to the configured file, or keeps inputs in memory when no path is set
    pub fn from_storage(storage: &StorageSettings) -> Self {
        match &storage.path {
            Some(path) => {
                tracing::info!("storing submitted inputs in {}", path.display());
                Self::new(Arc::new(JsonlInputSink::new(path.clone())))
            }
            None => {
                tracing::warn!("no storage path configured, submitted inputs are kept in memory");
                Self::in_memory()
            }
        }
    }
}
