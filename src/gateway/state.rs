use std::sync::Arc;

use crate::store::Store;
use crate::transfer::TransferOrchestrator;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// Transfer core, drives every write path
    pub orchestrator: Arc<TransferOrchestrator>,
    /// Store handle, used directly only by the health check
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(orchestrator: Arc<TransferOrchestrator>, store: Arc<dyn Store>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }
}
