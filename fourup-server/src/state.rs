//! Server state
//!
//! One `GameService` shared by every handler. The store is injected so
//! tests (and a future database adapter) can swap the backing.

use std::sync::Arc;

use crate::session::GameService;
use crate::store::{MemoryStore, Store};

pub struct ServerState {
    pub service: GameService,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self {
            service: GameService::new(store),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
