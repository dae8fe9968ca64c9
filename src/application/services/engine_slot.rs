use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::OnceCell;

use super::ProcessingEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Loading,
    Ready,
    Degraded,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Loading => "loading",
            EngineState::Ready => "ready",
            EngineState::Degraded => "degraded",
        }
    }
}

/// Holds the processing engine once startup has produced it. Requests that
/// arrive earlier see `None` and are rejected.
#[derive(Default)]
pub struct EngineSlot {
    engine: OnceCell<Arc<ProcessingEngine>>,
    loading: AtomicBool,
}

impl EngineSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: ProcessingEngine) -> Self {
        let slot = Self::new();
        slot.install(engine);
        slot
    }

    pub fn mark_loading(&self) {
        self.loading.store(true, Ordering::Release);
    }

    /// Stores the engine. Returns `false` if one was already installed; the
    /// first engine wins.
    pub fn install(&self, engine: ProcessingEngine) -> bool {
        let installed = self.engine.set(Arc::new(engine)).is_ok();
        self.loading.store(false, Ordering::Release);
        installed
    }

    pub fn get(&self) -> Option<Arc<ProcessingEngine>> {
        self.engine.get().cloned()
    }

    pub fn state(&self) -> EngineState {
        match self.engine.get() {
            Some(engine) if engine.is_ready() => EngineState::Ready,
            Some(_) => EngineState::Degraded,
            None if self.loading.load(Ordering::Acquire) => EngineState::Loading,
            None => EngineState::Uninitialized,
        }
    }
}
