//! Session registry: one engine per active dataset.
//!
//! Each session's engine sits behind its own mutex, so executions against
//! different sessions proceed concurrently while calls within a session are
//! serialized. The registry lock is only held to look a session up.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use serde_json::Value;
use thiserror::Error;

use plansight_core::config::EngineConfig;
use plansight_core::id::SessionId;
use plansight_io::DatasetSummary;

use crate::result::ExecutionResult;
use crate::runtime::{Engine, ExecError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

pub struct SessionRegistry {
    cfg: EngineConfig,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Engine>>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// An engine's state stays consistent across a panic in another caller
/// (loads swap the frame in one step), so a poisoned lock is recovered.
fn lock(engine: &Mutex<Engine>) -> MutexGuard<'_, Engine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SessionRegistry {
    pub fn new(cfg: EngineConfig) -> Self {
        Self {
            cfg,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Load a `.csv` file into a new session.
    pub fn create_from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(SessionId, DatasetSummary), SessionError> {
        let mut engine = Engine::new(self.cfg.clone());
        let summary = engine.load_path(path)?;
        Ok((self.insert(engine), summary))
    }

    /// Load CSV text into a new session.
    pub fn create_from_bytes(
        &self,
        bytes: &[u8],
    ) -> Result<(SessionId, DatasetSummary), SessionError> {
        let mut engine = Engine::new(self.cfg.clone());
        let summary = engine.load_bytes(bytes)?;
        Ok((self.insert(engine), summary))
    }

    /// Register an engine that was loaded elsewhere.
    pub fn insert(&self, engine: Engine) -> SessionId {
        let id = SessionId::new();
        let mut sessions = self.sessions.write().unwrap_or_else(|p| p.into_inner());
        sessions.insert(id, Arc::new(Mutex::new(engine)));
        #[cfg(feature = "tracing")]
        tracing::debug!(session = %id, active = sessions.len(), "session created");
        id
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Mutex<Engine>>> {
        self.sessions
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&id)
            .cloned()
    }

    pub fn execute(&self, id: SessionId, plan: &Value) -> Result<ExecutionResult, SessionError> {
        let engine = self.get(id).ok_or(SessionError::NotFound(id))?;
        let result = lock(&engine).execute(plan);
        Ok(result)
    }

    /// Replace a session's dataset. On failure the old dataset stays.
    pub fn reload_bytes(&self, id: SessionId, bytes: &[u8]) -> Result<DatasetSummary, SessionError> {
        let engine = self.get(id).ok_or(SessionError::NotFound(id))?;
        let summary = lock(&engine).load_bytes(bytes)?;
        Ok(summary)
    }

    pub fn info(&self, id: SessionId) -> Option<DatasetSummary> {
        let engine = self.get(id)?;
        let summary = lock(&engine).summary().cloned();
        summary
    }

    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&id)
            .is_some();
        #[cfg(feature = "tracing")]
        tracing::debug!(session = %id, removed, "session removed");
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
