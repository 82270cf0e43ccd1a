//! Session tracking state.
//!
//! Keeps handles to in-flight sessions so callers can cancel by id. Only one
//! session should be active per preview surface; the registry gives the
//! caller the bookkeeping to enforce that, it does not enforce it itself.

use crate::models::SessionHandle;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Registry of running session handles.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for tracking.
    pub fn register(&self, handle: Arc<SessionHandle>) {
        tracing::trace!(session_id = %handle.id(), "Session registered");
        self.sessions.write().insert(handle.id(), handle);
    }

    /// Get a session handle by id.
    pub fn get(&self, id: &Uuid) -> Option<Arc<SessionHandle>> {
        self.sessions.read().get(id).cloned()
    }

    /// Cancel a running session.
    ///
    /// Returns true if the session was found and cancellation was requested.
    pub fn cancel(&self, id: &Uuid) -> bool {
        if let Some(handle) = self.sessions.read().get(id) {
            handle.cancel();
            true
        } else {
            false
        }
    }

    /// Cancel every tracked session.
    pub fn cancel_all(&self) {
        for handle in self.sessions.read().values() {
            handle.cancel();
        }
    }

    /// Unregister a finished session.
    pub fn unregister(&self, id: &Uuid) -> Option<Arc<SessionHandle>> {
        let handle = self.sessions.write().remove(id);
        if handle.is_some() {
            tracing::trace!(session_id = %id, "Session unregistered");
        }
        handle
    }

    /// Get all tracked session ids.
    pub fn active_ids(&self) -> Vec<Uuid> {
        self.sessions.read().keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_cancel_unregister() {
        let registry = SessionRegistry::new();
        let handle = Arc::new(SessionHandle::new("users"));
        let id = handle.id();

        registry.register(Arc::clone(&handle));
        assert_eq!(registry.active_ids(), vec![id]);

        assert!(registry.cancel(&id));
        assert!(handle.is_cancelled());

        assert!(registry.unregister(&id).is_some());
        assert!(registry.get(&id).is_none());
        assert!(!registry.cancel(&id));
    }

    #[test]
    fn cancel_all_reaches_every_handle() {
        let registry = SessionRegistry::new();
        let first = Arc::new(SessionHandle::new("a"));
        let second = Arc::new(SessionHandle::new("b"));
        registry.register(Arc::clone(&first));
        registry.register(Arc::clone(&second));

        registry.cancel_all();
        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
    }
}
