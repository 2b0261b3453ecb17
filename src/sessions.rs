use crate::explorer::FileExplorer;
use crate::{ExplorerError, Result};
use std::collections::HashMap;
use tracing::{info, warn};

/// Live explorers keyed by user id. Owned by the request layer: clients
/// are inserted on login and closed on logout.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Box<dyn FileExplorer>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an initialized explorer. A previous session for the same
    /// uid is closed.
    pub fn insert(&mut self, uid: impl Into<String>, explorer: Box<dyn FileExplorer>) {
        let uid = uid.into();
        info!("Session opened for {}", uid);
        if let Some(mut old) = self.sessions.insert(uid.clone(), explorer) {
            if let Err(e) = old.close() {
                warn!("Closing replaced session for {} failed: {}", uid, e);
            }
        }
    }

    pub fn get(&self, uid: &str) -> Option<&dyn FileExplorer> {
        self.sessions.get(uid).map(|e| e.as_ref())
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.sessions.contains_key(uid)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop the session for `uid` and close its connection.
    pub fn remove(&mut self, uid: &str) -> Result<()> {
        let mut explorer = self.sessions.remove(uid).ok_or(ExplorerError::NotConnected)?;
        info!("Session closed for {}", uid);
        explorer.close()
    }

    pub fn close_all(&mut self) {
        for (uid, mut explorer) in self.sessions.drain() {
            if let Err(e) = explorer.close() {
                warn!("Closing session for {} failed: {}", uid, e);
            }
        }
    }
}
