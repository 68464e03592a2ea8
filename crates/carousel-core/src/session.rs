//! Sign-in stub and the saved-project library.
//!
//! Both read their key once when constructed. A value that fails to parse is treated as absent
//! and left in place; only that key is affected.

use crate::model::Project;
use crate::storage::{KeyValueStore, PROJECTS_KEY, StorageError, StorageResult, USER_KEY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Email used when signing in with a blank address.
pub const GUEST_EMAIL: &str = "guest@demo.com";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

/// Sign-in state backed by [`USER_KEY`].
pub struct Session<S: KeyValueStore> {
    store: Arc<S>,
    user: Option<User>,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the session from storage.
    pub async fn restore(store: Arc<S>) -> Self {
        let user = match store.get(USER_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("Ignoring unreadable '{}' value: {}", USER_KEY, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read '{}': {}", USER_KEY, e);
                None
            }
        };
        Self { store, user }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in. A blank email signs in as [`GUEST_EMAIL`].
    pub async fn login(&mut self, email: &str) -> StorageResult<&User> {
        let email = email.trim();
        let user = User {
            email: if email.is_empty() { GUEST_EMAIL.to_string() } else { email.to_string() },
        };
        let json = serde_json::to_string(&user)?;
        self.store.set(USER_KEY, &json).await?;
        log::info!("Signed in as {}", user.email);
        Ok(self.user.insert(user))
    }

    /// Sign out and forget the stored user.
    pub async fn logout(&mut self) -> StorageResult<()> {
        self.store.remove(USER_KEY).await?;
        if let Some(user) = self.user.take() {
            log::info!("Signed out {}", user.email);
        }
        Ok(())
    }
}

/// Saved projects backed by [`PROJECTS_KEY`].
pub struct ProjectLibrary<S: KeyValueStore> {
    store: Arc<S>,
    projects: Vec<Project>,
}

impl<S: KeyValueStore> ProjectLibrary<S> {
    /// Load the project list.
    pub async fn load(store: Arc<S>) -> Self {
        let projects = match store.get(PROJECTS_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<Vec<Project>>(&json) {
                Ok(projects) => projects,
                Err(e) => {
                    log::warn!("Ignoring unreadable '{}' value: {}", PROJECTS_KEY, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read '{}': {}", PROJECTS_KEY, e);
                Vec::new()
            }
        };
        Self { store, projects }
    }

    /// All saved projects, in insertion order.
    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    /// Find a project by id.
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Like [`get`](Self::get), but a missing id is [`StorageError::NotFound`].
    pub fn require(&self, id: &str) -> StorageResult<&Project> {
        self.get(id).ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Insert a project, or overwrite the one with the same id.
    ///
    /// The in-memory list only changes once the write succeeds.
    pub async fn upsert(&mut self, project: Project) -> StorageResult<()> {
        let mut updated = self.projects.clone();
        match updated.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => updated.push(project),
        }
        self.persist(updated).await
    }

    /// Delete a project by id. Returns whether one was removed.
    pub async fn delete(&mut self, id: &str) -> StorageResult<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let updated: Vec<Project> = self.projects.iter().filter(|p| p.id != id).cloned().collect();
        self.persist(updated).await?;
        log::info!("Deleted project {}", id);
        Ok(true)
    }

    async fn persist(&mut self, projects: Vec<Project>) -> StorageResult<()> {
        let json = serde_json::to_string(&projects)?;
        self.store.set(PROJECTS_KEY, &json).await?;
        self.projects = projects;
        Ok(())
    }
}
