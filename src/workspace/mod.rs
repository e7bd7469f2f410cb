//! Keeps exactly one current workspace consistent with the live workspace list.
//!
//! The persisted snapshot is only a hint: it is matched by id against a freshly
//! fetched list and the live entry wins. Mutations never edit the list in place;
//! they go to the backend and the list is fetched again.

use crate::api::{Backend, Workspace, WorkspaceInput};
use crate::error::ClientError;
use crate::i18n::Message;
use crate::storage::PersistedStore;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceState {
    /// No user yet.
    Unresolved,
    /// List fetch in flight.
    Loading,
    Resolved {
        workspaces: Vec<Workspace>,
        current: Workspace,
    },
    Empty,
}

/// Picks the current workspace for a freshly fetched list.
///
/// The snapshot's id selects the matching live entry; a missing or stale
/// snapshot falls back to the first entry; an empty list yields `None`.
pub fn reconcile<'a>(workspaces: &'a [Workspace], snapshot: Option<&Workspace>) -> Option<&'a Workspace> {
    snapshot
        .and_then(|snap| workspaces.iter().find(|w| w.id == snap.id))
        .or_else(|| workspaces.first())
}

pub struct WorkspaceResolver {
    backend: Arc<dyn Backend>,
    store: PersistedStore,
    state: WorkspaceState,
}

impl WorkspaceResolver {
    pub fn new(backend: Arc<dyn Backend>, store: PersistedStore) -> Self {
        Self {
            backend,
            store,
            state: WorkspaceState::Unresolved,
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn current(&self) -> Option<&Workspace> {
        match &self.state {
            WorkspaceState::Resolved { current, .. } => Some(current),
            _ => None,
        }
    }

    pub fn workspaces(&self) -> &[Workspace] {
        match &self.state {
            WorkspaceState::Resolved { workspaces, .. } => workspaces,
            _ => &[],
        }
    }

    /// Back to `Unresolved`, e.g. after logout. The snapshot stays on disk.
    pub fn reset(&mut self) {
        self.state = WorkspaceState::Unresolved;
    }

    /// Fetches the list and reconciles the current workspace. On failure the
    /// previous state is restored.
    pub async fn load(&mut self, token: &str) -> Result<&WorkspaceState, ClientError> {
        let prior = std::mem::replace(&mut self.state, WorkspaceState::Loading);

        match self.backend.list_workspaces(token).await {
            Ok(workspaces) => {
                self.apply(workspaces);
                Ok(&self.state)
            }
            Err(e) => {
                log::error!("Error loading workspaces: {}", e);
                self.state = prior;
                Err(e.into())
            }
        }
    }

    fn apply(&mut self, workspaces: Vec<Workspace>) {
        let snapshot = self.store.current_workspace();
        let Some(current) = reconcile(&workspaces, snapshot.as_ref()).cloned() else {
            log::info!("No workspaces for this user");
            self.state = WorkspaceState::Empty;
            return;
        };

        if snapshot.as_ref().map(|s| s.id) != Some(current.id) {
            log::info!("Current workspace set to '{}'", current.slug);
        }
        if let Err(e) = self.store.set_current_workspace(&current) {
            log::error!("Failed to persist current workspace: {}", e);
        }

        self.state = WorkspaceState::Resolved { workspaces, current };
    }

    /// Makes `workspace` current and persists it, adding it to the list if it
    /// is not there yet.
    pub fn select_workspace(&mut self, workspace: Workspace) -> Result<(), ClientError> {
        self.store.set_current_workspace(&workspace)?;

        let mut workspaces = match std::mem::replace(&mut self.state, WorkspaceState::Loading) {
            WorkspaceState::Resolved { workspaces, .. } => workspaces,
            _ => Vec::new(),
        };
        match workspaces.iter_mut().find(|w| w.id == workspace.id) {
            Some(existing) => *existing = workspace.clone(),
            None => workspaces.push(workspace.clone()),
        }

        self.state = WorkspaceState::Resolved {
            workspaces,
            current: workspace,
        };
        Ok(())
    }

    pub fn select_by_slug(&mut self, slug: &str) -> Result<Workspace, ClientError> {
        let workspace = self
            .workspaces()
            .iter()
            .find(|w| w.slug == slug)
            .cloned()
            .ok_or(ClientError::Validation(Message::WorkspaceNotFound))?;
        self.select_workspace(workspace.clone())?;
        Ok(workspace)
    }

    pub async fn create_workspace(
        &mut self,
        token: &str,
        input: &WorkspaceInput,
    ) -> Result<Workspace, ClientError> {
        if input.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            return Err(ClientError::Validation(Message::WorkspaceNameRequired));
        }

        let created = self.backend.create_workspace(token, input).await?;
        log::info!("Workspace '{}' created", created.slug);
        self.select_workspace(created.clone())?;
        Ok(created)
    }

    pub async fn update_workspace(
        &mut self,
        token: &str,
        slug: &str,
        input: &WorkspaceInput,
    ) -> Result<Workspace, ClientError> {
        if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ClientError::Validation(Message::WorkspaceNameRequired));
        }

        let updated = self.backend.update_workspace(token, slug, input).await?;
        self.reload_after_mutation(token).await?;
        Ok(updated)
    }

    /// Deletes on the backend, then refetches. No local removal.
    pub async fn delete_workspace(&mut self, token: &str, slug: &str) -> Result<(), ClientError> {
        self.backend.delete_workspace(token, slug).await?;
        log::info!("Workspace '{}' deleted", slug);
        self.reload_after_mutation(token).await
    }

    /// A rejected token is passed up and drops the list; any other refetch
    /// failure only leaves stale data behind a mutation that succeeded.
    async fn reload_after_mutation(&mut self, token: &str) -> Result<(), ClientError> {
        match self.load(token).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_unauthorized() => {
                self.reset();
                Err(e)
            }
            Err(e) => {
                log::warn!("Workspace list not refreshed after change: {}", e);
                Ok(())
            }
        }
    }
}
