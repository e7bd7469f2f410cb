//! The client's one piece of shared state.
//!
//! `AppState` owns the session and workspace resolvers and the notification
//! queue, and is passed explicitly to whoever drives the client. `init` brings
//! it up from the persisted store; `reset` throws the in-memory state away and
//! runs `init` again. A bearer call that comes back unauthorized clears the
//! token and resets.

use crate::api::{Backend, ProfileUpdate, User, Workspace, WorkspaceInput};
use crate::error::ClientError;
use crate::i18n::{Language, Message};
use crate::notification::NotificationQueue;
use crate::session::SessionResolver;
use crate::storage::PersistedStore;
use crate::tools::{Identified, RecordList, ToolContext};
use crate::workspace::WorkspaceResolver;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;

pub struct AppState {
    backend: Arc<dyn Backend>,
    store: PersistedStore,
    session: SessionResolver,
    workspaces: WorkspaceResolver,
    notifications: NotificationQueue,
    language: Language,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, store: PersistedStore, notifications: NotificationQueue) -> Self {
        let language = store.language();
        Self {
            session: SessionResolver::new(Arc::clone(&backend), store.clone()),
            workspaces: WorkspaceResolver::new(Arc::clone(&backend), store.clone()),
            backend,
            store,
            notifications,
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn session(&self) -> &SessionResolver {
        &self.session
    }

    pub fn workspaces(&self) -> &WorkspaceResolver {
        &self.workspaces
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn current_workspace(&self) -> Option<&Workspace> {
        self.workspaces.current()
    }

    /// Restores the session from the store and, with a user, the workspaces.
    pub async fn init(&mut self) {
        self.backend.set_language(self.language);

        if self.session.resolve_session().await.is_some() {
            self.load_workspaces().await;
        } else {
            self.workspaces.reset();
        }
    }

    /// Starts over from the persisted store with empty resolvers.
    pub async fn reset(&mut self) {
        log::info!("Resetting client state");
        self.session = SessionResolver::new(Arc::clone(&self.backend), self.store.clone());
        self.workspaces = WorkspaceResolver::new(Arc::clone(&self.backend), self.store.clone());
        self.init().await;
    }

    async fn load_workspaces(&mut self) {
        let Some(token) = self.session.token() else {
            return;
        };
        if let Err(e) = self.workspaces.load(&token).await {
            if e.is_unauthorized() {
                log::warn!("Token rejected while loading workspaces, logging out");
                if let Err(e) = self.session.logout() {
                    log::error!("Failed to clear stored token: {}", e);
                }
                self.workspaces.reset();
            }
        }
    }

    /// Reports a failed user action. An unauthorized bearer call invalidates
    /// the session before the message is shown.
    async fn fail(&mut self, err: ClientError) -> ClientError {
        if err.is_unauthorized() {
            log::warn!("Backend rejected the session token: {}", err);
            if let Err(e) = self.store.clear_token() {
                log::error!("Failed to clear stored token: {}", e);
            }
            self.reset().await;
        }
        self.notifications.error(err.user_message(self.language));
        err
    }

    fn token(&self) -> Result<String, ClientError> {
        self.session.token().ok_or(ClientError::NotAuthenticated)
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), ClientError> {
        self.store.set_language(language)?;
        self.backend.set_language(language);
        self.language = language;
        log::info!("Language set to {}", language);
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        match self.session.login(email, password).await {
            Ok(user) => {
                self.notifications.success(Message::LoginSuccess.text(self.language));
                self.load_workspaces().await;
                Ok(user)
            }
            Err(e) => {
                // login carries no bearer token, so a 401 here is just bad credentials
                self.notifications
                    .error(e.user_message_or(self.language, Message::LoginFailed));
                Err(e)
            }
        }
    }

    pub async fn register(&mut self, email: &str, password: &str, full_name: &str) -> Result<User, ClientError> {
        match self.session.register(email, password, full_name).await {
            Ok(user) => {
                self.notifications.success(Message::LoginSuccess.text(self.language));
                self.load_workspaces().await;
                Ok(user)
            }
            Err(e) => {
                self.notifications
                    .error(e.user_message_or(self.language, Message::RegistrationFailed));
                Err(e)
            }
        }
    }

    /// A token that could not be removed is reported, since it would bring
    /// the session back on the next start.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        let cleared = self.session.logout();
        self.workspaces.reset();
        match cleared {
            Ok(()) => {
                self.notifications.info(Message::LoggedOut.text(self.language));
                Ok(())
            }
            Err(e) => {
                log::error!("Logout could not clear the stored token: {}", e);
                self.notifications.error(e.user_message(self.language));
                Err(e)
            }
        }
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User, ClientError> {
        match self.session.update_profile(update).await {
            Ok(user) => {
                self.notifications.success(Message::ProfileUpdated.text(self.language));
                Ok(user)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn change_password(&mut self, current: &str, new: &str, confirm: &str) -> Result<(), ClientError> {
        match self.session.change_password(current, new, confirm).await {
            Ok(()) => {
                self.notifications.success(Message::PasswordChanged.text(self.language));
                Ok(())
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn select_workspace(&mut self, slug: &str) -> Result<Workspace, ClientError> {
        match self.workspaces.select_by_slug(slug) {
            Ok(workspace) => Ok(workspace),
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn create_workspace(&mut self, input: &WorkspaceInput) -> Result<Workspace, ClientError> {
        let result = match self.token() {
            Ok(token) => self.workspaces.create_workspace(&token, input).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(workspace) => {
                self.notifications.success(Message::WorkspaceCreated.text(self.language));
                Ok(workspace)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn update_workspace(&mut self, slug: &str, input: &WorkspaceInput) -> Result<Workspace, ClientError> {
        let result = match self.token() {
            Ok(token) => self.workspaces.update_workspace(&token, slug, input).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(workspace) => {
                self.notifications.success(Message::WorkspaceUpdated.text(self.language));
                Ok(workspace)
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn delete_workspace(&mut self, slug: &str) -> Result<(), ClientError> {
        let result = match self.token() {
            Ok(token) => self.workspaces.delete_workspace(&token, slug).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                self.notifications.success(Message::WorkspaceDeleted.text(self.language));
                Ok(())
            }
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// Context for a tool call. Needs a user and a current workspace.
    pub fn tool_context(&self) -> Result<ToolContext, ClientError> {
        let token = self.token()?;
        let workspace = self
            .workspaces
            .current()
            .ok_or(ClientError::Validation(Message::SelectWorkspaceFirst))?;
        Ok(ToolContext {
            token,
            workspace_slug: workspace.slug.clone(),
            language: self.language,
        })
    }

    /// Runs a tool operation against the current workspace, reporting any
    /// failure through the notification queue.
    pub async fn run_tool<T, F, Fut>(&mut self, op: F) -> Result<T, ClientError>
    where
        F: FnOnce(Arc<dyn Backend>, ToolContext) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let result = match self.tool_context() {
            Ok(ctx) => op(Arc::clone(&self.backend), ctx).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(value) => Ok(value),
            Err(e) => Err(self.fail(e).await),
        }
    }

    pub async fn reload_records<T>(&mut self, list: &mut RecordList<T>) -> Result<(), ClientError>
    where
        T: DeserializeOwned + Identified,
    {
        let result = match self.tool_context() {
            Ok(ctx) => list.reload(self.backend.as_ref(), &ctx).await.map(|_| ()),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e).await),
        }
    }

    /// Deletes a saved record and refetches its list.
    pub async fn delete_record<T>(&mut self, list: &mut RecordList<T>, id: i64) -> Result<(), ClientError>
    where
        T: DeserializeOwned + Identified,
    {
        let result = match self.tool_context() {
            Ok(ctx) => list.delete(self.backend.as_ref(), &ctx, id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                self.notifications.success(Message::RecordDeleted.text(self.language));
                Ok(())
            }
            Err(e) => Err(self.fail(e).await),
        }
    }
}
