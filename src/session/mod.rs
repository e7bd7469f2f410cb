//! Turns the persisted token into a validated [`User`], or clears it.
//!
//! A user is only ever known after `/auth/me` accepted the token. Any failure
//! while validating (rejection, network, bad payload) clears the token.

use crate::api::{Backend, Credentials, PasswordChange, ProfileUpdate, Registration, User};
use crate::error::ClientError;
use crate::i18n::Message;
use crate::storage::PersistedStore;
use std::sync::Arc;

pub struct SessionResolver {
    backend: Arc<dyn Backend>,
    store: PersistedStore,
    user: Option<User>,
    loading: bool,
}

impl SessionResolver {
    pub fn new(backend: Arc<dyn Backend>, store: PersistedStore) -> Self {
        Self {
            backend,
            store,
            user: None,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Token of the validated session. `None` whenever no user is resolved,
    /// even if a token is still on disk.
    pub fn token(&self) -> Option<String> {
        self.user.as_ref()?;
        self.store.token()
    }

    /// Reads the stored token and validates it. No token means no request.
    pub async fn resolve_session(&mut self) -> Option<&User> {
        if let Err(e) = self.fetch_user().await {
            log::info!("Session not restored: {}", e);
        }
        self.user.as_ref()
    }

    async fn fetch_user(&mut self) -> Result<User, ClientError> {
        let Some(token) = self.store.token() else {
            self.user = None;
            return Err(ClientError::NotAuthenticated);
        };

        self.loading = true;
        let result = self.backend.me(&token).await;
        self.loading = false;

        match result {
            Ok(user) => {
                log::info!("Session restored for user {}", user.id);
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                log::warn!("Failed to fetch user, clearing token: {}", e);
                if let Err(e) = self.store.clear_token() {
                    log::error!("Failed to clear stored token: {}", e);
                }
                self.user = None;
                Err(e.into())
            }
        }
    }

    /// Exchanges credentials for a token, stores it, then validates it.
    /// A rejected login leaves the stored token as it was.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(Message::FieldRequired));
        }

        let token = self
            .backend
            .login(&Credentials {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        self.store.set_token(&token.access_token)?;
        self.fetch_user().await
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<User, ClientError> {
        if email.trim().is_empty() || password.is_empty() || full_name.trim().is_empty() {
            return Err(ClientError::Validation(Message::FieldRequired));
        }

        self.backend
            .register(&Registration {
                email: email.trim().to_string(),
                password: password.to_string(),
                full_name: full_name.trim().to_string(),
            })
            .await?;

        self.login(email, password).await
    }

    /// The in-memory user is dropped even when the stored token cannot be.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.user = None;
        self.store.clear_token()?;
        Ok(())
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        let user = self.backend.update_profile(&token, update).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), ClientError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(ClientError::Validation(Message::FieldRequired));
        }
        if new_password != confirm_password {
            return Err(ClientError::Validation(Message::PasswordsDoNotMatch));
        }

        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        self.backend
            .change_password(
                &token,
                &PasswordChange {
                    current_password: current_password.to_string(),
                    new_password: new_password.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}
