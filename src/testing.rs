//! In-memory backend used by the unit tests.

use crate::api::{
    ApiError, AuthToken, Backend, Credentials, PasswordChange, ProfileUpdate, Registration, User,
    Workspace, WorkspaceInput,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

pub const EMAIL: &str = "ada@gipoly.test";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "abc123";

pub fn user(id: i64, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        full_name: Some("Ada".to_string()),
        website_url: None,
        store_platform: None,
        created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn workspace(id: i64, slug: &str) -> Workspace {
    Workspace {
        id,
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        store_url: None,
        store_platform: None,
        created_at: None,
        owner_id: Some(1),
        user_role: Some("owner".to_string()),
    }
}

pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    accounts: Mutex<HashMap<String, (String, String)>>,
    sessions: Mutex<HashMap<String, User>>,
    workspaces: Mutex<Vec<Workspace>>,
    tool_data: Mutex<HashMap<String, Value>>,
    pub network_down: AtomicBool,
    pub workspace_fetch_fails: AtomicBool,
    pub workspace_fetch_unauthorized: AtomicBool,
    /// Revokes the caller's token once a delete has gone through.
    pub revoke_after_delete: AtomicBool,
    next_id: AtomicI64,
}

impl FakeBackend {
    /// One account (`EMAIL`/`PASSWORD`) whose token `TOKEN` is valid for user 1.
    pub fn new() -> Self {
        let backend = Self {
            calls: Mutex::new(Vec::new()),
            accounts: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
            workspaces: Mutex::new(Vec::new()),
            tool_data: Mutex::new(HashMap::new()),
            network_down: AtomicBool::new(false),
            workspace_fetch_fails: AtomicBool::new(false),
            workspace_fetch_unauthorized: AtomicBool::new(false),
            revoke_after_delete: AtomicBool::new(false),
            next_id: AtomicI64::new(100),
        };
        backend
            .accounts
            .lock()
            .unwrap()
            .insert(EMAIL.to_string(), (PASSWORD.to_string(), TOKEN.to_string()));
        backend
            .sessions
            .lock()
            .unwrap()
            .insert(TOKEN.to_string(), user(1, EMAIL));
        backend
    }

    pub fn with_workspaces(self, workspaces: Vec<Workspace>) -> Self {
        *self.workspaces.lock().unwrap() = workspaces;
        self
    }

    pub fn with_tool_data(self, path: &str, value: Value) -> Self {
        self.tool_data.lock().unwrap().insert(path.to_string(), value);
        self
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.lock().unwrap().remove(token);
    }

    fn revoke_if_requested(&self, token: &str) {
        if self.revoke_after_delete.load(Ordering::SeqCst) {
            self.revoke(token);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn workspace_list(&self) -> Vec<Workspace> {
        self.workspaces.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call.into());
        if self.network_down.load(Ordering::SeqCst) {
            return Err(ApiError::RequestError("connection refused".to_string()));
        }
        Ok(())
    }

    fn authorize(&self, token: &str) -> Result<User, ApiError> {
        self.sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(ApiError::Unauthorized {
                detail: Some("Could not validate credentials".to_string()),
            })
    }

    fn not_found(detail: &str) -> ApiError {
        ApiError::ApiError {
            status: 404,
            detail: detail.to_string(),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, ApiError> {
        self.record("login")?;
        match self.accounts.lock().unwrap().get(&credentials.email) {
            Some((password, token)) if *password == credentials.password => Ok(AuthToken {
                access_token: token.clone(),
                token_type: "bearer".to_string(),
            }),
            _ => Err(ApiError::Unauthorized {
                detail: Some("Invalid credentials".to_string()),
            }),
        }
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        self.record("register")?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&registration.email) {
            return Err(ApiError::ApiError {
                status: 400,
                detail: "Email already registered.".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let token = format!("token-{}", id);
        let mut created = user(id, &registration.email);
        created.full_name = Some(registration.full_name.clone());
        accounts.insert(
            registration.email.clone(),
            (registration.password.clone(), token.clone()),
        );
        self.sessions.lock().unwrap().insert(token, created.clone());
        Ok(created)
    }

    async fn me(&self, token: &str) -> Result<User, ApiError> {
        self.record("me")?;
        self.authorize(token)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.record("update_profile")?;
        self.authorize(token)?;
        let mut sessions = self.sessions.lock().unwrap();
        let current = sessions.get_mut(token).ok_or(ApiError::Unauthorized { detail: None })?;
        if let Some(name) = &update.full_name {
            current.full_name = Some(name.clone());
        }
        if let Some(url) = &update.website_url {
            current.website_url = Some(url.clone());
        }
        if let Some(platform) = &update.store_platform {
            current.store_platform = Some(platform.clone());
        }
        Ok(current.clone())
    }

    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), ApiError> {
        self.record("change_password")?;
        let owner = self.authorize(token)?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&owner.email)
            .ok_or_else(|| Self::not_found("User not found."))?;
        if account.0 != change.current_password {
            return Err(ApiError::ApiError {
                status: 400,
                detail: "Current password is incorrect.".to_string(),
            });
        }
        account.0 = change.new_password.clone();
        Ok(())
    }

    async fn list_workspaces(&self, token: &str) -> Result<Vec<Workspace>, ApiError> {
        self.record("list_workspaces")?;
        self.authorize(token)?;
        if self.workspace_fetch_fails.load(Ordering::SeqCst) {
            return Err(ApiError::RequestError("timed out".to_string()));
        }
        if self.workspace_fetch_unauthorized.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized { detail: None });
        }
        Ok(self.workspace_list())
    }

    async fn create_workspace(&self, token: &str, input: &WorkspaceInput) -> Result<Workspace, ApiError> {
        self.record("create_workspace")?;
        self.authorize(token)?;
        let mut workspaces = self.workspaces.lock().unwrap();
        if workspaces.len() >= 3 {
            return Err(ApiError::ApiError {
                status: 400,
                detail: "You can create up to 3 workspaces only.".to_string(),
            });
        }
        let name = input.name.clone().unwrap_or_default();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = workspace(id, &name.to_lowercase().replace(' ', "-"));
        created.name = name;
        created.store_url = input.store_url.clone();
        created.store_platform = input.store_platform.clone();
        workspaces.push(created.clone());
        Ok(created)
    }

    async fn update_workspace(
        &self,
        token: &str,
        slug: &str,
        input: &WorkspaceInput,
    ) -> Result<Workspace, ApiError> {
        self.record(format!("update_workspace {}", slug))?;
        self.authorize(token)?;
        let mut workspaces = self.workspaces.lock().unwrap();
        let found = workspaces
            .iter_mut()
            .find(|w| w.slug == slug)
            .ok_or_else(|| Self::not_found("Workspace not found."))?;
        if let Some(name) = &input.name {
            found.name = name.clone();
        }
        if input.store_url.is_some() {
            found.store_url = input.store_url.clone();
        }
        if input.store_platform.is_some() {
            found.store_platform = input.store_platform.clone();
        }
        Ok(found.clone())
    }

    async fn delete_workspace(&self, token: &str, slug: &str) -> Result<(), ApiError> {
        self.record(format!("delete_workspace {}", slug))?;
        self.authorize(token)?;
        let mut workspaces = self.workspaces.lock().unwrap();
        let before = workspaces.len();
        workspaces.retain(|w| w.slug != slug);
        if workspaces.len() == before {
            return Err(Self::not_found("Workspace not found."));
        }
        self.revoke_if_requested(token);
        Ok(())
    }

    async fn tool_get(&self, token: &str, path: &str, workspace_slug: &str) -> Result<Value, ApiError> {
        self.record(format!("GET {} [{}]", path, workspace_slug))?;
        self.authorize(token)?;
        Ok(self
            .tool_data
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| json!([])))
    }

    async fn tool_post(
        &self,
        token: &str,
        path: &str,
        workspace_slug: &str,
        body: Value,
    ) -> Result<Value, ApiError> {
        self.record(format!("POST {} [{}]", path, workspace_slug))?;
        self.authorize(token)?;
        self.tool_data
            .lock()
            .unwrap()
            .insert(format!("{}#body", path), body);
        self.tool_data
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| ApiError::ApiError {
                status: 500,
                detail: "Analysis failed".to_string(),
            })
    }

    async fn tool_delete(&self, token: &str, path: &str, workspace_slug: &str) -> Result<(), ApiError> {
        self.record(format!("DELETE {} [{}]", path, workspace_slug))?;
        self.authorize(token)?;
        let (parent, id) = path.rsplit_once('/').ok_or_else(|| Self::not_found("Not found"))?;
        let id: i64 = id.parse().map_err(|_| Self::not_found("Not found"))?;
        let mut data = self.tool_data.lock().unwrap();
        let items = data
            .get_mut(parent)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| Self::not_found("Not found"))?;
        let before = items.len();
        items.retain(|item| item.get("id").and_then(Value::as_i64) != Some(id));
        if items.len() == before {
            return Err(Self::not_found("Not found"));
        }
        self.revoke_if_requested(token);
        Ok(())
    }
}

impl FakeBackend {
    /// Body of the last POST to `path`.
    pub fn last_body(&self, path: &str) -> Option<Value> {
        self.tool_data.lock().unwrap().get(&format!("{}#body", path)).cloned()
    }
}
