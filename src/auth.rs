//! Demo authentication and the persisted session.
//!
//! Credentials are checked against a fixed in-memory table. The logged-in
//! user (without password) is the only thing persisted between runs: it is
//! stored as JSON under the `user` key of a [`SessionStore`].

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::fields::Role;
use crate::snapshot::write_atomic;
use crate::team::demo_team;

/// Key the session user is stored under.
pub const SESSION_KEY: &str = "user";

pub const DEMO_EMAIL: &str = "arjun@example.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;

/// Form-level checks applied before credentials reach the service.
pub fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    let email = email.trim();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !well_formed {
        return Err(AppError::validation("Invalid email address"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Credential checks plus a display name for new accounts.
pub fn validate_registration(name: &str, email: &str, password: &str) -> AppResult<()> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        return Err(AppError::validation(format!(
            "Name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    validate_credentials(email, password)
}

/// The logged-in user as stored in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
struct Credential {
    user: User,
    password: String,
}

/// Confirmation emitted by a successful auth action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn { user_id: String },
    Registered { user_id: String },
    LoggedOut,
}

impl AuthEvent {
    pub fn message(&self) -> &'static str {
        match self {
            AuthEvent::LoggedIn { .. } => "Login successful!",
            AuthEvent::Registered { .. } => "Registration successful!",
            AuthEvent::LoggedOut => "Logged out successfully",
        }
    }
}

/// Key-value persistence for the session.
pub trait SessionStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSessionStore { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| AppError::file(path, e))
    }

    fn set(&mut self, key: &str, value: &str) -> AppResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| AppError::file(&self.dir, e))?;
        write_atomic(&self.path(key), value)
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| AppError::file(path, e))?;
        }
        Ok(())
    }
}

fn demo_credentials() -> Vec<Credential> {
    vec![
        Credential {
            user: User {
                id: "user1".into(),
                name: "Arjun Sharma".into(),
                email: "arjun@example.com".into(),
                role: Role::Admin,
            },
            password: DEMO_PASSWORD.into(),
        },
        Credential {
            user: User {
                id: "user2".into(),
                name: "Priya Patel".into(),
                email: "priya@example.com".into(),
                role: Role::Member,
            },
            password: DEMO_PASSWORD.into(),
        },
    ]
}

/// Login, registration and logout over a session store.
#[derive(Debug)]
pub struct AuthService<S: SessionStore> {
    credentials: Vec<Credential>,
    session: S,
    user: Option<User>,
}

impl<S: SessionStore> AuthService<S> {
    /// Start from the demo credentials and restore any saved session.
    /// A saved record that cannot be parsed is discarded.
    pub fn restore(session: S) -> Self {
        let mut service = AuthService {
            credentials: demo_credentials(),
            session,
            user: None,
        };
        match service.session.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!(user_id = %user.id, "restored session");
                    service.user = Some(user);
                }
                Err(e) => {
                    error!(error = %e, "failed to parse saved user, clearing session");
                    if let Err(e) = service.session.remove(SESSION_KEY) {
                        warn!(error = %e, "failed to clear corrupt session");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read saved session"),
        }
        service
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Check credentials and start a session.
    pub fn login(&mut self, email: &str, password: &str) -> AppResult<AuthEvent> {
        let Some(user) = self
            .credentials
            .iter()
            .find(|c| c.user.email == email && c.password == password)
            .map(|c| c.user.clone())
        else {
            warn!(email, "login failed");
            return Err(AppError::InvalidCredentials);
        };
        self.start_session(user.clone())?;
        info!(user_id = %user.id, "logged in");
        Ok(AuthEvent::LoggedIn { user_id: user.id })
    }

    /// Create a member account and log it in. Emails must be unique.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AppResult<AuthEvent> {
        if self.credentials.iter().any(|c| c.user.email == email) {
            warn!(email, "registration rejected: email taken");
            return Err(AppError::EmailTaken);
        }
        let user = User {
            id: self.next_user_id(),
            name: name.to_string(),
            email: email.to_string(),
            role: Role::Member,
        };
        self.credentials.push(Credential {
            user: user.clone(),
            password: password.to_string(),
        });
        self.start_session(user.clone())?;
        info!(user_id = %user.id, "registered");
        Ok(AuthEvent::Registered { user_id: user.id })
    }

    /// End the session and forget the saved user.
    pub fn logout(&mut self) -> AppResult<AuthEvent> {
        self.user = None;
        self.session.remove(SESSION_KEY)?;
        info!("logged out");
        Ok(AuthEvent::LoggedOut)
    }

    /// `user{n}` past every id in use, roster members included.
    fn next_user_id(&self) -> String {
        let last = demo_team()
            .into_iter()
            .map(|m| m.id)
            .chain(self.credentials.iter().map(|c| c.user.id.clone()))
            .filter_map(|id| id.strip_prefix("user")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("user{}", last + 1)
    }

    fn start_session(&mut self, user: User) -> AppResult<()> {
        let raw = serde_json::to_string(&user)?;
        self.session.set(SESSION_KEY, &raw)?;
        self.user = Some(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> AuthService<FileSessionStore> {
        AuthService::restore(FileSessionStore::new(dir.path()))
    }

    #[test]
    fn login_persists_user_without_password() {
        let dir = TempDir::new().unwrap();
        let mut auth = service(&dir);
        assert!(!auth.is_authenticated());

        let event = auth.login("arjun@example.com", "password123").unwrap();
        assert_eq!(event, AuthEvent::LoggedIn { user_id: "user1".into() });

        let raw = fs::read_to_string(dir.path().join("user.json")).unwrap();
        assert!(!raw.contains("password"));

        let restored = service(&dir);
        assert_eq!(restored.current_user().map(|u| u.id.as_str()), Some("user1"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut auth = service(&dir);
        let err = auth.login("arjun@example.com", "nope").unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn register_rejects_existing_email() {
        let dir = TempDir::new().unwrap();
        let mut auth = service(&dir);
        assert!(matches!(
            auth.register("Copy", "priya@example.com", "password1"),
            Err(AppError::EmailTaken)
        ));

        let event = auth.register("Kavya Rao", "kavya@example.com", "secret123").unwrap();
        assert_eq!(event, AuthEvent::Registered { user_id: "user5".into() });
        assert!(crate::team::find_member(&crate::team::demo_team(), "user5").is_none());
        assert_eq!(auth.current_user().map(|u| u.role), Some(Role::Member));

        auth.logout().unwrap();
        assert!(auth.login("kavya@example.com", "secret123").is_ok());
    }

    #[test]
    fn logout_clears_saved_session() {
        let dir = TempDir::new().unwrap();
        let mut auth = service(&dir);
        auth.login("priya@example.com", "password123").unwrap();
        assert_eq!(auth.logout().unwrap().message(), "Logged out successfully");
        assert!(!dir.path().join("user.json").exists());
        assert!(!service(&dir).is_authenticated());
    }

    #[test]
    fn credential_format_is_checked() {
        assert!(validate_credentials(DEMO_EMAIL, DEMO_PASSWORD).is_ok());
        assert!(validate_credentials("arjun.example.com", DEMO_PASSWORD).is_err());
        assert!(validate_credentials("arjun@example", DEMO_PASSWORD).is_err());
        let err = validate_credentials(DEMO_EMAIL, "short").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Password must be at least 8 characters");
    }

    #[test]
    fn registration_needs_a_real_name() {
        let err = validate_registration("A", "a@b.co", "password123").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Name must be at least 2 characters");
        assert!(validate_registration("  ", "a@b.co", "password123").is_err());
        assert!(validate_registration("Al", "a@b.co", "short").is_err());
        assert!(validate_registration("Al", "a@b.co", "password123").is_ok());
    }

    #[test]
    fn registered_ids_keep_counting() {
        let dir = TempDir::new().unwrap();
        let mut auth = service(&dir);
        auth.register("Kavya Rao", "kavya@example.com", "secret123").unwrap();
        let event = auth.register("Dev Iyer", "dev@example.com", "secret123").unwrap();
        assert_eq!(event, AuthEvent::Registered { user_id: "user6".into() });
    }

    #[test]
    fn corrupt_session_is_discarded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("user.json"), "{not json").unwrap();
        let auth = service(&dir);
        assert!(!auth.is_authenticated());
        assert!(!dir.path().join("user.json").exists());
    }
}
