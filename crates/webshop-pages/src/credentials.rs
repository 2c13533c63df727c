// Account credentials and the shared-account fixture
//
// Tests that need an already registered user share one account per test
// binary. The account is registered lazily by whichever test asks first;
// everyone else waits on the same cell. An optional JSON file backs the
// cell so a run can reuse an account registered earlier (see `xtask
// register`).

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pages::registration::{Gender, Registration, RegistrationPage};
use crate::session::Session;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Email and password of one registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Email that no earlier run can have registered:
/// `testuser{unix_millis}{0..1000}@example.com`
pub fn generate_unique_email() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let salt: u32 = rand::rng().random_range(0..1000);
    format!("testuser{millis}{salt}@example.com")
}

/// Single-record credential file.
///
/// Saving overwrites whatever was there; the write goes to a sibling file
/// first and is renamed into place so readers never see half a record.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored record; `Ok(None)` when nothing was saved yet.
    pub async fn load(&self) -> Result<Option<Credentials>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub async fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(credentials)?;
        let temp = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }
}

/// Registers a fresh account through the registration form.
///
/// The session ends up logged in as the new user on `/registerresult`.
pub async fn register_account(session: &Session) -> Result<Credentials> {
    let credentials = Credentials::new(generate_unique_email(), &session.config().password);
    let registration: RegistrationPage = session.open();
    registration.navigate_to_registration_page().await?;
    registration
        .register_user(&Registration::new_user(
            Gender::Male,
            "Test",
            "User",
            &credentials.email,
            &credentials.password,
        ))
        .await?;
    registration.verify_successful_registration().await?;
    info!(email = %credentials.email, "registered account");
    Ok(credentials)
}

/// Lazily registered account shared by every test in a binary.
///
/// ```ignore
/// static ACCOUNT: SharedAccount = SharedAccount::new();
/// let credentials = ACCOUNT.get_or_register(&config).await?;
/// ```
pub struct SharedAccount {
    cell: OnceCell<Credentials>,
}

impl SharedAccount {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// The shared account, registering it on first use.
    ///
    /// When `config.credentials_file` is set, a record found there is used
    /// as is, and a newly registered account is written back to it.
    pub async fn get_or_register(&self, config: &Config) -> Result<&Credentials> {
        self.cell
            .get_or_try_init(|| async {
                let store = config.credentials_file.as_ref().map(CredentialStore::new);
                if let Some(store) = &store
                    && let Some(saved) = store.load().await?
                {
                    info!(email = %saved.email, "reusing stored account");
                    return Ok(saved);
                }

                let session = Session::start(config).await?;
                let registered = register_account(&session).await;
                session.close().await?;
                let credentials = registered?;

                if let Some(store) = &store {
                    store.save(&credentials).await?;
                }
                Ok::<_, Error>(credentials)
            })
            .await
    }

    /// Whether the account has been produced yet
    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }
}

impl Default for SharedAccount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_email_shape() {
        let email = generate_unique_email();
        assert!(email.starts_with("testuser"));
        assert!(email.ends_with("@example.com"));
        let digits = &email["testuser".len()..email.len() - "@example.com".len()];
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_credentials_json_shape() {
        let creds = Credentials::new("a@example.com", "Secret123!");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "email": "a@example.com", "password": "Secret123!" })
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("testData.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested").join("testData.json"));
        let creds = Credentials::new("first@example.com", "Secret123!");
        store.save(&creds).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(creds));
    }

    #[tokio::test]
    async fn test_save_overwrites_single_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("testData.json"));
        store
            .save(&Credentials::new("first@example.com", "one"))
            .await
            .unwrap();
        store
            .save(&Credentials::new("second@example.com", "two"))
            .await
            .unwrap();
        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.email, "second@example.com");
        assert!(!dir.path().join("testData.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testData.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = CredentialStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_shared_account_prefers_stored_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testData.json");
        let saved = Credentials::new("saved@example.com", "Secret123!");
        CredentialStore::new(&path).save(&saved).await.unwrap();

        let config = Config::new("http://127.0.0.1:9", "Secret123!")
            .unwrap()
            .with_credentials_file(&path);
        let account = SharedAccount::new();
        assert!(!account.is_ready());
        let got = account.get_or_register(&config).await.unwrap();
        assert_eq!(got, &saved);
        assert!(account.is_ready());
    }
}
