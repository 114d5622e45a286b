use std::{
    future::Future,
    io::ErrorKind,
    path::PathBuf,
    sync::Mutex,
};

use chrono::{DateTime, Utc};

use crate::{
    errors::StoreError,
    types::{Credentials, StoredCredentials},
};

/// Persistence for the single credential record of this installation.
///
/// There is no locking: one process is assumed to touch the record at a time.
pub trait CredentialStore {
    /// Fails with [`StoreError::NotFound`] when no record exists and with
    /// [`StoreError::Corrupt`] when one exists but cannot be parsed.
    fn load(&self) -> impl Future<Output = Result<StoredCredentials, StoreError>> + Send;

    /// Replaces the stored record.
    fn save(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// JSON file store. The file's modification time doubles as the issue time
/// of the token it holds, since every issuance and refresh rewrites it.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<StoredCredentials, StoreError> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
                _ => StoreError::Io(e),
            })?;

        let credentials: Credentials =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        let saved_at = async_fs::metadata(&self.path)
            .await?
            .modified()
            .map(DateTime::<Utc>::from)?;

        Ok(StoredCredentials {
            credentials,
            saved_at,
        })
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credentials).map_err(std::io::Error::other)?;
        async_fs::write(&self.path, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            async_fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        Ok(())
    }
}

/// Process-local store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<StoredCredentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a record saved at `saved_at`.
    pub fn with_credentials(credentials: Credentials, saved_at: DateTime<Utc>) -> Self {
        Self {
            record: Mutex::new(Some(StoredCredentials {
                credentials,
                saved_at,
            })),
        }
    }

    /// The current record, if any.
    pub fn current(&self) -> Option<Credentials> {
        self.lock().as_ref().map(|stored| stored.credentials.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoredCredentials>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<StoredCredentials, StoreError> {
        self.lock()
            .clone()
            .ok_or_else(|| StoreError::NotFound(PathBuf::from("<memory>")))
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        *self.lock() = Some(StoredCredentials {
            credentials: credentials.clone(),
            saved_at: Utc::now(),
        });
        Ok(())
    }
}
