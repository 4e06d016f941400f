pub mod sigv4;

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::config::StorageConfig;
use sigv4::Credentials;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid object name: {0}")]
    InvalidKey(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("object store rejected request: {0}")]
    Remote(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("storage configuration error: {0}")]
    Config(String),
}

/// Where an upload ended up
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Object key (cloud) or filesystem path (local)
    pub path: String,
    pub url: String,
}

/// A place uploaded bytes can be written to and later fetched from.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn put(
        &self,
        owner_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Whether a recorded `file_path` was written by this backend
    fn owns(&self, file_path: &str) -> bool;

    /// URL a browser can fetch the object from
    fn download_url(&self, file_id: i64, file_path: &str) -> Result<String, StorageError>;
}

/// Strip directories and anything awkward in a URL or on disk.
pub fn sanitize_file_name(file_name: &str) -> Result<String, StorageError> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(StorageError::InvalidKey(file_name.to_string()));
    }
    Ok(cleaned)
}

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a stored upload by its bare name, as served from `/files/local/{name}`.
    pub async fn read_named(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(StorageError::InvalidKey(name.to_string()));
        }
        self.read_path(&self.root.join(name).to_string_lossy()).await
    }

    pub async fn read_path(&self, file_path: &str) -> Result<Vec<u8>, StorageError> {
        match tokio::fs::read(file_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound(file_path.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn put(
        &self,
        _owner_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let stored_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(file_name)?);
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Wrote local upload {}", path.display());

        Ok(StoredObject {
            path: path.to_string_lossy().into_owned(),
            url: format!("/api/v1/files/local/{}", stored_name),
        })
    }

    /// Paths this store writes are a single entry directly under `root`.
    fn owns(&self, file_path: &str) -> bool {
        let path = Path::new(file_path);
        path.parent() == Some(self.root.as_path())
            && path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n != "." && n != "..")
    }

    fn download_url(&self, file_id: i64, _file_path: &str) -> Result<String, StorageError> {
        Ok(format!("/api/v1/files/{}/download", file_id))
    }
}

/// Cloudflare R2 (or any S3-compatible endpoint) with path-style addressing.
pub struct R2Store {
    client: reqwest::Client,
    endpoint: Url,
    bucket: String,
    credentials: Credentials,
    presign_expiry_secs: u64,
}

impl R2Store {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let endpoint = Url::parse(&config.r2_endpoint)
            .map_err(|e| StorageError::Config(format!("invalid R2 endpoint {}: {}", config.r2_endpoint, e)))?;
        if endpoint.host_str().is_none() {
            return Err(StorageError::Config(format!("R2 endpoint has no host: {}", config.r2_endpoint)));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            bucket: config.r2_bucket.clone(),
            credentials: Credentials {
                access_key_id: config.r2_access_key_id.clone(),
                secret_access_key: config.r2_secret_access_key.clone(),
                region: config.r2_region.clone(),
            },
            presign_expiry_secs: config.presign_expiry_secs,
        })
    }

    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    fn canonical_uri(&self, key: &str) -> String {
        format!("/{}/{}", sigv4::uri_encode(&self.bucket, true), sigv4::uri_encode(key, false))
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}://{}{}", self.endpoint.scheme(), self.host(), self.canonical_uri(key))
    }

    pub fn presign(&self, key: &str) -> String {
        let query = sigv4::presign_get(
            &self.credentials,
            &self.host(),
            &self.canonical_uri(key),
            Utc::now(),
            self.presign_expiry_secs,
        );
        format!("{}?{}", self.object_url(key), query)
    }
}

#[async_trait]
impl ObjectStore for R2Store {
    fn name(&self) -> &'static str {
        "r2"
    }

    async fn put(
        &self,
        owner_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let key = format!("{}/{}_{}", owner_id, Utc::now().timestamp(), sanitize_file_name(file_name)?);
        let payload_hash = sigv4::sha256_hex(&bytes);
        let signed = sigv4::sign_put(&self.credentials, &self.host(), &self.canonical_uri(&key), &payload_hash, Utc::now());

        let response = self
            .client
            .put(self.object_url(&key))
            .header("authorization", signed.authorization)
            .header("x-amz-date", signed.amz_date)
            .header("x-amz-content-sha256", signed.content_sha256)
            .header("content-type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Remote(format!("PUT {} returned {}: {}", key, status, body)));
        }

        tracing::info!("Uploaded {} to bucket {}", key, self.bucket);
        Ok(StoredObject {
            url: self.object_url(&key),
            path: key,
        })
    }

    fn owns(&self, file_path: &str) -> bool {
        is_object_key(file_path)
    }

    fn download_url(&self, _file_id: i64, file_path: &str) -> Result<String, StorageError> {
        Ok(self.presign(file_path))
    }
}

/// Matches the `<user_id>/<unix_ts>_<name>` keys written by [`R2Store::put`].
fn is_object_key(key: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let Some((owner, rest)) = key.split_once('/') else {
        return false;
    };
    let Some((timestamp, name)) = rest.split_once('_') else {
        return false;
    };
    all_digits(owner) && all_digits(timestamp) && !name.is_empty() && !name.contains(['/', '\\'])
}

/// Upload routing: cloud when configured, local disk otherwise. Downloads
/// resolve against whichever backend recognises the stored path.
#[derive(Clone)]
pub struct Storage {
    local: Arc<LocalStore>,
    remote: Option<Arc<R2Store>>,
}

impl Storage {
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let remote = if config.r2_enabled() {
            Some(Arc::new(R2Store::new(config)?))
        } else {
            None
        };

        Ok(Self {
            local: Arc::new(LocalStore::new(&config.upload_folder)),
            remote,
        })
    }

    /// Backend new uploads are written to
    pub fn uploader(&self) -> &dyn ObjectStore {
        match &self.remote {
            Some(remote) => remote.as_ref(),
            None => self.local.as_ref(),
        }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Backend holding `file_path`, if any
    pub fn resolve(&self, file_path: &str) -> Option<&dyn ObjectStore> {
        if let Some(remote) = &self.remote {
            if remote.owns(file_path) {
                return Some(remote.as_ref());
            }
        }
        if self.local.owns(file_path) {
            return Some(self.local.as_ref());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn file_names_are_flattened() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\My CV (1).pdf").unwrap(), "My_CV__1_.pdf");
        assert!(matches!(sanitize_file_name(".."), Err(StorageError::InvalidKey(_))));
        assert!(matches!(sanitize_file_name("dir/"), Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn local_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        let stored = store.put(3, "resume.pdf", b"%PDF-1.4".to_vec(), "application/pdf").await.unwrap();
        assert!(stored.url.starts_with("/api/v1/files/local/"));
        assert!(stored.path.ends_with("_resume.pdf"));
        assert!(store.owns(&stored.path));

        let name = stored.url.trim_start_matches("/api/v1/files/local/");
        assert_eq!(store.read_named(name).await.unwrap(), b"%PDF-1.4");
        assert_eq!(store.download_url(9, &stored.path).unwrap(), "/api/v1/files/9/download");
    }

    #[tokio::test]
    async fn local_store_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(matches!(store.read_named("../secret").await, Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.read_named("missing.pdf").await, Err(StorageError::NotFound(_))));
    }

    fn r2_config() -> StorageConfig {
        let mut config = AppConfig::development().storage;
        config.r2_endpoint = "https://acct.r2.cloudflarestorage.com".into();
        config.r2_bucket = "prepsphere".into();
        config.r2_access_key_id = "key".into();
        config.r2_secret_access_key = "secret".into();
        config
    }

    #[test]
    fn r2_recognises_its_own_key_shape() {
        let store = R2Store::new(&r2_config()).unwrap();
        assert!(store.owns("12/1700000000_cv.pdf"));
        assert!(store.owns("12/1700000000_my_uploads.pdf"));
        assert!(!store.owns("./uploads/abc_cv.pdf"));
        assert!(!store.owns("1/uploads/cv.pdf"));
        assert!(!store.owns("12/1700000000_"));
        assert!(!store.owns("12/abc_cv.pdf"));
        assert!(!store.owns("12/1700000000_a/b.pdf"));
    }

    #[test]
    fn resolve_presigns_names_containing_uploads() {
        let storage = Storage::from_config(&r2_config()).unwrap();
        let store = storage.resolve("12/1700000000_my_uploads.pdf").expect("r2 owns the key");
        assert_eq!(store.name(), "r2");
        assert!(store.download_url(1, "12/1700000000_my_uploads.pdf").unwrap().contains("X-Amz-Signature="));
    }

    #[test]
    fn local_ownership_is_decided_by_location() {
        let store = LocalStore::new("/srv/uploads");
        assert!(store.owns("/srv/uploads/abc_cv.pdf"));
        assert!(!store.owns("/srv/uploads/nested/abc_cv.pdf"));
        assert!(!store.owns("/srv/other/abc_cv.pdf"));
        assert!(!store.owns("12/1700000000_cv.pdf"));
    }

    #[test]
    fn presigned_url_targets_bucket_path() {
        let store = R2Store::new(&r2_config()).unwrap();
        let url = store.presign("12/1700000000_cv.pdf");
        assert!(url.starts_with("https://acct.r2.cloudflarestorage.com/prepsphere/12/1700000000_cv.pdf?X-Amz-Algorithm="));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[test]
    fn uploads_go_local_without_credentials() {
        let storage = Storage::from_config(&AppConfig::development().storage).unwrap();
        assert_eq!(storage.uploader().name(), "local");
        assert!(storage.resolve("12/1700000000_cv.pdf").is_none());

        let storage = Storage::from_config(&r2_config()).unwrap();
        assert_eq!(storage.uploader().name(), "r2");
        assert_eq!(storage.resolve("12/1700000000_cv.pdf").map(|s| s.name()), Some("r2"));
    }

    #[test]
    fn bad_endpoint_is_a_config_error() {
        let mut config = r2_config();
        config.r2_endpoint = "not a url".into();
        assert!(matches!(R2Store::new(&config), Err(StorageError::Config(_))));
    }
}
