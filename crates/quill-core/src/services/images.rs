use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::domain::Violations;
use crate::error::DomainError;
use crate::ports::{ImageStore, StorageError};

/// Input of `posts.uploadImage`: raw base64 or a `data:<mime>;base64,` URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadImage {
    pub filename: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Decodes uploaded images and hands them to an [`ImageStore`].
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
    max_bytes: usize,
}

impl ImageService {
    pub fn new(store: Arc<dyn ImageStore>, max_bytes: usize) -> Self {
        Self { store, max_bytes }
    }

    pub async fn upload(&self, input: UploadImage) -> Result<UploadedImage, DomainError> {
        let bytes = self.decode(&input.data)?;
        let name = format!(
            "{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_filename(&input.filename)
        );

        let url = self.store.put(&name, &bytes).await.map_err(|e| match e {
            StorageError::InvalidName(msg) => DomainError::invalid("filename", msg),
            StorageError::Io(msg) => DomainError::Internal(msg),
        })?;

        tracing::info!(%url, size = bytes.len(), "Image uploaded");
        Ok(UploadedImage { url })
    }

    fn decode(&self, data: &str) -> Result<Vec<u8>, DomainError> {
        let payload = strip_data_url(data.trim());
        if payload.is_empty() {
            return Err(DomainError::invalid("data", "must not be empty"));
        }

        let mut violations = Violations::new();
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| DomainError::invalid("data", format!("is not valid base64: {e}")))?;
        if bytes.len() > self.max_bytes {
            violations.add(
                "data",
                format!("must decode to at most {} bytes", self.max_bytes),
            );
        }
        violations.finish()?;
        Ok(bytes)
    }
}

/// `data:image/png;base64,AAAA` -> `AAAA`; anything else is returned as is.
fn strip_data_url(data: &str) -> &str {
    data.strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .unwrap_or(data)
}

/// Keep only `[A-Za-z0-9._-]`.
fn sanitize_filename(name: &str) -> String {
    let clean: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let clean = clean.trim_start_matches('.');
    if clean.is_empty() {
        "image".to_string()
    } else {
        clean.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct CapturingStore {
        saved: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl ImageStore for CapturingStore {
        async fn put(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
            self.saved
                .lock()
                .unwrap()
                .push((name.to_string(), bytes.to_vec()));
            Ok(format!("/uploads/{name}"))
        }
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        assert_eq!(strip_data_url("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url("QUJD"), "QUJD");
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("my photo (1).png"), "myphoto1.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("ü"), "image");
    }

    #[tokio::test]
    async fn upload_decodes_and_stores() {
        let store = Arc::new(CapturingStore::default());
        let service = ImageService::new(store.clone(), 1024);

        let uploaded = service
            .upload(UploadImage {
                filename: "cover.png".into(),
                data: "data:image/png;base64,aGVsbG8=".into(),
            })
            .await
            .unwrap();

        assert!(uploaded.url.starts_with("/uploads/"));
        assert!(uploaded.url.ends_with("-cover.png"));
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved[0].1, b"hello");
    }

    #[tokio::test]
    async fn bad_payloads_are_validation_errors() {
        let service = ImageService::new(Arc::new(CapturingStore::default()), 4);

        for data in ["", "not base64!!", "aGVsbG8="] {
            let result = service
                .upload(UploadImage {
                    filename: "x.png".into(),
                    data: data.into(),
                })
                .await;
            assert!(matches!(result, Err(DomainError::Validation(_))), "{data:?}");
        }
    }
}
