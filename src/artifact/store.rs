//! Object storage holding rendered charts

use super::ArtifactKey;
use async_trait::async_trait;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{
    BehaviorVersion, Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("chart {0} not found in storage")]
    NotFound(ArtifactKey),
    #[error("chart {0} is empty")]
    Empty(ArtifactKey),
    #[error("storage request failed: {0}")]
    Request(String),
}

/// Chart image storage. The plot service writes, the conversation reads.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>, StorageError>;

    async fn put(&self, key: &ArtifactKey, bytes: Vec<u8>) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: ArtifactStore + ?Sized> ArtifactStore for Arc<T> {
    async fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>, StorageError> {
        (**self).fetch(key).await
    }

    async fn put(&self, key: &ArtifactKey, bytes: Vec<u8>) -> Result<(), StorageError> {
        (**self).put(key, bytes).await
    }
}

/// Static access key pair for the storage account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// S3-compatible storage with signed requests and path-style addressing
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ArtifactStore {
    pub fn new(
        endpoint: &str,
        region: &str,
        bucket: impl Into<String>,
        credentials: StorageCredentials,
        timeout: Duration,
    ) -> Self {
        let credentials = Credentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            None,
            None,
            "coinstat",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(endpoint.trim_end_matches('/'))
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .force_path_style(true)
            // Third-party S3 implementations reject the SDK's default checksum trailers
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .is_some_and(GetObjectError::is_no_such_key)
                    || err
                        .raw_response()
                        .is_some_and(|raw| raw.status().as_u16() == 404);
                if missing {
                    return Err(StorageError::NotFound(key.clone()));
                }
                return Err(StorageError::Request(DisplayErrorContext(&err).to_string()));
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?
            .into_bytes();
        if bytes.is_empty() {
            return Err(StorageError::Empty(key.clone()));
        }
        tracing::debug!(key = %key, size = bytes.len(), "Downloaded chart");
        Ok(bytes.to_vec())
    }

    async fn put(&self, key: &ArtifactKey, bytes: Vec<u8>) -> Result<(), StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .content_type("image/png")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Request(DisplayErrorContext(&e).to_string()))?;
        tracing::debug!(key = %key, size, "Uploaded chart");
        Ok(())
    }
}

/// In-process store, for local runs and tests
#[derive(Default)]
pub struct MemoryArtifactStore {
    objects: Mutex<HashMap<ArtifactKey, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn fetch(&self, key: &ArtifactKey) -> Result<Vec<u8>, StorageError> {
        let objects = self
            .objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match objects.get(key) {
            Some(bytes) if bytes.is_empty() => Err(StorageError::Empty(key.clone())),
            Some(bytes) => Ok(bytes.clone()),
            None => Err(StorageError::NotFound(key.clone())),
        }
    }

    async fn put(&self, key: &ArtifactKey, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.clone(), bytes);
        Ok(())
    }
}
