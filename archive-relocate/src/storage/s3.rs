//! S3-compatible object store uploader.

use super::{ensure_regular_file, UploadError, Uploader};
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::fmt;
use std::path::Path;
use tokio::runtime::Runtime;

/// Default region; most on-premise S3 gateways ignore it.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for an S3-compatible endpoint.
#[derive(Clone)]
pub struct S3Settings {
    /// Endpoint URL, e.g. `https://s3.internal:9000`. `None` uses AWS.
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Path-style addressing (`endpoint/bucket/key`), required by Ceph and MinIO.
    pub force_path_style: bool,
}

impl S3Settings {
    pub fn new(
        endpoint: Option<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: DEFAULT_REGION.to_string(),
            force_path_style: true,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

impl fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Settings")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// Uploader backed by the AWS S3 SDK.
///
/// The SDK is async; this type owns a current-thread Tokio runtime and blocks
/// on it for each upload. It must not be used from inside another runtime.
pub struct S3Uploader {
    client: Client,
    runtime: Runtime,
}

impl S3Uploader {
    pub fn new(settings: &S3Settings) -> Result<Self, UploadError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .map_err(|e| UploadError::Setup(format!("tokio runtime: {}", e)))?;

        let credentials = Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "archive-relocate",
        );
        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(settings.force_path_style);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        let client = {
            let _guard = runtime.enter();
            Client::from_conf(builder.build())
        };

        Ok(Self { client, runtime })
    }
}

impl Uploader for S3Uploader {
    fn upload_file(
        &self,
        local_path: &Path,
        bucket: &str,
        target_path: &str,
    ) -> Result<(), UploadError> {
        ensure_regular_file(local_path)?;

        self.runtime.block_on(async {
            let body = ByteStream::from_path(local_path)
                .await
                .map_err(|e| UploadError::Io {
                    path: local_path.to_path_buf(),
                    source: std::io::Error::other(e),
                })?;

            self.client
                .put_object()
                .bucket(bucket)
                .key(target_path)
                .body(body)
                .send()
                .await
                .map_err(|e| {
                    UploadError::Request(format!(
                        "put_object {}/{}: {}",
                        bucket,
                        target_path,
                        DisplayErrorContext(&e)
                    ))
                })?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = S3Settings::new(Some("http://localhost:9000".into()), "ak", "sk");
        assert_eq!(settings.region, DEFAULT_REGION);
        assert!(settings.force_path_style);

        let settings = settings.with_region("eu-west-1");
        assert_eq!(settings.region, "eu-west-1");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = S3Settings::new(None, "access", "very-secret");
        let debug = format!("{:?}", settings);
        assert!(debug.contains("access"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_missing_file_fails_before_any_request() {
        let settings = S3Settings::new(Some("http://127.0.0.1:9".into()), "ak", "sk");
        let uploader = S3Uploader::new(&settings).unwrap();
        let err = uploader
            .upload_file(Path::new("/definitely/not/here.tgz"), "bucket", "key")
            .unwrap_err();
        assert!(matches!(err, UploadError::MissingFile(_)));
    }
}
