use std::collections::HashMap;
use std::sync::Mutex;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::get_config;
use crate::error::AppError;

/// Blob storage the asset worker writes generated media into. Keys are
/// deterministic paths derived from owner/plan/asset identity, so a
/// regenerated asset overwrites its previous object.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Public URL under which a stored object can be fetched.
    fn public_url(&self, key: &str) -> String;
}

#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    pub bucket_name: String,
}

impl S3BlobStore {
    pub async fn new() -> Self {
        let config = get_config();

        let credentials = aws_sdk_s3::config::Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "manual_config",
        );

        let region = aws_sdk_s3::config::Region::new(config.aws_region.clone());

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.s3_endpoint {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());

        Self {
            client,
            bucket_name: config.s3_bucket_name.clone(),
        }
    }

    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let resp = self.client.head_bucket().bucket(&self.bucket_name).send().await;

        if resp.is_ok() {
            return Ok(());
        }

        tracing::info!("bucket {} does not exist, attempting to create", self.bucket_name);
        self.client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("failed to create bucket: {e:?}");
                AppError::Internal(format!("Failed to create S3 bucket: {e}"))
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(aws_sdk_s3::types::ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("S3 upload error: {e:?}");
                AppError::Upload(format!("S3 put failed: {e}"))
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        let config = get_config();
        if let Some(endpoint) = &config.s3_endpoint {
            format!("{}/{}/{}", endpoint, self.bucket_name, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket_name, config.aws_region, key
            )
        }
    }
}

/// In-memory store used by the test suites in place of S3.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}
