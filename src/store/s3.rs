//! S3 implementation of [`ObjectStore`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;

use super::{ListPage, ObjectStore, ObjectStoreError};
use crate::config::AwsSettings;

/// S3 client handle. Cheap to clone; each worker holds its own.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client from static credentials in the settings.
    pub async fn new(settings: &AwsSettings) -> Self {
        let credentials = Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "siphon_static",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        Self {
            client: Client::from_conf(aws_sdk_s3::Config::from(&shared)),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        marker: Option<&str>,
    ) -> Result<ListPage, ObjectStoreError> {
        let mut request = self.client.list_objects().bucket(bucket).prefix(prefix);
        if let Some(marker) = marker {
            request = request.marker(marker);
        }

        let response = request.send().await.map_err(|e| ObjectStoreError {
            bucket: bucket.to_string(),
            message: e.to_string(),
        })?;

        let keys = response
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|object| object.key)
            .collect();

        Ok(ListPage {
            keys,
            is_truncated: response.is_truncated.unwrap_or(false),
        })
    }
}
