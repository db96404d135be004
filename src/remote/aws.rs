//! [`ProvisioningApi`] backed by the AWS SDK (IAM + S3).

use super::{ProvisioningApi, RemoteError, RemoteResult};
use crate::policy::PolicyDocument;
use crate::profile::AccessKeyPair;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use tracing::debug;

/// Region where S3 rejects an explicit location constraint
const S3_LEGACY_REGION: &str = "us-east-1";

/// Provider name recorded on the static credentials
const CREDENTIALS_PROVIDER: &str = "bucketkey-profile";

/// IAM and S3 clients authenticated with a resolved profile
#[derive(Debug, Clone)]
pub struct AwsApi {
    iam: aws_sdk_iam::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsApi {
    /// Build clients that use exactly `credentials` and `region`, ignoring
    /// any other credential source in the environment.
    pub async fn connect(credentials: &AccessKeyPair, region: &str) -> Self {
        let credentials = Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            credentials.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER,
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region.to_string()))
            .load()
            .await;

        debug!(region, "created AWS clients");

        Self {
            iam: aws_sdk_iam::Client::new(&config),
            s3: aws_sdk_s3::Client::new(&config),
        }
    }
}

#[async_trait]
impl ProvisioningApi for AwsApi {
    async fn create_identity(&self, username: &str) -> RemoteResult<String> {
        let resp = self
            .iam
            .create_user()
            .user_name(username)
            .send()
            .await
            .map_err(|e| RemoteError::new("CreateUser", DisplayErrorContext(&e).to_string()))?;

        resp.user()
            .map(|user| user.arn().to_string())
            .ok_or_else(|| RemoteError::new("CreateUser", "response did not include the user"))
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> RemoteResult<String> {
        let mut request = self.s3.create_bucket().bucket(bucket);

        if region != S3_LEGACY_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        let resp = request
            .send()
            .await
            .map_err(|e| RemoteError::new("CreateBucket", DisplayErrorContext(&e).to_string()))?;

        Ok(resp
            .location()
            .map(String::from)
            .unwrap_or_else(|| format!("/{}", bucket)))
    }

    async fn create_access_key(&self, username: &str) -> RemoteResult<AccessKeyPair> {
        let resp = self
            .iam
            .create_access_key()
            .user_name(username)
            .send()
            .await
            .map_err(|e| {
                RemoteError::new("CreateAccessKey", DisplayErrorContext(&e).to_string())
            })?;

        resp.access_key()
            .map(|key| AccessKeyPair::new(key.access_key_id(), key.secret_access_key()))
            .ok_or_else(|| {
                RemoteError::new("CreateAccessKey", "response did not include the access key")
            })
    }

    async fn put_policy(
        &self,
        username: &str,
        policy_name: &str,
        policy: &PolicyDocument,
    ) -> RemoteResult<()> {
        let document = policy
            .to_json()
            .map_err(|e| RemoteError::new("PutUserPolicy", e.to_string()))?;

        self.iam
            .put_user_policy()
            .user_name(username)
            .policy_name(policy_name)
            .policy_document(document)
            .send()
            .await
            .map_err(|e| RemoteError::new("PutUserPolicy", DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
