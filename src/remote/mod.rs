//! Remote management APIs used during provisioning.
//!
//! [`ProvisioningApi`] is the capability the sequencer needs from the cloud:
//! four create/attach calls and nothing else. [`AwsApi`] implements it on top
//! of the AWS SDK; tests substitute a recording fake.

pub mod aws;

pub use aws::AwsApi;

use crate::policy::PolicyDocument;
use crate::profile::AccessKeyPair;
use async_trait::async_trait;
use thiserror::Error;

/// A failed remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct RemoteError {
    /// API operation that failed (e.g. `CreateUser`)
    pub operation: &'static str,
    /// Message reported by the service or transport
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Result type for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Identity and storage management calls needed to provision a user and bucket.
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    /// Create an identity principal and return its ARN.
    async fn create_identity(&self, username: &str) -> RemoteResult<String>;

    /// Create a bucket in `region` and return its location.
    async fn create_bucket(&self, bucket: &str, region: &str) -> RemoteResult<String>;

    /// Create an access key bound to an existing identity.
    async fn create_access_key(&self, username: &str) -> RemoteResult<AccessKeyPair>;

    /// Attach `policy` to the identity as an inline policy named `policy_name`.
    async fn put_policy(
        &self,
        username: &str,
        policy_name: &str,
        policy: &PolicyDocument,
    ) -> RemoteResult<()>;
}
