//! The provisioning sequence.
//!
//! A [`Provisioner`] runs four remote calls in a fixed order, each one only
//! after the previous one succeeded:
//!
//! 1. create the IAM user
//! 2. create the bucket in the resolved region
//! 3. create an access key for the user
//! 4. attach the bucket-scoped inline policy to the user
//!
//! The first failure aborts the sequence. Resources created by earlier steps
//! are left in place; [`ProvisionError::left_in_place`] names them so the
//! operator can clean up by hand.

use crate::policy::{PolicyDocument, POLICY_NAME};
use crate::remote::{ProvisioningApi, RemoteError, RemoteResult};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use thiserror::Error;
use tracing::{error, info};

/// One remote step of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStep {
    CreateIdentity,
    CreateBucket,
    CreateAccessKey,
    AttachPolicy,
}

impl ProvisionStep {
    /// All steps in execution order
    pub const ALL: [ProvisionStep; 4] = [
        ProvisionStep::CreateIdentity,
        ProvisionStep::CreateBucket,
        ProvisionStep::CreateAccessKey,
        ProvisionStep::AttachPolicy,
    ];

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ProvisionStep::CreateIdentity => "create IAM user",
            ProvisionStep::CreateBucket => "create S3 bucket",
            ProvisionStep::CreateAccessKey => "create access key",
            ProvisionStep::AttachPolicy => "attach bucket policy",
        }
    }

    /// Resource this step leaves behind once it has succeeded
    pub fn created_resource(&self, request: &ProvisionRequest) -> String {
        match self {
            ProvisionStep::CreateIdentity => format!("IAM user '{}'", request.username),
            ProvisionStep::CreateBucket => format!("S3 bucket '{}'", request.bucket_name),
            ProvisionStep::CreateAccessKey => {
                format!("access key of IAM user '{}'", request.username)
            }
            ProvisionStep::AttachPolicy => format!(
                "inline policy '{}' on IAM user '{}'",
                POLICY_NAME, request.username
            ),
        }
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// What to provision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub username: String,
    pub bucket_name: String,
    pub profile_name: String,
}

impl ProvisionRequest {
    pub fn new(
        username: impl Into<String>,
        bucket_name: impl Into<String>,
        profile_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            bucket_name: bucket_name.into(),
            profile_name: profile_name.into(),
        }
    }

    /// Warnings for names that break the lowercase-and-dashes convention.
    ///
    /// The convention is advisory; the remote services have the final word.
    pub fn naming_warnings(&self) -> Vec<String> {
        [("username", &self.username), ("bucket name", &self.bucket_name)]
            .into_iter()
            .filter(|(_, value)| !follows_naming_convention(value))
            .map(|(label, value)| {
                format!(
                    "{} '{}' should use only lowercase letters, digits and dashes",
                    label, value
                )
            })
            .collect()
    }
}

/// Lowercase ASCII letters, digits and inner dashes
pub fn follows_naming_convention(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Everything produced by a successful run
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionResult {
    pub username: String,
    pub identity_arn: String,
    pub bucket_name: String,
    pub bucket_location: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(skip)]
    pub policy: PolicyDocument,
}

impl fmt::Debug for ProvisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisionResult")
            .field("username", &self.username)
            .field("identity_arn", &self.identity_arn)
            .field("bucket_name", &self.bucket_name)
            .field("bucket_location", &self.bucket_location)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("policy", &self.policy)
            .finish()
    }
}

/// Provisioning failure
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to {step}: {source}")]
    RemoteCallFailed {
        /// Step that failed
        step: ProvisionStep,
        /// Steps that succeeded before the failure, in order
        completed: Vec<ProvisionStep>,
        #[source]
        source: RemoteError,
    },
}

impl ProvisionError {
    /// Step at which the sequence stopped
    pub fn step(&self) -> ProvisionStep {
        match self {
            ProvisionError::RemoteCallFailed { step, .. } => *step,
        }
    }

    /// Steps that completed before the failure
    pub fn completed(&self) -> &[ProvisionStep] {
        match self {
            ProvisionError::RemoteCallFailed { completed, .. } => completed,
        }
    }

    /// Resources created before the failure that were not rolled back
    pub fn left_in_place(&self, request: &ProvisionRequest) -> Vec<String> {
        self.completed()
            .iter()
            .map(|step| step.created_resource(request))
            .collect()
    }
}

/// Receives progress notifications from a [`Provisioner`]
pub trait StepObserver: Send + Sync {
    fn step_started(&self, _step: ProvisionStep) {}

    fn step_succeeded(&self, _step: ProvisionStep, _detail: &str) {}

    fn step_failed(&self, _step: ProvisionStep, _error: &RemoteError) {}
}

/// Runs the provisioning sequence against a [`ProvisioningApi`]
pub struct Provisioner<'a> {
    api: &'a dyn ProvisioningApi,
    observer: Option<&'a dyn StepObserver>,
}

impl<'a> Provisioner<'a> {
    pub fn new(api: &'a dyn ProvisioningApi) -> Self {
        Self {
            api,
            observer: None,
        }
    }

    /// Report step progress to `observer`
    pub fn with_observer(mut self, observer: &'a dyn StepObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run every step for `request`, creating the bucket in `region`
    pub async fn provision(
        &self,
        request: &ProvisionRequest,
        region: &str,
    ) -> Result<ProvisionResult, ProvisionError> {
        let mut completed = Vec::with_capacity(ProvisionStep::ALL.len());

        info!(
            username = %request.username,
            bucket = %request.bucket_name,
            profile = %request.profile_name,
            region,
            "starting provisioning"
        );

        let identity_arn = self
            .run_step(
                ProvisionStep::CreateIdentity,
                &mut completed,
                self.api.create_identity(&request.username),
                |arn| arn.clone(),
            )
            .await?;

        let bucket_location = self
            .run_step(
                ProvisionStep::CreateBucket,
                &mut completed,
                self.api.create_bucket(&request.bucket_name, region),
                |location| location.clone(),
            )
            .await?;

        let access_key = self
            .run_step(
                ProvisionStep::CreateAccessKey,
                &mut completed,
                self.api.create_access_key(&request.username),
                |key| key.access_key_id.clone(),
            )
            .await?;

        let policy = PolicyDocument::for_bucket(&request.bucket_name);
        self.run_step(
            ProvisionStep::AttachPolicy,
            &mut completed,
            self.api.put_policy(&request.username, POLICY_NAME, &policy),
            |_| POLICY_NAME.to_string(),
        )
        .await?;

        info!(username = %request.username, bucket = %request.bucket_name, "provisioning complete");

        Ok(ProvisionResult {
            username: request.username.clone(),
            identity_arn,
            bucket_name: request.bucket_name.clone(),
            bucket_location,
            region: region.to_string(),
            access_key_id: access_key.access_key_id,
            secret_access_key: access_key.secret_access_key,
            policy,
        })
    }

    async fn run_step<T, F, D>(
        &self,
        step: ProvisionStep,
        completed: &mut Vec<ProvisionStep>,
        call: F,
        describe: D,
    ) -> Result<T, ProvisionError>
    where
        F: Future<Output = RemoteResult<T>>,
        D: FnOnce(&T) -> String,
    {
        if let Some(observer) = self.observer {
            observer.step_started(step);
        }

        match call.await {
            Ok(value) => {
                let detail = describe(&value);
                info!(step = %step, detail = %detail, "step succeeded");
                if let Some(observer) = self.observer {
                    observer.step_succeeded(step, &detail);
                }
                completed.push(step);
                Ok(value)
            }
            Err(source) => {
                error!(
                    step = %step,
                    completed = ?completed,
                    error = %source,
                    "provisioning aborted; completed steps were not rolled back"
                );
                if let Some(observer) = self.observer {
                    observer.step_failed(step, &source);
                }
                Err(ProvisionError::RemoteCallFailed {
                    step,
                    completed: completed.clone(),
                    source,
                })
            }
        }
    }
}
