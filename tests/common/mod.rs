//! Shared test utilities for the bucketkey test suite.
//!
//! This module provides:
//! - `RecordingApi`, a `ProvisioningApi` fake that records every call
//! - Helpers for writing AWS credential/config stores into a temp directory
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use tempfile::TempDir;

use bucketkey::policy::PolicyDocument;
use bucketkey::profile::{AccessKeyPair, ProfilePaths};
use bucketkey::provision::{ProvisionStep, StepObserver};
use bucketkey::remote::{ProvisioningApi, RemoteError, RemoteResult};

// ============================================================================
// Recording API
// ============================================================================

/// A call received by [`RecordingApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    CreateIdentity {
        username: String,
    },
    CreateBucket {
        bucket: String,
        region: String,
    },
    CreateAccessKey {
        username: String,
    },
    PutPolicy {
        username: String,
        policy_name: String,
        policy: PolicyDocument,
    },
}

/// Fake remote API returning fixed identifiers and recording calls.
///
/// A step can be made to fail with [`RecordingApi::failing_at`]; the failing
/// call is still recorded.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    fail_at: Option<ProvisionStep>,
}

pub const FAKE_ACCOUNT: &str = "123456789012";
pub const FAKE_ACCESS_KEY_ID: &str = "AKIAFAKEKEY0001";
pub const FAKE_SECRET: &str = "fake/secret+access=key";

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(step: ProvisionStep) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_at: Some(step),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: ApiCall, step: ProvisionStep, operation: &'static str) -> RemoteResult<()> {
        self.calls.lock().push(call);
        if self.fail_at == Some(step) {
            return Err(RemoteError::new(operation, format!("simulated {} failure", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl ProvisioningApi for RecordingApi {
    async fn create_identity(&self, username: &str) -> RemoteResult<String> {
        self.record(
            ApiCall::CreateIdentity {
                username: username.to_string(),
            },
            ProvisionStep::CreateIdentity,
            "CreateUser",
        )?;
        Ok(format!("arn:aws:iam::{}:user/{}", FAKE_ACCOUNT, username))
    }

    async fn create_bucket(&self, bucket: &str, region: &str) -> RemoteResult<String> {
        self.record(
            ApiCall::CreateBucket {
                bucket: bucket.to_string(),
                region: region.to_string(),
            },
            ProvisionStep::CreateBucket,
            "CreateBucket",
        )?;
        Ok(format!("http://{}.s3.amazonaws.com/", bucket))
    }

    async fn create_access_key(&self, username: &str) -> RemoteResult<AccessKeyPair> {
        self.record(
            ApiCall::CreateAccessKey {
                username: username.to_string(),
            },
            ProvisionStep::CreateAccessKey,
            "CreateAccessKey",
        )?;
        Ok(AccessKeyPair::new(FAKE_ACCESS_KEY_ID, FAKE_SECRET))
    }

    async fn put_policy(
        &self,
        username: &str,
        policy_name: &str,
        policy: &PolicyDocument,
    ) -> RemoteResult<()> {
        self.record(
            ApiCall::PutPolicy {
                username: username.to_string(),
                policy_name: policy_name.to_string(),
                policy: policy.clone(),
            },
            ProvisionStep::AttachPolicy,
            "PutUserPolicy",
        )
    }
}

// ============================================================================
// Step observer
// ============================================================================

/// Observer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Started(ProvisionStep),
    Succeeded(ProvisionStep, String),
    Failed(ProvisionStep, String),
}

/// Observer that records every notification
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<StepEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<StepEvent> {
        self.events.lock().clone()
    }
}

impl StepObserver for RecordingObserver {
    fn step_started(&self, step: ProvisionStep) {
        self.events.lock().push(StepEvent::Started(step));
    }

    fn step_succeeded(&self, step: ProvisionStep, detail: &str) {
        self.events
            .lock()
            .push(StepEvent::Succeeded(step, detail.to_string()));
    }

    fn step_failed(&self, step: ProvisionStep, error: &RemoteError) {
        self.events
            .lock()
            .push(StepEvent::Failed(step, error.to_string()));
    }
}

// ============================================================================
// AWS store fixtures
// ============================================================================

/// A temporary `.aws` directory
pub struct AwsDir {
    pub dir: TempDir,
}

impl AwsDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn with_credentials(self, content: &str) -> Self {
        write(&self.paths().credentials, content);
        self
    }

    pub fn with_credentials_bytes(self, content: &[u8]) -> Self {
        std::fs::write(self.paths().credentials, content).expect("write fixture");
        self
    }

    pub fn with_config(self, content: &str) -> Self {
        write(&self.paths().config, content);
        self
    }

    pub fn paths(&self) -> ProfilePaths {
        ProfilePaths::from_base_dir(self.dir.path())
    }
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).expect("write fixture");
}

/// Credentials store with a complete `default` and `team-a` profile
pub const TWO_PROFILE_CREDENTIALS: &str = r#"[default]
aws_access_key_id = AKIADEFAULT0001
aws_secret_access_key = defaultSecret/0001

[team-a]
aws_access_key_id = AKIATEAMA000001
aws_secret_access_key = teamASecret/0001
"#;
