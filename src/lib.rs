//! # bucketkey - Bucket and scoped credentials in one step
//!
//! bucketkey creates an IAM user, an S3 bucket, an access key for that user and
//! an inline policy that limits the user to that one bucket, then prints the new
//! credentials as `.env` lines.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────┐
//! │         CLI (binary)          │  flags, prompts, output
//! └───────────────────────────────┘
//!          │                │
//!          ▼                ▼
//! ┌────────────────┐  ┌────────────────────┐
//! │ ProfileResolver│  │    Provisioner     │
//! │ ~/.aws stores  │  │ 4 sequential steps │
//! └────────────────┘  └────────────────────┘
//!                               │
//!                               ▼
//!                     ┌────────────────────┐
//!                     │  ProvisioningApi   │  AwsApi (IAM + S3) or a fake
//!                     └────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use bucketkey::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> bucketkey::Result<()> {
//!     let resolver = ProfileResolver::new(ProfilePaths::from_home().unwrap());
//!     let profile = resolver.resolve("default")?;
//!
//!     let api = AwsApi::connect(&profile.credentials, &profile.region).await;
//!     let request = ProvisionRequest::new("svc-ingest", "svc-ingest-data", "default");
//!     let result = Provisioner::new(&api).provision(&request, &profile.region).await?;
//!
//!     print!("{}", bucketkey::report::render_env(&result));
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod ini;
pub mod policy;
pub mod profile;
pub mod provision;
pub mod remote;
pub mod report;

pub use error::{Error, Result};

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::error::{Error, Result};
    pub use crate::policy::{PolicyDocument, POLICY_NAME};
    pub use crate::profile::{
        AccessKeyPair, ConfigError, Profile, ProfilePaths, ProfileResolver, DEFAULT_PROFILE,
        DEFAULT_REGION,
    };
    pub use crate::provision::{
        ProvisionError, ProvisionRequest, ProvisionResult, ProvisionStep, Provisioner,
        StepObserver,
    };
    pub use crate::remote::{AwsApi, ProvisioningApi, RemoteError, RemoteResult};
}
