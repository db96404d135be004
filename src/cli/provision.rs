//! The provisioning command.

use super::interactive::{InteractiveSession, BUCKET_PROMPT, USERNAME_PROMPT};
use super::output::OutputFormatter;
use super::Cli;
use anyhow::Result;
use bucketkey::profile::{ConfigError, ProfilePaths, ProfileResolver};
use bucketkey::provision::{ProvisionError, ProvisionRequest, Provisioner};
use bucketkey::remote::AwsApi;
use bucketkey::Error;
use tracing::info;

/// Arguments for one provisioning run
#[derive(Debug, Clone)]
pub struct ProvisionCommand {
    pub profile: String,
    pub username: Option<String>,
    pub bucket: Option<String>,
    pub paths: ProfilePaths,
    pub default_region: String,
}

impl ProvisionCommand {
    /// Build the command from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            profile: cli.profile.clone(),
            username: cli.username.clone(),
            bucket: cli.bucket.clone(),
            paths: cli.profile_paths()?,
            default_region: cli.default_region.clone(),
        })
    }

    /// Run the command and return the process exit code
    pub async fn execute(&self, output: &OutputFormatter) -> Result<i32> {
        output.banner("BUCKETKEY");

        let resolver = ProfileResolver::new(self.paths.clone())
            .with_default_region(self.default_region.as_str());

        // Credentials are checked before prompting so a broken setup fails fast
        let profile = match resolver.resolve(&self.profile) {
            Ok(profile) => profile,
            Err(e) => {
                report_config_error(output, &e);
                return Ok(Error::from(e).exit_code());
            }
        };

        output.info(&format!(
            "Using profile '{}' in region '{}'",
            profile.name, profile.region
        ));
        output.debug(&format!(
            "credentials from {}, region from {}",
            resolver.paths().credentials.display(),
            resolver.paths().config.display()
        ));

        let session = InteractiveSession::new();
        let (username, bucket) = match self.names(&session) {
            Ok(names) => names,
            Err(e) => return Ok(report_error(output, Error::Prompt(format!("{:#}", e)))),
        };

        let request = ProvisionRequest::new(username, bucket, profile.name.clone());
        for warning in request.naming_warnings() {
            output.warning(&warning);
        }

        let api = AwsApi::connect(&profile.credentials, &profile.region).await;
        let provisioner = Provisioner::new(&api).with_observer(output);

        match provisioner.provision(&request, &profile.region).await {
            Ok(result) => {
                info!(identity_arn = %result.identity_arn, "provisioned");
                match output.report(&result) {
                    Ok(()) => Ok(0),
                    Err(e) => Ok(report_error(output, e.into())),
                }
            }
            Err(e) => {
                report_provision_error(output, &request, &e);
                Ok(Error::from(e).exit_code())
            }
        }
    }

    fn names(&self, session: &InteractiveSession) -> Result<(String, String)> {
        let username = session.name_or_prompt(self.username.as_deref(), USERNAME_PROMPT)?;
        let bucket = session.name_or_prompt(self.bucket.as_deref(), BUCKET_PROMPT)?;
        Ok((username, bucket))
    }
}

fn report_error(output: &OutputFormatter, error: Error) -> i32 {
    output.error(&error.to_string());
    error.exit_code()
}

fn report_config_error(output: &OutputFormatter, error: &ConfigError) {
    output.error(&error.to_string());

    match error {
        ConfigError::NotFound { .. } => {
            output.hint("Install the AWS CLI and run `aws configure`, or pass --credentials-file");
        }
        ConfigError::ProfileNotFound { .. } => {
            output.hint("Select one of the listed profiles with --profile=<name>");
        }
        ConfigError::Incomplete { profile, .. } => {
            output.hint(&format!(
                "Run `aws configure --profile {}` to set both access key fields",
                profile
            ));
        }
        ConfigError::Malformed { .. } | ConfigError::Io { .. } => {}
    }
}

fn report_provision_error(
    output: &OutputFormatter,
    request: &ProvisionRequest,
    error: &ProvisionError,
) {
    output.error(&error.to_string());

    let left = error.left_in_place(request);
    if left.is_empty() {
        output.hint("Nothing was created.");
        return;
    }

    output.warning("The following resources were created and have not been removed:");
    for resource in &left {
        output.warning(&format!("  - {}", resource));
    }
    output.hint("Delete them manually before retrying with the same names.");
}
