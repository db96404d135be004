//! Profile resolution from the AWS CLI credential and config stores.
//!
//! Credentials are looked up strictly: a missing store, an unparsable store, an
//! unknown profile or a half-filled profile are all errors the operator has to
//! fix locally. Region lookup never fails and degrades to a default instead:
//!
//! 1. `region` in the profile's config section (`[default]` or `[profile <name>]`)
//! 2. `region` in `[default]`, when the requested profile is not `default`
//! 3. the configured default region (`ca-central-1` unless overridden)

use crate::ini::{IniDocument, IniError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the profile used when none is selected
pub const DEFAULT_PROFILE: &str = "default";

/// Region used when no store provides one
pub const DEFAULT_REGION: &str = "ca-central-1";

/// Prefix of non-default profile sections in the config store
const CONFIG_PROFILE_PREFIX: &str = "profile ";

const ACCESS_KEY_ID: &str = "aws_access_key_id";
const SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
const SESSION_TOKEN: &str = "aws_session_token";
const REGION: &str = "region";

/// Errors raised while resolving a profile from local configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "credentials file not found at '{}'; run `aws configure` to set up your AWS credentials",
        .path.display()
    )]
    NotFound { path: PathBuf },

    #[error("failed to parse '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: IniError,
    },

    #[error(
        "profile '{profile}' not found in '{}'; available profiles: {}",
        .path.display(),
        list_or_none(.available)
    )]
    ProfileNotFound {
        profile: String,
        path: PathBuf,
        available: Vec<String>,
    },

    #[error("profile '{profile}' in '{}' is missing '{field}'", .path.display())]
    Incomplete {
        profile: String,
        path: PathBuf,
        field: &'static str,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// An access key id and secret, with an optional session token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKeyPair {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AccessKeyPair {
    /// Create a long-lived key pair
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }
}

impl fmt::Debug for AccessKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyPair")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A fully resolved profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub credentials: AccessKeyPair,
    pub region: String,
}

/// Locations of the credentials and config stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePaths {
    pub credentials: PathBuf,
    pub config: PathBuf,
}

impl ProfilePaths {
    /// Stores inside an AWS CLI directory (normally `~/.aws`)
    pub fn from_base_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            credentials: dir.join("credentials"),
            config: dir.join("config"),
        }
    }

    /// Stores under the current user's home directory
    pub fn from_home() -> Option<Self> {
        dirs::home_dir().map(|home| Self::from_base_dir(home.join(".aws")))
    }
}

/// Resolves credentials and region for named profiles
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    paths: ProfilePaths,
    default_region: String,
}

impl ProfileResolver {
    /// Create a resolver reading the given stores
    pub fn new(paths: ProfilePaths) -> Self {
        Self {
            paths,
            default_region: DEFAULT_REGION.to_string(),
        }
    }

    /// Override the region used when no store provides one
    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Store locations this resolver reads
    pub fn paths(&self) -> &ProfilePaths {
        &self.paths
    }

    /// Resolve credentials and region together
    pub fn resolve(&self, profile: &str) -> Result<Profile, ConfigError> {
        let credentials = self.resolve_credentials(profile)?;
        let region = self.resolve_region(profile);

        Ok(Profile {
            name: profile.to_string(),
            credentials,
            region,
        })
    }

    /// Resolve the access key pair of a profile from the credentials store
    pub fn resolve_credentials(&self, profile: &str) -> Result<AccessKeyPair, ConfigError> {
        let path = &self.paths.credentials;

        let content = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.clone() }
            } else {
                ConfigError::Io {
                    path: path.clone(),
                    source: e,
                }
            }
        })?;

        let doc = IniDocument::parse_bytes(&content).map_err(|source| ConfigError::Malformed {
            path: path.clone(),
            source,
        })?;

        if !doc.has_section(profile) {
            return Err(ConfigError::ProfileNotFound {
                profile: profile.to_string(),
                path: path.clone(),
                available: doc.section_names().map(String::from).collect(),
            });
        }

        let field = |key: &'static str| {
            doc.get(profile, key)
                .map(String::from)
                .ok_or_else(|| ConfigError::Incomplete {
                    profile: profile.to_string(),
                    path: path.clone(),
                    field: key,
                })
        };

        let mut pair = AccessKeyPair::new(field(ACCESS_KEY_ID)?, field(SECRET_ACCESS_KEY)?);
        if let Some(token) = doc.get(profile, SESSION_TOKEN) {
            pair = pair.with_session_token(token);
        }

        debug!(profile, path = %path.display(), "resolved credentials");
        Ok(pair)
    }

    /// Resolve the region of a profile; never fails
    pub fn resolve_region(&self, profile: &str) -> String {
        let path = &self.paths.config;

        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "config store unavailable, using default region");
                return self.default_region.clone();
            }
        };

        let doc = match IniDocument::parse_bytes(&content) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config store is malformed, using default region");
                return self.default_region.clone();
            }
        };

        if let Some(region) = doc.get(&config_section(profile), REGION) {
            debug!(profile, region, "resolved region from profile");
            return region.to_string();
        }

        if profile != DEFAULT_PROFILE {
            if let Some(region) = doc.get(DEFAULT_PROFILE, REGION) {
                debug!(profile, region, "profile has no region, using default profile's region");
                return region.to_string();
            }
        }

        debug!(profile, region = %self.default_region, "no region configured, using default region");
        self.default_region.clone()
    }
}

/// Config store section holding settings for a profile
pub fn config_section(profile: &str) -> String {
    if profile == DEFAULT_PROFILE {
        profile.to_string()
    } else {
        format!("{}{}", CONFIG_PROFILE_PREFIX, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_section_names() {
        assert_eq!(config_section("default"), "default");
        assert_eq!(config_section("team-a"), "profile team-a");
    }

    #[test]
    fn test_paths_from_base_dir() {
        let paths = ProfilePaths::from_base_dir("/home/ops/.aws");
        assert_eq!(paths.credentials, PathBuf::from("/home/ops/.aws/credentials"));
        assert_eq!(paths.config, PathBuf::from("/home/ops/.aws/config"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let pair = AccessKeyPair::new("AKIAEXAMPLE", "super-secret").with_session_token("tok");
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("AKIAEXAMPLE"));
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("tok\""));
    }

    #[test]
    fn test_not_found_message_mentions_aws_configure() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/nowhere/credentials"),
        };
        assert!(err.to_string().contains("aws configure"));
    }

    #[test]
    fn test_profile_not_found_without_profiles() {
        let err = ConfigError::ProfileNotFound {
            profile: "team-a".into(),
            path: PathBuf::from("credentials"),
            available: vec![],
        };
        assert!(err.to_string().ends_with("available profiles: (none)"));
    }
}
