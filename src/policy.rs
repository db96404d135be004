//! Inline IAM policy granting object access to a single bucket.

use serde::{Deserialize, Serialize};

/// Name under which the policy is attached to the user
pub const POLICY_NAME: &str = "bucket-access";

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// Actions granted on the bucket and its objects
pub const BUCKET_ACTIONS: [&str; 4] = [
    "s3:GetObject",
    "s3:PutObject",
    "s3:ListBucket",
    "s3:DeleteObject",
];

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One policy statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

/// An IAM policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Policy allowing [`BUCKET_ACTIONS`] on `bucket` and every key inside it
    pub fn for_bucket(bucket: &str) -> Self {
        let bucket_arn = bucket_arn(bucket);
        let objects_arn = format!("{}/*", bucket_arn);

        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                effect: Effect::Allow,
                action: BUCKET_ACTIONS.iter().map(|a| a.to_string()).collect(),
                resource: vec![bucket_arn, objects_arn],
            }],
        }
    }

    /// Serialize to the JSON form IAM expects
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Every action named by any statement
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.statement
            .iter()
            .flat_map(|s| s.action.iter().map(String::as_str))
    }

    /// Every resource named by any statement
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.statement
            .iter()
            .flat_map(|s| s.resource.iter().map(String::as_str))
    }
}

/// ARN of an S3 bucket
pub fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{}", bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bucket_policy_shape() {
        let policy = PolicyDocument::for_bucket("reports");

        assert_eq!(policy.version, "2012-10-17");
        assert_eq!(policy.statement.len(), 1);
        assert_eq!(policy.statement[0].effect, Effect::Allow);
        assert_eq!(
            policy.resources().collect::<Vec<_>>(),
            vec!["arn:aws:s3:::reports", "arn:aws:s3:::reports/*"]
        );
        assert_eq!(policy.actions().collect::<Vec<_>>(), BUCKET_ACTIONS.to_vec());
    }

    #[test]
    fn test_json_uses_iam_field_names() {
        let json = PolicyDocument::for_bucket("reports").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["Version"], "2012-10-17");
        assert_eq!(value["Statement"][0]["Effect"], "Allow");
        assert_eq!(value["Statement"][0]["Action"][2], "s3:ListBucket");
        assert_eq!(value["Statement"][0]["Resource"][1], "arn:aws:s3:::reports/*");
    }

    #[test]
    fn test_json_parses_back() {
        let policy = PolicyDocument::for_bucket("reports");
        let parsed: PolicyDocument = serde_json::from_str(&policy.to_json().unwrap()).unwrap();
        assert_eq!(parsed, policy);
    }
}
