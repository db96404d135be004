//! Rendering of a [`ProvisionResult`] for the operator.

use crate::provision::ProvisionResult;

/// Value of the path-style endpoint flag in the env block
pub const USE_PATH_STYLE_ENDPOINT: bool = false;

/// Key/value pairs of the env-file block, in output order
pub fn env_entries(result: &ProvisionResult) -> Vec<(&'static str, String)> {
    vec![
        ("AWS_ACCESS_KEY_ID", result.access_key_id.clone()),
        ("AWS_SECRET_ACCESS_KEY", result.secret_access_key.clone()),
        ("AWS_DEFAULT_REGION", result.region.clone()),
        ("AWS_BUCKET", result.bucket_name.clone()),
        (
            "AWS_USE_PATH_STYLE_ENDPOINT",
            USE_PATH_STYLE_ENDPOINT.to_string(),
        ),
    ]
}

/// Env-file block ready to paste into a `.env`
pub fn render_env(result: &ProvisionResult) -> String {
    env_entries(result)
        .into_iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}

/// Pretty-printed JSON of the result
pub fn render_json(result: &ProvisionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
