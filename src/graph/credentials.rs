//! Bearer token resolution from multiple sources

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use log::debug;
use std::process::Command;

use crate::config::credentials;
use crate::error::{InventoryError, Result};

/// Token resolution with fallback logic
///
/// The resolved token is treated as an opaque, pre-fetched secret: no
/// refresh, no login flow.
pub struct TokenResolver {
    resource: String,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new(credentials::ARM_RESOURCE)
    }
}

impl TokenResolver {
    /// Create a resolver for the given token audience
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
        }
    }

    /// Resolve a token with fallback:
    /// 1. CLI argument (if provided)
    /// 2. Environment variables (AZURE_ACCESS_TOKEN, ARM_ACCESS_TOKEN - in order)
    /// 3. Azure CLI (`az account get-access-token`)
    pub fn resolve(&self, cli_token: Option<&str>) -> Result<String> {
        if let Some(token) = cli_token.map(str::trim).filter(|t| !t.is_empty()) {
            debug!("Using token from CLI argument");
            return Ok(log_expiry(token.to_string()));
        }

        for env_var in credentials::TOKEN_ENV_VARS {
            if let Ok(token) = std::env::var(env_var) {
                let token = token.trim();
                if !token.is_empty() {
                    debug!("Using token from {} environment variable", env_var);
                    return Ok(log_expiry(token.to_string()));
                }
            }
        }

        debug!(
            "No token in CLI argument or environment variables {:?}, trying Azure CLI",
            credentials::TOKEN_ENV_VARS
        );
        self.read_from_azure_cli().map(log_expiry)
    }

    fn read_from_azure_cli(&self) -> Result<String> {
        let output = Command::new(credentials::AZ_CLI)
            .args([
                "account",
                "get-access-token",
                "--resource",
                self.resource.as_str(),
                "--query",
                "accessToken",
                "--output",
                "tsv",
            ])
            .output()
            .map_err(|e| {
                InventoryError::Auth(self.token_not_found_message(&format!(
                    "could not run '{}': {}",
                    credentials::AZ_CLI,
                    e
                )))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InventoryError::Auth(self.token_not_found_message(
                &format!("'{} account get-access-token' failed: {}", credentials::AZ_CLI, stderr.trim()),
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(InventoryError::Auth(self.token_not_found_message(
                "Azure CLI returned an empty token",
            )));
        }

        debug!("Using token from Azure CLI for resource {}", self.resource);
        Ok(token)
    }

    /// Generate helpful error message when no token is available
    fn token_not_found_message(&self, cause: &str) -> String {
        format!(
            "No access token for '{}' ({}). Provide one using:\n\
             \n\
             1. CLI argument:      azinv --token <TOKEN>\n\
             2. Environment var:   export AZURE_ACCESS_TOKEN=<TOKEN>  (also: ARM_ACCESS_TOKEN)\n\
             3. Azure CLI:         az login\n\
             \n\
             Checked: env vars [{}], Azure CLI",
            self.resource,
            cause,
            credentials::TOKEN_ENV_VARS.join(", ")
        )
    }
}

/// Expiry from the `exp` claim, when the token is a JWT
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.get("exp")?.as_i64()?, 0)
}

fn log_expiry(token: String) -> String {
    match token_expiry(&token) {
        Some(exp) => debug!("Token expires at {}", exp.to_rfc3339()),
        None => debug!("Token expiry unknown (not a JWT)"),
    }
    token
}
