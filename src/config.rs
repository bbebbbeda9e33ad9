/// Configuration constants for the Azure Resource Graph API
pub mod api {
    /// Resource Graph query endpoint (public cloud)
    pub const ENDPOINT: &str =
        "https://management.azure.com/providers/Microsoft.ResourceGraph/resources";

    /// API version sent as the `api-version` query parameter
    pub const API_VERSION: &str = "2021-03-01";

    /// Rows come back as JSON objects keyed by column name
    pub const RESULT_FORMAT: &str = "objectArray";

    /// Per-attempt request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// TCP connect timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
}

/// Retry behaviour for transient query failures
pub mod retry {
    /// Total attempts per request, including the first one
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Delay bound before the first retry, in milliseconds
    pub const BASE_DELAY_MS: u64 = 1_000;

    /// Upper bound for the exponential delay, in milliseconds
    pub const MAX_DELAY_MS: u64 = 60_000;
}

/// Configuration constants for credentials
pub mod credentials {
    /// Environment variable names for a pre-fetched token (checked in order)
    pub const TOKEN_ENV_VARS: &[&str] = &["AZURE_ACCESS_TOKEN", "ARM_ACCESS_TOKEN"];

    /// Azure Resource Manager audience requested from the Azure CLI
    pub const ARM_RESOURCE: &str = "https://management.azure.com/";

    /// Azure CLI executable
    pub const AZ_CLI: &str = "az";
}

/// Default values for CLI
pub mod defaults {
    /// Default output path
    pub const OUTPUT_PATH: &str = "report.csv";

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default page safety cap
    pub const MAX_PAGES: u32 = 100;
}
