use serde::{Deserialize, Serialize};

const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;
const DEFAULT_BODY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// `modules.api_ingress` section of the application config.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            cors_enabled: false,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

fn default_request_timeout_sec() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SEC
}

fn default_body_limit_bytes() -> usize {
    DEFAULT_BODY_LIMIT_BYTES
}
