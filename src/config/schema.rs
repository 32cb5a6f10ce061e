//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Import root for proto resolution; schema imports are relative to it.
    pub import_path: String,

    /// Subfolder under the import root that holds the schema files.
    pub schema_folder: String,

    /// Periodic reload interval in seconds; 0 disables auto-reload.
    pub reload_interval_secs: u64,

    /// Port for the transcoding proxy listener.
    pub proxy_port: u16,

    /// Port for the management listener.
    pub manager_port: u16,

    /// Content-type stamped on forwarded requests; empty leaves the
    /// original header untouched.
    pub forward_content_type: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            import_path: ".".to_string(),
            schema_folder: "protos".to_string(),
            reload_interval_secs: 0,
            proxy_port: 8080,
            manager_port: 8081,
            forward_content_type: "application/x-protobuf".to_string(),
        }
    }
}
