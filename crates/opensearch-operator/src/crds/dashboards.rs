use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::security::{SecretRef, TlsSecret};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardsConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<DashboardsTlsConfig>,
    /// Secret with `username` and `password` used by dashboards to log in to
    /// the cluster. Only needed together with a custom securityconfig.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opensearch_credentials_secret: Option<SecretRef>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardsTlsConfig {
    /// Serve dashboards over HTTPS
    #[serde(default)]
    pub enable: bool,
    /// Generate the certificate. If false, either `secret` or both
    /// `keySecret` and `certSecret` must be provided.
    #[serde(default)]
    pub generate: bool,
    /// Name of a secret holding `tls.key` and `tls.crt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Secret holding the private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_secret: Option<TlsSecret>,
    /// Secret holding the certificate for the private key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_secret: Option<TlsSecret>,
}

impl DashboardsTlsConfig {
    pub fn generated() -> Self {
        Self {
            enable: true,
            generate: true,
            ..Default::default()
        }
    }
}
