use std::borrow::Cow;

use kube::CustomResource;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use super::{
    dashboards::DashboardsConfig, node_pool::NodePool, security::Security, status::ClusterStatus,
};

#[derive(CustomResource, Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[kube(
    group = "opensearch.opster.io",
    version = "v1",
    kind = "OpenSearchCluster",
    plural = "opensearchclusters",
    namespaced,
    status = "ClusterStatus",
    shortname = "os",
    shortname = "opensearch",
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub conf_mgmt: ConfMgmt,
    #[serde(default)]
    pub dashboards: DashboardsConfig,
    /// Managed TLS and security plugin bootstrap. Without it the cluster runs
    /// without operator managed TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralConfig {
    /// Port for the REST interface, default 9200
    #[serde(default = "default_http_port")]
    pub http_port: i32,
    #[serde(default)]
    pub vendor: Vendor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    /// Name of the cluster service. Required.
    #[serde(default)]
    pub service_name: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            vendor: Vendor::default(),
            version: None,
            service_account: None,
            service_name: String::new(),
        }
    }
}

fn default_http_port() -> i32 {
    9200
}

/// Distribution the cluster runs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Vendor {
    #[default]
    #[serde(
        rename = "Opensearch",
        alias = "Op",
        alias = "OP",
        alias = "os",
        alias = "opensearch"
    )]
    Opensearch,
}

impl Vendor {
    /// Every spelling accepted on input.
    pub const SPELLINGS: [&'static str; 5] = ["Opensearch", "Op", "OP", "os", "opensearch"];
}

// The derived schema would only list the canonical name, the API server has to
// accept the aliases too.
impl JsonSchema for Vendor {
    fn schema_name() -> Cow<'static, str> {
        "Vendor".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "enum": Vendor::SPELLINGS
        })
    }
}

/// Additional services deployed next to the cluster
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfMgmt {
    #[serde(default)]
    pub auto_scaler: bool,
    #[serde(default)]
    pub monitoring: bool,
    #[serde(default, rename = "VerUpdate")]
    pub ver_update: bool,
    #[serde(default)]
    pub smart_scaler: bool,
}
