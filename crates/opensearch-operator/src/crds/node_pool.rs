use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A homogeneous group of cluster nodes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    /// Unique name of the pool, also used as its status component name
    #[serde(default)]
    pub component: String,
    pub replicas: i32,
    /// Disk size in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<i32>,
    /// Memory in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<i32>,
    /// JVM options, e.g. "-Xmx2g -Xms2g"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl NodePool {
    pub fn new<R: Into<String>>(
        component: impl Into<String>,
        replicas: i32,
        roles: impl IntoIterator<Item = R>,
    ) -> Self {
        Self {
            component: component.into(),
            replicas,
            roles: roles.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Role tokens that are not part of the known vocabulary.
    pub fn unknown_roles(&self) -> impl Iterator<Item = &str> {
        self.roles
            .iter()
            .map(String::as_str)
            .filter(|r| NodeRole::parse(r).is_none())
    }

    /// Whether the pool can be elected cluster manager.
    pub fn is_manager_eligible(&self) -> bool {
        self.roles
            .iter()
            .filter_map(|r| NodeRole::parse(r))
            .any(|r| r.is_manager())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Master,
    ClusterManager,
    Data,
    Ingest,
    Ml,
    RemoteClusterClient,
    Search,
    Coordinating,
}

impl NodeRole {
    pub const ALL: [NodeRole; 8] = [
        NodeRole::Master,
        NodeRole::ClusterManager,
        NodeRole::Data,
        NodeRole::Ingest,
        NodeRole::Ml,
        NodeRole::RemoteClusterClient,
        NodeRole::Search,
        NodeRole::Coordinating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Master => "master",
            NodeRole::ClusterManager => "cluster_manager",
            NodeRole::Data => "data",
            NodeRole::Ingest => "ingest",
            NodeRole::Ml => "ml",
            NodeRole::RemoteClusterClient => "remote_cluster_client",
            NodeRole::Search => "search",
            NodeRole::Coordinating => "coordinating",
        }
    }

    /// Case-sensitive lookup of a role token.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == token)
    }

    /// `master` is the legacy name of `cluster_manager`.
    pub fn is_manager(&self) -> bool {
        matches!(self, NodeRole::Master | NodeRole::ClusterManager)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
