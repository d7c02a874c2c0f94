//! Explicit registry of the custom resources this crate defines.
//!
//! Built once by the caller and passed around by reference, there is no
//! process wide registration.

use std::collections::BTreeMap;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::CustomResourceExt;

use crate::crds::cluster::OpenSearchCluster;

#[derive(Debug, Clone, Default)]
pub struct CrdRegistry {
    crds: BTreeMap<&'static str, CustomResourceDefinition>,
}

impl CrdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every resource of this crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<OpenSearchCluster>();
        registry
    }

    /// Add a resource. Registering the same resource twice is a no-op.
    pub fn register<K: CustomResourceExt>(&mut self) -> &mut Self {
        self.crds.entry(K::crd_name()).or_insert_with(K::crd);
        self
    }

    /// Look up a definition by its full name, e.g. `opensearchclusters.opensearch.opster.io`.
    pub fn get(&self, name: &str) -> Option<&CustomResourceDefinition> {
        self.crds.get(name)
    }

    pub fn contains<K: CustomResourceExt>(&self) -> bool {
        self.crds.contains_key(K::crd_name())
    }

    pub fn len(&self) -> usize {
        self.crds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crds.is_empty()
    }

    /// Definitions ordered by name.
    pub fn crds(&self) -> impl Iterator<Item = &CustomResourceDefinition> {
        self.crds.values()
    }

    /// All definitions as one multi-document YAML stream.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        let mut out = String::new();
        for (i, crd) in self.crds().enumerate() {
            if i > 0 {
                out.push_str("---\n");
            }
            out.push_str(&serde_yaml::to_string(crd)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let registry = CrdRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains::<OpenSearchCluster>());
        assert_eq!(registry.to_yaml().unwrap(), "");
    }

    #[test]
    fn defaults_hold_the_cluster_resource() {
        let mut registry = CrdRegistry::with_defaults();
        registry.register::<OpenSearchCluster>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<OpenSearchCluster>());
        let crd = registry
            .get("opensearchclusters.opensearch.opster.io")
            .unwrap();
        assert_eq!(crd.spec.group, "opensearch.opster.io");
    }
}
