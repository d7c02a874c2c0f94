use std::path::Path;

use kube::ResourceExt;
use serde::Deserialize;

use crate::{
    crds::cluster::OpenSearchCluster,
    error::Error,
    validation::{ValidationReport, validate},
};

pub fn from_yaml(input: &str) -> Result<OpenSearchCluster, Error> {
    Ok(serde_yaml::from_str(input)?)
}

pub fn from_json(input: &str) -> Result<OpenSearchCluster, Error> {
    Ok(serde_json::from_str(input)?)
}

/// Every document of a `---` separated YAML stream. Empty documents, such as
/// the one after a trailing `---`, are skipped.
pub fn from_yaml_stream(input: &str) -> Result<Vec<OpenSearchCluster>, Error> {
    let mut clusters = Vec::new();
    for document in serde_yaml::Deserializer::from_str(input) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        clusters.push(serde_yaml::from_value(value)?);
    }
    Ok(clusters)
}

/// Read a YAML stream from a file.
pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<OpenSearchCluster>, Error> {
    let text = std::fs::read_to_string(path)?;
    from_yaml_stream(&text)
}

pub fn to_yaml(cluster: &OpenSearchCluster) -> Result<String, Error> {
    Ok(serde_yaml::to_string(cluster)?)
}

/// Validation outcome of one cluster document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCheck {
    pub cluster: String,
    pub report: ValidationReport,
}

impl DocumentCheck {
    /// Errors always fail a document, warnings only in strict mode.
    pub fn passes(&self, strict: bool) -> bool {
        self.report.is_valid() && !(strict && !self.report.warnings.is_empty())
    }
}

pub fn check(clusters: &[OpenSearchCluster]) -> Vec<DocumentCheck> {
    clusters
        .iter()
        .map(|cluster| DocumentCheck {
            cluster: cluster.name_any(),
            report: validate(&cluster.spec),
        })
        .collect()
}

/// Number of documents that do not pass.
pub fn failures(checks: &[DocumentCheck], strict: bool) -> usize {
    checks.iter().filter(|c| !c.passes(strict)).count()
}

/// Interpret the value of the strict mode switch, `true` or `1` enable it.
pub fn strict_flag(value: Option<&str>) -> bool {
    matches!(value, Some("true") | Some("1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crds::cluster::ClusterSpec;

    const MINIMAL: &str = r#"
apiVersion: opensearch.opster.io/v1
kind: OpenSearchCluster
metadata:
  name: logs
  namespace: search
spec:
  general:
    serviceName: logs
  nodePools:
    - component: nodes
      replicas: 3
      roles: [master, data]
"#;

    #[test]
    fn parses_yaml_and_json() {
        let cluster = from_yaml(MINIMAL).unwrap();
        assert_eq!(cluster.name_any(), "logs");
        assert_eq!(cluster.namespace().as_deref(), Some("search"));
        assert_eq!(cluster.spec.general.http_port, 9200);
        assert_eq!(cluster.spec.node_pools[0].roles, vec!["master", "data"]);
        assert!(cluster.spec.security.is_none());

        let json = serde_json::to_string(&cluster).unwrap();
        assert_eq!(from_json(&json).unwrap().spec, cluster.spec);
    }

    #[test]
    fn stream_yields_each_document() {
        let stream = format!("{MINIMAL}---{}", MINIMAL.replace("name: logs", "name: metrics"));
        let clusters = from_yaml_stream(&stream).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[1].name_any(), "metrics");
    }

    #[test]
    fn yaml_output_reads_back() {
        let cluster = OpenSearchCluster::new("empty", ClusterSpec::default());
        let text = to_yaml(&cluster).unwrap();
        assert!(text.contains("kind: OpenSearchCluster"));
        assert_eq!(from_yaml(&text).unwrap().spec, cluster.spec);
    }

    #[test]
    fn trailing_separator_and_empty_input_yield_no_extra_documents() {
        let trailing = format!("{MINIMAL}---\n");
        let clusters = from_yaml_stream(&trailing).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name_any(), "logs");

        let leading = format!("---\n{MINIMAL}---\n---\n");
        assert_eq!(from_yaml_stream(&leading).unwrap().len(), 1);

        assert!(from_yaml_stream("").unwrap().is_empty());
        assert!(from_yaml_stream("# nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn reads_fixture_from_disk() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/secured-cluster.yaml");
        let clusters = from_path(path).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name_any(), "secured");

        let err = from_path("/nonexistent/cluster.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn strict_mode_fails_on_warnings() {
        let warned = MINIMAL.replace("roles: [master, data]", "roles: [master, data, warm]");
        let invalid = MINIMAL
            .replace("name: logs", "name: broken")
            .replace("replicas: 3", "replicas: 0");
        let stream = format!("{MINIMAL}---{warned}---{invalid}");
        let checks = check(&from_yaml_stream(&stream).unwrap());

        let names: Vec<_> = checks.iter().map(|c| c.cluster.as_str()).collect();
        assert_eq!(names, vec!["logs", "logs", "broken"]);
        assert!(checks[0].passes(true));
        assert!(checks[1].passes(false));
        assert!(!checks[1].passes(true));
        assert!(!checks[2].passes(false));

        assert_eq!(failures(&checks, false), 1);
        assert_eq!(failures(&checks, true), 2);
    }

    #[test]
    fn strict_flag_values() {
        assert!(strict_flag(Some("true")));
        assert!(strict_flag(Some("1")));
        assert!(!strict_flag(Some("false")));
        assert!(!strict_flag(Some("yes")));
        assert!(!strict_flag(None));
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = from_yaml("spec: [not, a, map]").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
