use thiserror::Error;

/// Problems that make a cluster spec unacceptable.
///
/// `field` values are JSON paths into the spec, e.g. `nodePools[1].replicas`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: required field is missing")]
    MissingRequiredField { field: String },
    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: &'static str },
    #[error("{field}: certificates are not generated, a secret must be supplied")]
    MissingCredentialSource { field: String },
    #[error("{field}: use either `secret` or `keySecret` and `certSecret`, not both")]
    AmbiguousCredentialSource { field: String },
    #[error(
        "security.config.adminSecret: required when transport certificates are supplied instead of generated"
    )]
    MissingAdminCredential,
    #[error("nodePools: component `{component}` is declared more than once")]
    DuplicateNodePoolComponent { component: String },
}

/// Advisory findings. They never block acceptance of a spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    #[error("{field}: unknown node role `{role}`")]
    UnknownNodeRole { field: String, role: String },
    #[error("{field}: ignored, {reason}")]
    ConflictingInput { field: String, reason: &'static str },
    #[error("{field}: ignored, {reason}")]
    UnusedField { field: String, reason: &'static str },
    #[error("nodePools: no node pool has the `master` or `cluster_manager` role")]
    NoMasterNodePool,
}

/// Every error found in one validation pass, plus the warnings seen alongside.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cluster spec is invalid ({} error(s)): {}", .errors.len(), join(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
