//! Exhaustive validation of a [`ClusterSpec`] and its resolution into the
//! configuration the reconciliation controller acts on.
//!
//! Stages run in a fixed order: general settings, node pools, security, and
//! dashboards last. Nothing fails fast. Every applicable error of the whole
//! document is collected so one submission surfaces all problems at once.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    crds::{
        cluster::{ClusterSpec, GeneralConfig},
        dashboards::DashboardsConfig,
        node_pool::NodePool,
        security::{CredentialRef, Security, TlsConfigTransport},
    },
    error::{ValidationError, ValidationErrors, ValidationWarning},
    tls::{
        CertificateSource, DashboardsCertificateSource, Resolution, resolve_certificate,
        resolve_dashboards_certificate,
    },
};

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The warnings of a valid spec, or every error otherwise.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(ValidationErrors {
                errors: self.errors,
                warnings: self.warnings,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTransport {
    pub source: CertificateSource,
    /// Only ever true for generated certificates
    pub per_node: bool,
    /// Only populated for supplied certificates
    pub nodes_dn: Vec<String>,
    pub admin_dn: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSecurity {
    pub transport: Option<ResolvedTransport>,
    pub http: Option<CertificateSource>,
    pub admin_secret: Option<String>,
    pub security_config_secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDashboards {
    /// `None` when dashboards serve plain HTTP
    pub tls: Option<DashboardsCertificateSource>,
    pub opensearch_credentials_secret: Option<String>,
}

/// A validated spec, reduced to the decisions the controller needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCluster {
    /// `None` when the cluster runs without managed TLS
    pub security: Option<ResolvedSecurity>,
    /// `None` when dashboards are disabled
    pub dashboards: Option<ResolvedDashboards>,
    pub declared_components: Vec<String>,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a spec, collecting every error and warning.
pub fn validate(spec: &ClusterSpec) -> ValidationReport {
    check(spec).report
}

/// Validate a spec and, if it is acceptable, resolve its credential sources.
pub fn resolve(spec: &ClusterSpec) -> Result<ResolvedCluster, ValidationErrors> {
    let Checked {
        report,
        security,
        dashboards,
    } = check(spec);
    let warnings = report.into_result()?;
    Ok(ResolvedCluster {
        security,
        dashboards,
        declared_components: spec.declared_components(),
        warnings,
    })
}

struct Checked {
    report: ValidationReport,
    security: Option<ResolvedSecurity>,
    dashboards: Option<ResolvedDashboards>,
}

fn check(spec: &ClusterSpec) -> Checked {
    let mut checker = Checker::default();
    checker.general(&spec.general);
    checker.node_pools(&spec.node_pools);
    let security = spec.security.as_ref().map(|s| checker.security(s));
    let dashboards = checker.dashboards(&spec.dashboards, spec.security.as_ref());

    let report = checker.report;
    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated cluster spec"
    );
    Checked {
        report,
        security,
        dashboards,
    }
}

#[derive(Default)]
struct Checker {
    report: ValidationReport,
}

impl Checker {
    fn error(&mut self, error: ValidationError) {
        self.report.errors.push(error);
    }

    fn warn(&mut self, warning: ValidationWarning) {
        self.report.warnings.push(warning);
    }

    fn missing(&mut self, field: impl Into<String>) {
        self.error(ValidationError::MissingRequiredField {
            field: field.into(),
        });
    }

    fn invalid(&mut self, field: impl Into<String>, reason: &'static str) {
        self.error(ValidationError::InvalidValue {
            field: field.into(),
            reason,
        });
    }

    fn unused(&mut self, field: &str, reason: &'static str) {
        self.warn(ValidationWarning::UnusedField {
            field: field.to_owned(),
            reason,
        });
    }

    fn absorb<T>(&mut self, resolution: Result<Resolution<T>, ValidationError>) -> Option<T> {
        match resolution {
            Ok(Resolution { source, warnings }) => {
                self.report.warnings.extend(warnings);
                Some(source)
            }
            Err(err) => {
                self.error(err);
                None
            }
        }
    }

    fn general(&mut self, general: &GeneralConfig) {
        if general.service_name.is_empty() {
            self.missing("general.serviceName");
        }
        if !(1..=65535).contains(&general.http_port) {
            self.invalid("general.httpPort", "must be between 1 and 65535");
        }
    }

    fn node_pools(&mut self, pools: &[NodePool]) {
        if pools.is_empty() {
            self.missing("nodePools");
            return;
        }

        let mut seen = HashSet::new();
        for (i, pool) in pools.iter().enumerate() {
            let path = format!("nodePools[{i}]");

            if pool.component.is_empty() {
                self.missing(format!("{path}.component"));
            } else if !seen.insert(pool.component.as_str()) {
                self.error(ValidationError::DuplicateNodePoolComponent {
                    component: pool.component.clone(),
                });
            }

            if pool.replicas <= 0 {
                self.invalid(format!("{path}.replicas"), "must be greater than zero");
            }
            for (name, value) in [
                ("diskSize", pool.disk_size),
                ("cpu", pool.cpu),
                ("memory", pool.memory),
            ] {
                if value.is_some_and(|v| v < 0) {
                    self.invalid(format!("{path}.{name}"), "must not be negative");
                }
            }

            if pool.roles.is_empty() {
                self.missing(format!("{path}.roles"));
            }
            for role in pool.unknown_roles() {
                self.warn(ValidationWarning::UnknownNodeRole {
                    field: format!("{path}.roles"),
                    role: role.to_owned(),
                });
            }
        }

        if !pools.iter().any(NodePool::is_manager_eligible) {
            self.warn(ValidationWarning::NoMasterNodePool);
        }
    }

    fn security(&mut self, security: &Security) -> ResolvedSecurity {
        let transport = security.transport().and_then(|t| self.transport(t));
        let http = security.http().and_then(|http| {
            self.absorb(resolve_certificate(
                http.generate,
                &http.certificate_config,
                "security.tls.http",
            ))
        });

        let config = security.config.as_ref();
        let admin_secret = config
            .and_then(|c| c.admin_secret.secret_name())
            .map(str::to_owned);
        let security_config_secret = config
            .and_then(|c| c.security_config_secret.secret_name())
            .map(str::to_owned);

        // Without a generated PKI there is no way to derive an admin client
        // certificate for applying the securityconfig.
        let transport_supplied = security.transport().is_some_and(|t| !t.generate);
        if transport_supplied && admin_secret.is_none() {
            self.error(ValidationError::MissingAdminCredential);
        }

        ResolvedSecurity {
            transport,
            http,
            admin_secret,
            security_config_secret,
        }
    }

    fn transport(&mut self, transport: &TlsConfigTransport) -> Option<ResolvedTransport> {
        const GENERATED: &str = "certificates are generated by the operator";
        const SUPPLIED: &str = "certificates are supplied, not generated";

        if transport.generate {
            if !transport.nodes_dn.is_empty() {
                self.unused("security.tls.transport.nodesDn", GENERATED);
            }
            if !transport.admin_dn.is_empty() {
                self.unused("security.tls.transport.adminDn", GENERATED);
            }
        } else if transport.per_node {
            self.unused("security.tls.transport.perNode", SUPPLIED);
        }

        let source = self.absorb(resolve_certificate(
            transport.generate,
            &transport.certificate_config,
            "security.tls.transport",
        ))?;

        Some(if transport.generate {
            ResolvedTransport {
                source,
                per_node: transport.per_node,
                nodes_dn: Vec::new(),
                admin_dn: Vec::new(),
            }
        } else {
            ResolvedTransport {
                source,
                per_node: false,
                nodes_dn: transport.nodes_dn.clone(),
                admin_dn: transport.admin_dn.clone(),
            }
        })
    }

    fn dashboards(
        &mut self,
        dashboards: &DashboardsConfig,
        security: Option<&Security>,
    ) -> Option<ResolvedDashboards> {
        // Disabled dashboards may carry any leftover settings.
        if !dashboards.enable {
            return None;
        }

        let tls = dashboards
            .tls
            .as_ref()
            .filter(|tls| tls.enable)
            .and_then(|tls| self.absorb(resolve_dashboards_certificate(tls, "dashboards.tls")));

        let custom_config = security.is_some_and(Security::has_custom_config);
        let credentials = dashboards
            .opensearch_credentials_secret
            .secret_name()
            .map(str::to_owned);
        let opensearch_credentials_secret = match (custom_config, credentials) {
            (true, None) => {
                self.missing("dashboards.opensearchCredentialsSecret");
                None
            }
            (false, Some(_)) => {
                self.unused(
                    "dashboards.opensearchCredentialsSecret",
                    "only used with a custom securityConfigSecret",
                );
                None
            }
            (_, credentials) => credentials,
        };

        Some(ResolvedDashboards {
            tls,
            opensearch_credentials_secret,
        })
    }
}
