//! Resolution of where the certificates of a TLS plane come from.
//!
//! Everything in here is a pure function of its input. The same configuration
//! always resolves to the same source or fails with the same error.

use tracing::trace;

use crate::{
    crds::{
        dashboards::DashboardsTlsConfig,
        security::{CredentialRef, TlsCertificateConfig, TlsSecret},
    },
    error::{ValidationError, ValidationWarning},
};

const IGNORED_WHEN_GENERATED: &str = "certificates are generated by the operator";

/// Authoritative certificate source for the transport or HTTP plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateSource {
    /// The operator generates the certificates. With `ca_secret` set they are
    /// signed by that existing CA, otherwise by a freshly generated one.
    Generated { ca_secret: Option<String> },
    /// Key and certificate are read from `secret`. The CA comes from
    /// `ca_secret` when set, from `secret` otherwise.
    Supplied {
        secret: String,
        ca_secret: Option<String>,
    },
}

impl CertificateSource {
    pub fn is_generated(&self) -> bool {
        matches!(self, CertificateSource::Generated { .. })
    }

    /// Secret the CA certificate is read from, if any.
    pub fn ca_secret(&self) -> Option<&str> {
        match self {
            CertificateSource::Generated { ca_secret } => ca_secret.as_deref(),
            CertificateSource::Supplied { secret, ca_secret } => {
                Some(ca_secret.as_deref().unwrap_or(secret))
            }
        }
    }
}

/// Certificate source for the dashboards HTTPS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardsCertificateSource {
    Generated,
    /// One secret holding both `tls.key` and `tls.crt`
    Secret(String),
    /// Key and certificate in separate secrets
    KeyPair { key: TlsSecret, cert: TlsSecret },
}

/// A resolved source and the advisory findings made on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<T> {
    pub source: T,
    pub warnings: Vec<ValidationWarning>,
}

impl<T> Resolution<T> {
    fn clean(source: T) -> Self {
        Self {
            source,
            warnings: Vec::new(),
        }
    }
}

/// Resolve the source of a transport or HTTP plane.
///
/// `field` is the JSON path of the plane and prefixes every reported field.
pub fn resolve_certificate(
    generate: bool,
    config: &TlsCertificateConfig,
    field: &str,
) -> Result<Resolution<CertificateSource>, ValidationError> {
    let ca_secret = config.ca_secret.secret_name().map(str::to_owned);

    let resolution = if generate {
        let mut warnings = Vec::new();
        if config.secret.is_set() {
            warnings.push(ValidationWarning::ConflictingInput {
                field: format!("{field}.secret"),
                reason: IGNORED_WHEN_GENERATED,
            });
        }
        Resolution {
            source: CertificateSource::Generated { ca_secret },
            warnings,
        }
    } else {
        let secret = config.secret.secret_name().ok_or_else(|| {
            ValidationError::MissingCredentialSource {
                field: format!("{field}.secret"),
            }
        })?;
        Resolution::clean(CertificateSource::Supplied {
            secret: secret.to_owned(),
            ca_secret,
        })
    };

    trace!(field, source = ?resolution.source, "resolved certificate source");
    Ok(resolution)
}

/// Resolve the source of the dashboards certificate.
///
/// Supplied material comes in two shapes: a single `secret`, or `keySecret`
/// together with `certSecret`. Mixing the shapes is ambiguous, a half pair
/// without `secret` is missing its other half.
pub fn resolve_dashboards_certificate(
    tls: &DashboardsTlsConfig,
    field: &str,
) -> Result<Resolution<DashboardsCertificateSource>, ValidationError> {
    let secret = tls.secret.secret_name();
    let key = tls.key_secret.as_ref().filter(|s| s.is_set());
    let cert = tls.cert_secret.as_ref().filter(|s| s.is_set());

    if tls.generate {
        let warnings = [
            ("secret", secret.is_some()),
            ("keySecret", key.is_some()),
            ("certSecret", cert.is_some()),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| ValidationWarning::ConflictingInput {
            field: format!("{field}.{name}"),
            reason: IGNORED_WHEN_GENERATED,
        })
        .collect();
        return Ok(Resolution {
            source: DashboardsCertificateSource::Generated,
            warnings,
        });
    }

    let source = match (secret, key, cert) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(ValidationError::AmbiguousCredentialSource {
                field: field.to_owned(),
            });
        }
        (Some(secret), None, None) => DashboardsCertificateSource::Secret(secret.to_owned()),
        (None, Some(key), Some(cert)) => DashboardsCertificateSource::KeyPair {
            key: key.clone(),
            cert: cert.clone(),
        },
        (None, Some(_), None) => {
            return Err(ValidationError::MissingCredentialSource {
                field: format!("{field}.certSecret"),
            });
        }
        (None, None, Some(_)) => {
            return Err(ValidationError::MissingCredentialSource {
                field: format!("{field}.keySecret"),
            });
        }
        (None, None, None) => {
            return Err(ValidationError::MissingCredentialSource {
                field: format!("{field}.secret"),
            });
        }
    };

    trace!(field, source = ?source, "resolved dashboards certificate source");
    Ok(Resolution::clean(source))
}
