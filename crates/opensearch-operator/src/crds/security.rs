use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Anything that points at externally stored secret material.
///
/// A reference whose name is empty is treated exactly like an absent one, so
/// `secret: {name: ""}` and a missing `secret` resolve the same way.
pub trait CredentialRef {
    /// Name of the referenced secret, `None` when unset or empty.
    fn secret_name(&self) -> Option<&str>;

    /// Key inside the secret, when the reference narrows it down to one.
    fn key(&self) -> Option<&str> {
        None
    }

    fn is_set(&self) -> bool {
        self.secret_name().is_some()
    }
}

impl CredentialRef for String {
    fn secret_name(&self) -> Option<&str> {
        (!self.is_empty()).then_some(self.as_str())
    }
}

impl<T: CredentialRef> CredentialRef for Option<T> {
    fn secret_name(&self) -> Option<&str> {
        self.as_ref().and_then(T::secret_name)
    }

    fn key(&self) -> Option<&str> {
        self.as_ref().and_then(T::key)
    }
}

/// Reference to a secret in the namespace of the cluster.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct SecretRef {
    #[serde(default)]
    pub name: String,
}

impl SecretRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CredentialRef for SecretRef {
    fn secret_name(&self) -> Option<&str> {
        self.name.secret_name()
    }
}

/// Reference to a single entry of a secret.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsSecret {
    pub secret_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl TlsSecret {
    pub fn new(secret_name: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl CredentialRef for TlsSecret {
    fn secret_name(&self) -> Option<&str> {
        self.secret_name.secret_name()
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Existing certificate material, used when certificates are not generated
/// or when generated certificates should be signed by an existing CA.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsCertificateConfig {
    /// TLS secret holding `ca.crt`, `tls.key` and `tls.crt`. `ca.crt` may live
    /// in `caSecret` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretRef>,
    /// Secret holding `ca.crt`. Combined with `generate: true` it must also
    /// hold `ca.key`, and node certificates are signed with that CA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_secret: Option<SecretRef>,
}

impl TlsCertificateConfig {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(SecretRef::new(secret)),
            ca_secret: None,
        }
    }

    pub fn ca(mut self, ca_secret: impl Into<String>) -> Self {
        self.ca_secret = Some(SecretRef::new(ca_secret));
        self
    }
}

/// TLS for node to node traffic.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfigTransport {
    /// Let the operator generate a CA and certificates. If false, existing
    /// certificates must be supplied through secrets.
    #[serde(default)]
    pub generate: bool,
    /// Generate one certificate per node instead of a shared one.
    #[serde(default)]
    pub per_node: bool,
    #[serde(flatten)]
    pub certificate_config: TlsCertificateConfig,
    /// Certificate DNs accepted as cluster nodes. Only used with supplied certificates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes_dn: Vec<String>,
    /// Certificate DNs granted admin access, e.g. for securityconfig updates.
    /// Only used with supplied certificates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_dn: Vec<String>,
}

impl TlsConfigTransport {
    pub fn generated() -> Self {
        Self {
            generate: true,
            ..Default::default()
        }
    }

    pub fn supplied(certificate_config: TlsCertificateConfig) -> Self {
        Self {
            generate: false,
            certificate_config,
            ..Default::default()
        }
    }
}

/// TLS for the client facing REST interface.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfigHttp {
    #[serde(default)]
    pub generate: bool,
    #[serde(flatten)]
    pub certificate_config: TlsCertificateConfig,
}

impl TlsConfigHttp {
    pub fn generated() -> Self {
        Self {
            generate: true,
            ..Default::default()
        }
    }

    pub fn supplied(certificate_config: TlsCertificateConfig) -> Self {
        Self {
            generate: false,
            certificate_config,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct TlsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TlsConfigTransport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<TlsConfigHttp>,
}

/// Bootstrap material for the security plugin.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Secret with the security plugin yml files (config.yml, internal_users.yml, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_config_secret: Option<SecretRef>,
    /// TLS secret with an admin client certificate (tls.key, tls.crt, ca.crt).
    /// Must be set when transport certificates are supplied instead of generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_secret: Option<SecretRef>,
}

/// Options for managing the security plugin.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct Security {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SecurityConfig>,
}

impl Security {
    pub fn transport(&self) -> Option<&TlsConfigTransport> {
        self.tls.as_ref().and_then(|tls| tls.transport.as_ref())
    }

    pub fn http(&self) -> Option<&TlsConfigHttp> {
        self.tls.as_ref().and_then(|tls| tls.http.as_ref())
    }

    /// True when a custom securityconfig secret replaces the default bootstrap config.
    pub fn has_custom_config(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|c| c.security_config_secret.is_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_count_as_unset() {
        assert!(!SecretRef::new("").is_set());
        assert!(!Some(SecretRef::default()).is_set());
        assert!(!None::<SecretRef>.is_set());
        assert_eq!(Some(SecretRef::new("certs")).secret_name(), Some("certs"));
        assert_eq!(TlsSecret::new("key").with_key("").key(), None);
        assert_eq!(TlsSecret::new("key").with_key("tls.key").key(), Some("tls.key"));
    }

    #[test]
    fn certificate_config_is_flattened() {
        let transport: TlsConfigTransport = serde_json::from_value(serde_json::json!({
            "generate": false,
            "secret": {"name": "transport-certs"},
            "caSecret": {"name": "ca"},
            "adminDn": ["CN=admin"]
        }))
        .unwrap();
        assert_eq!(
            transport.certificate_config,
            TlsCertificateConfig::with_secret("transport-certs").ca("ca")
        );
        assert_eq!(transport.admin_dn, vec!["CN=admin".to_string()]);
        assert!(!transport.per_node);

        let back = serde_json::to_value(&transport).unwrap();
        assert_eq!(back["secret"]["name"], "transport-certs");
        assert!(back.get("nodesDn").is_none());
    }
}
