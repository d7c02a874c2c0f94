use opensearch_operator::{
    crds::{
        cluster::{ClusterSpec, GeneralConfig},
        node_pool::NodePool,
        security::{SecretRef, Security, SecurityConfig, TlsConfig, TlsConfigTransport},
    },
    error::{ValidationError, ValidationWarning},
    validation::{resolve, validate},
};

fn base_spec() -> ClusterSpec {
    ClusterSpec {
        general: GeneralConfig {
            service_name: "search".into(),
            ..Default::default()
        },
        node_pools: vec![NodePool::new("nodes", 3, ["master", "data"])],
        ..Default::default()
    }
}

#[test]
fn missing_service_name_is_the_only_error() {
    let spec = ClusterSpec {
        general: GeneralConfig {
            service_name: String::new(),
            ..Default::default()
        },
        node_pools: vec![NodePool::new("data", 3, ["data"])],
        security: None,
        ..Default::default()
    };
    let report = validate(&spec);
    assert_eq!(
        report.errors,
        vec![ValidationError::MissingRequiredField {
            field: "general.serviceName".into()
        }]
    );
    assert_eq!(report.warnings, vec![ValidationWarning::NoMasterNodePool]);
}

#[test]
fn supplied_transport_without_secrets_reports_both_problems() {
    let spec = ClusterSpec {
        security: Some(Security {
            tls: Some(TlsConfig {
                transport: Some(TlsConfigTransport {
                    generate: false,
                    certificate_config: Default::default(),
                    ..Default::default()
                }),
                http: None,
            }),
            config: Some(SecurityConfig {
                admin_secret: Some(SecretRef::new("")),
                security_config_secret: None,
            }),
        }),
        ..base_spec()
    };
    let errors = validate(&spec).errors;
    assert!(errors.contains(&ValidationError::MissingCredentialSource {
        field: "security.tls.transport.secret".into()
    }));
    assert!(errors.contains(&ValidationError::MissingAdminCredential));
    assert_eq!(errors.len(), 2);
}

#[test]
fn duplicate_pair_reported_once() {
    let mut spec = base_spec();
    spec.node_pools.push(NodePool::new("data", 2, ["data"]));
    spec.node_pools.push(NodePool::new("data", 2, ["data"]));
    let count = validate(&spec)
        .errors
        .iter()
        .filter(|e| {
            **e == ValidationError::DuplicateNodePoolComponent {
                component: "data".into(),
            }
        })
        .count();
    assert_eq!(count, 1);
}

#[test]
fn unknown_roles_do_not_block_acceptance() {
    let mut spec = base_spec();
    spec.node_pools.push(NodePool::new("frozen", 1, ["data", "frozen"]));
    let resolved = resolve(&spec).unwrap();
    assert_eq!(
        resolved.warnings,
        vec![ValidationWarning::UnknownNodeRole {
            field: "nodePools[1].roles".into(),
            role: "frozen".into()
        }]
    );
}

#[test]
fn validation_is_idempotent() {
    let mut spec = base_spec();
    spec.general.service_name.clear();
    spec.node_pools.push(NodePool::new("nodes", 0, ["gpu"]));
    spec.security = Some(Security {
        tls: Some(TlsConfig {
            transport: Some(TlsConfigTransport::default()),
            http: None,
        }),
        config: None,
    });
    let snapshot = spec.clone();

    let first = validate(&spec);
    let second = validate(&spec);
    assert_eq!(first, second);
    assert_eq!(spec, snapshot);
    assert_eq!(resolve(&spec).unwrap_err().errors, first.errors);
}

#[test]
fn concurrent_validation_of_a_shared_spec() {
    let mut spec = base_spec();
    spec.general.http_port = -1;
    spec.node_pools.push(NodePool::new("nodes", 1, ["data"]));
    let expected = validate(&spec);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| validate(&spec))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
