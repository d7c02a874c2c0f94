//! Configuration contract of a managed OpenSearch cluster: the
//! `OpenSearchCluster` resource, its validation and credential resolution,
//! and the aggregation of observed component status into a cluster phase.

pub mod aggregation;
pub mod crds;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod tls;
pub mod validation;
