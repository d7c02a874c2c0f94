//! Folding per-component reports into the cluster phase.

use serde_json::{Value, json};

use crate::crds::{
    cluster::ClusterSpec,
    status::{ClusterStatus, ComponentStatus, Phase},
};

/// Status component name of the dashboards deployment
pub const DASHBOARDS_COMPONENT: &str = "dashboards";
/// Status component name of the security config bootstrap job
pub const SECURITY_CONFIG_COMPONENT: &str = "securityconfig";

/// Status strings that count as healthy, compared case-insensitively.
pub const HEALTHY_STATUSES: [&str; 3] = ["Green", "Ready", "Running"];

impl ComponentStatus {
    pub fn is_healthy(&self) -> bool {
        HEALTHY_STATUSES
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&self.status))
    }
}

/// `Running` iff every declared component has at least one report and all of
/// its reports are healthy. A missing report counts as unhealthy, reports for
/// undeclared components are ignored.
pub fn aggregate<S: AsRef<str>>(declared: &[S], reported: &[ComponentStatus]) -> Phase {
    if declared.is_empty() {
        return Phase::Pending;
    }
    let healthy = declared.iter().all(|name| {
        let mut reports = reported
            .iter()
            .filter(|r| r.component == name.as_ref())
            .peekable();
        reports.peek().is_some() && reports.all(ComponentStatus::is_healthy)
    });
    if healthy { Phase::Running } else { Phase::Pending }
}

impl ClusterSpec {
    /// Components that have to be healthy for the cluster to run: node pools in
    /// declaration order, then the enabled auxiliary services.
    pub fn declared_components(&self) -> Vec<String> {
        let mut components: Vec<String> = Vec::with_capacity(self.node_pools.len() + 2);
        for pool in &self.node_pools {
            if !components.contains(&pool.component) {
                components.push(pool.component.clone());
            }
        }
        if self.dashboards.enable {
            components.push(DASHBOARDS_COMPONENT.into());
        }
        if self.security.as_ref().is_some_and(|s| s.config.is_some()) {
            components.push(SECURITY_CONFIG_COMPONENT.into());
        }
        components
    }
}

impl ClusterStatus {
    /// Replace the entry of the same component, or append a new one.
    pub fn upsert(&mut self, status: ComponentStatus) {
        match self
            .components_status
            .iter_mut()
            .find(|s| s.component == status.component)
        {
            Some(existing) => *existing = status,
            None => self.components_status.push(status),
        }
    }

    /// Drop every entry of a component. Returns whether anything was removed.
    pub fn remove(&mut self, component: &str) -> bool {
        let before = self.components_status.len();
        self.components_status.retain(|s| s.component != component);
        self.components_status.len() != before
    }

    /// Recompute `phase` from the current component entries.
    pub fn recompute(&mut self, spec: &ClusterSpec) -> Phase {
        self.phase = aggregate(
            spec.declared_components().as_slice(),
            &self.components_status,
        );
        self.phase
    }
}

/// Merge patch body for the status subresource.
pub fn status_patch(status: &ClusterStatus) -> Value {
    json!({ "status": status })
}
