pub mod cluster;
pub mod dashboards;
pub mod node_pool;
pub mod security;
pub mod status;
