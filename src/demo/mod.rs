//! The EKS demo bring-up.
//!
//! - [`settings`] - run options and the fixed defaults they fall back to
//! - [`credentials`] - source chains for tokens, registry access and the cluster name
//! - [`cluster`] - read-only AWS and Kubernetes lookups
//! - [`manifests`] - Kubernetes resources applied through stdin
//! - [`plan`] - the ordered step list for one bring-up

pub mod cluster;
pub mod credentials;
pub mod manifests;
pub mod plan;
pub mod settings;

pub use cluster::{CallerIdentity, CaptureFn, Discovery};
pub use credentials::{resolve_cluster_name, resolve_credentials, Credentials};
pub use plan::{build_plan, AgentDeployment, ClusterTarget};
pub use settings::{choose_agent, Agent, Cni, Settings};
