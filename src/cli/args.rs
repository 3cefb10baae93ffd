//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::demo::settings::{Agent, Cni, Settings, DEFAULT_REGION, DEFAULT_TSA_REGISTRY};

/// hsdemo - Hypershield demo environment on EKS.
///
/// Creates (or reuses) an EKS cluster, installs Cilium, a runtime security
/// agent and a Splunk instance. Non-production demo use only.
#[derive(Debug, Parser)]
#[command(name = "hsdemo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide section headers and completed-step lines
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    #[command(flatten)]
    pub up: UpArgs,
}

/// Options for the bring-up.
#[derive(Debug, Clone, clap::Args)]
pub struct UpArgs {
    /// Network plugin
    #[arg(long, value_enum, default_value_t = Cni::Cilium)]
    pub cni: Cni,

    /// Agent to deploy (prompted when interactive, tesseract otherwise)
    #[arg(long, value_enum)]
    pub agent: Option<Agent>,

    /// Fail instead of creating a missing cluster
    #[arg(long)]
    pub no_create_cluster: bool,

    /// EKS cluster name [default: hsdemo-cluster]
    #[arg(long, env = "HSDEMO_CLUSTER_NAME", value_name = "NAME")]
    pub cluster_name: Option<String>,

    /// TSA container registry (overridden by HYPERSHIELD_TSA_REGISTRY)
    #[arg(long, value_name = "HOST", default_value = DEFAULT_TSA_REGISTRY)]
    pub tsa_registry: String,

    /// TSA registry email (else HYPERSHIELD_TSA_REGISTRY_EMAIL)
    #[arg(long, value_name = "EMAIL")]
    pub tsa_registry_email: Option<String>,

    /// AWS region of the TSA registry
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Use defaults, no prompts; confirmations are accepted
    #[arg(long)]
    pub non_interactive: bool,

    /// Append the output of failed steps to this file
    #[arg(long, env = "HSDEMO_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl UpArgs {
    /// Settings for a run; `interactive` is decided by the caller.
    pub fn to_settings(&self, interactive: bool) -> Settings {
        Settings {
            cni: self.cni,
            agent: self.agent,
            create_cluster: !self.no_create_cluster,
            cluster_name: self.cluster_name.clone().filter(|n| !n.is_empty()),
            tsa_registry: self.tsa_registry.clone(),
            tsa_registry_email: self.tsa_registry_email.clone(),
            region: self.region.clone(),
            interactive,
        }
    }
}
