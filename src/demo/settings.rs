//! Run settings.

use clap::ValueEnum;

use crate::error::{HsdemoError, Result};
use crate::ui::{Prompt, PromptOption, PromptType, UserInterface};

/// Cluster name used when none is given and none can be asked for.
pub const DEFAULT_CLUSTER_NAME: &str = "hsdemo-cluster";

/// Registry hosting the Tesseract agent images and chart.
pub const DEFAULT_TSA_REGISTRY: &str = "654654525765.dkr.ecr.us-east-2.amazonaws.com";

/// Region of the registry, used for the ECR password lookup.
pub const DEFAULT_REGION: &str = "us-east-2";

/// Version of the `hypershield-tsa` chart.
pub const TSA_CHART_VERSION: &str = "1.6.0";

/// Network plugin of the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Cni {
    /// Install Cilium on top of the cluster.
    Cilium,
    /// Keep the default Amazon VPC CNI.
    AwsVpc,
}

/// Runtime security agent to deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Agent {
    /// Hypershield Tesseract Security Agent from the private registry.
    Tesseract,
    /// Open source Tetragon from the Cilium chart repository.
    Tetragon,
}

impl Agent {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::Tetragon => "tetragon",
        }
    }
}

/// Options for one bring-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cni: Cni,
    /// `None` means ask (interactive) or use Tesseract.
    pub agent: Option<Agent>,
    pub create_cluster: bool,
    pub cluster_name: Option<String>,
    pub tsa_registry: String,
    pub tsa_registry_email: Option<String>,
    pub region: String,
    pub interactive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cni: Cni::Cilium,
            agent: None,
            create_cluster: true,
            cluster_name: None,
            tsa_registry: DEFAULT_TSA_REGISTRY.to_string(),
            tsa_registry_email: None,
            region: DEFAULT_REGION.to_string(),
            interactive: true,
        }
    }
}

/// Pick the agent: the flag, else a select prompt, else Tesseract.
pub fn choose_agent(settings: &Settings, ui: &mut dyn UserInterface) -> Result<Agent> {
    if let Some(agent) = settings.agent {
        return Ok(agent);
    }
    if !settings.interactive {
        tracing::info!("No agent selected, using tesseract");
        return Ok(Agent::Tesseract);
    }

    let options = [
        (Agent::Tesseract, "Tesseract Security Agent (Hypershield)"),
        (Agent::Tetragon, "Tetragon (open source)"),
    ];
    let prompt = Prompt {
        key: "agent".to_string(),
        question: "Which agent should be deployed?".to_string(),
        prompt_type: PromptType::Select {
            options: options
                .iter()
                .map(|(agent, label)| PromptOption {
                    label: label.to_string(),
                    value: agent.as_str().to_string(),
                })
                .collect(),
        },
        default: Some(Agent::Tesseract.as_str().to_string()),
    };

    let answer = ui.prompt(&prompt)?.as_string();
    Agent::from_str(&answer, true).map_err(|_| HsdemoError::Prompt {
        message: format!("unknown agent '{}'", answer),
    })
}
