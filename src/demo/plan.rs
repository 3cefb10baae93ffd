//! The bring-up plan.

use crate::error::Result;
use crate::shell::CommandSpec;
use crate::steps::Step;

use super::cluster::{SPLUNK_NAMESPACE, SPLUNK_SERVICE};
use super::credentials::Credentials;
use super::manifests::{
    registry_pull_secret, splunk_standalone, AGENT_NAMESPACE, PULL_SECRET_NAME, REGISTRY_USER,
};
use super::settings::{Cni, TSA_CHART_VERSION};

const SPLUNK_OPERATOR_MANIFEST: &str =
    "https://github.com/splunk/splunk-operator/releases/download/2.7.0/splunk-operator-namespace.yaml";
const SPLUNK_POD: &str = "splunk-s1-standalone-0";
const WAIT_TIMEOUT: &str = "--timeout=180s";

/// The cluster the plan deploys into.
#[derive(Debug, Clone)]
pub struct ClusterTarget {
    pub name: String,
    /// Create the cluster first (it was not found).
    pub create: bool,
}

/// Which agent to deploy, with what it needs.
#[derive(Debug, Clone)]
pub enum AgentDeployment {
    Tesseract(Credentials),
    Tetragon,
}

/// Build the ordered step list.
///
/// State-changing provisioning steps are fatal; the Splunk logging stack
/// is soft so a slow or failed Splunk install still leaves a usable
/// cluster.
pub fn build_plan(cni: Cni, agent: &AgentDeployment, cluster: &ClusterTarget) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let name = cluster.name.as_str();

    if let AgentDeployment::Tesseract(creds) = agent {
        steps.push(Step::fatal(
            "logging in to the TSA registry",
            CommandSpec::new("helm")
                .args(["registry", "login", "--username", REGISTRY_USER, "--password-stdin"])
                .arg(creds.registry.value())
                .stdin(creds.registry_credential.value()),
        ));
    }

    if cluster.create {
        steps.push(Step::confirm(
            "confirming cluster creation",
            "Do you wish to continue?",
            Some(format!(
                "Continuing will create cluster {} and related resources in the above AWS \
                 account. Please ensure this is a non-production demo system. This takes \
                 approximately 20 minutes.",
                name
            )),
        ));
        steps.push(Step::fatal(
            "creating cluster",
            CommandSpec::new("eksdemo")
                .args(["create", "cluster", name])
                .args(["--os", "Ubuntu2004", "--version", "1.29"]),
        ));
    }

    if cni == Cni::Cilium {
        steps.push(Step::fatal(
            "installing cilium",
            CommandSpec::new("eksdemo").args(["install", "cilium", "--cluster", name]),
        ));
    }

    match agent {
        AgentDeployment::Tesseract(creds) => {
            let registry = creds.registry.value();
            steps.push(Step::fatal(
                "deploying registry secret",
                CommandSpec::new("kubectl")
                    .args(["apply", "-f", "-"])
                    .stdin(registry_pull_secret(
                        registry,
                        creds.registry_credential.value(),
                        creds.registry_email.value(),
                    )?),
            ));
            steps.push(Step::fatal(
                "deploying TSA",
                CommandSpec::new("helm")
                    .args(["upgrade", "--install", "hypershield-tsa"])
                    .arg(format!("oci://{}/charts/hypershield-tsa", registry))
                    .args(["--namespace", AGENT_NAMESPACE, "--version", TSA_CHART_VERSION])
                    .arg("--set")
                    .arg(format!("apiTokenSecret={}", creds.api_token.value()))
                    .args(["--set", "tetragon.imagePullPolicy=Always", "--set"])
                    .arg(format!("tetragon.imagePullSecrets[0].name={}", PULL_SECRET_NAME)),
            ));
        }
        AgentDeployment::Tetragon => {
            steps.push(Step::fatal(
                "deploying Tetragon",
                CommandSpec::new("helm").args([
                    "upgrade",
                    "--install",
                    "tetragon",
                    "cilium/tetragon",
                    "--namespace",
                    AGENT_NAMESPACE,
                ]),
            ));
        }
    }

    steps.push(Step::fatal(
        "installing storage driver",
        CommandSpec::new("eksdemo").args(["install", "storage-ebs-csi", "-c", name]),
    ));
    steps.push(Step::fatal(
        "annotating storage",
        CommandSpec::new("kubectl").args([
            "annotate",
            "--overwrite",
            "storageclass",
            "gp2",
            "storageclass.kubernetes.io/is-default-class=true",
        ]),
    ));

    let namespace = format!("--namespace={}", SPLUNK_NAMESPACE);
    steps.push(Step::soft(
        "deploying splunk operator",
        CommandSpec::new("kubectl").args([
            "apply",
            "--server-side",
            "--force-conflicts",
            "-f",
            SPLUNK_OPERATOR_MANIFEST,
        ]),
    ));
    steps.push(Step::soft(
        "deploying splunk instance",
        CommandSpec::new("kubectl")
            .arg("apply")
            .arg(namespace.as_str())
            .args(["-f", "-"])
            .stdin(splunk_standalone()?),
    ));
    steps.push(Step::soft(
        "waiting for splunk rollout",
        CommandSpec::new("kubectl")
            .args(["rollout", "status", "-w"])
            .arg(namespace.as_str())
            .args([WAIT_TIMEOUT, "deployment/splunk-operator-controller-manager"]),
    ));
    steps.push(Step::soft(
        "waiting for splunk pod",
        CommandSpec::new("kubectl")
            .args(["wait", "--for=condition=ready"])
            .arg(format!("pod/{}", SPLUNK_POD))
            .arg(namespace.as_str())
            .arg(WAIT_TIMEOUT),
    ));
    steps.push(Step::soft(
        "creating load balancer",
        CommandSpec::new("kubectl")
            .args(["expose", "pod", SPLUNK_POD])
            .args(["--type=LoadBalancer", "--port=80", "--target-port=8000"])
            .arg(format!("--name={}", SPLUNK_SERVICE))
            .arg(namespace.as_str()),
    ));

    Ok(steps)
}
