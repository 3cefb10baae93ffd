//! Read-only AWS and Kubernetes lookups.

use anyhow::{anyhow, Context};
use base64::Engine;
use serde::Deserialize;

use crate::error::{HsdemoError, Result};
use crate::shell::{capture, CommandOutput, CommandSpec};

pub const SPLUNK_NAMESPACE: &str = "splunk-operator";
pub const SPLUNK_SECRET: &str = "splunk-s1-standalone-secret-v1";
pub const SPLUNK_SERVICE: &str = "splunk-lb";

/// Signature of the function used to run lookup commands.
pub type CaptureFn = fn(&CommandSpec) -> Result<CommandOutput>;

/// The AWS principal the CLI is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
    pub user_id: String,
}

impl CallerIdentity {
    /// Parse the output of `aws sts get-caller-identity`.
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).context("parsing caller identity")?)
    }
}

#[derive(Debug, Deserialize)]
struct SecretData {
    data: std::collections::BTreeMap<String, String>,
}

/// Extract and decode `data.password` from a Secret in JSON form.
pub fn decode_secret_password(json: &str) -> Result<String> {
    let secret: SecretData = serde_json::from_str(json).context("parsing secret")?;
    let encoded = secret
        .data
        .get("password")
        .ok_or_else(|| anyhow!("secret has no password entry"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .context("decoding password")?;
    Ok(String::from_utf8(bytes).context("password is not valid UTF-8")?)
}

#[derive(Debug, Default, Deserialize)]
struct Service {
    #[serde(default)]
    status: ServiceStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatus {
    #[serde(default)]
    load_balancer: LoadBalancerStatus,
}

/// `status.loadBalancer` of a Service.
#[derive(Debug, Default, Deserialize)]
pub struct LoadBalancerStatus {
    #[serde(default)]
    pub ingress: Vec<LoadBalancerIngress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadBalancerIngress {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
}

impl LoadBalancerStatus {
    /// Parse a Service in JSON form and return its load balancer status.
    pub fn from_service_json(json: &str) -> Result<Self> {
        let service: Service = serde_json::from_str(json).context("parsing service")?;
        Ok(service.status.load_balancer)
    }

    /// First ingress hostname, else first ingress IP.
    pub fn address(&self) -> Option<&str> {
        self.ingress
            .iter()
            .find_map(|i| i.hostname.as_deref().filter(|h| !h.is_empty()))
            .or_else(|| {
                self.ingress
                    .iter()
                    .find_map(|i| i.ip.as_deref().filter(|ip| !ip.is_empty()))
            })
    }
}

/// Runs the lookups a bring-up needs before and after the plan.
pub struct Discovery<C = CaptureFn> {
    capture: C,
}

impl Discovery {
    /// Discovery backed by real processes.
    pub fn new() -> Self {
        Self {
            capture: capture as CaptureFn,
        }
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Discovery<C>
where
    C: Fn(&CommandSpec) -> Result<CommandOutput>,
{
    /// Discovery with a custom capture function.
    pub fn with_capture(capture: C) -> Self {
        Self { capture }
    }

    /// `aws sts get-caller-identity`.
    pub fn caller_identity(&self) -> Result<CallerIdentity> {
        let stdout = self.stdout_of(
            CommandSpec::new("aws").args(["sts", "get-caller-identity", "--output", "json"]),
        )?;
        CallerIdentity::parse(&stdout)
    }

    /// Whether `eksdemo get cluster NAME` finds the cluster.
    ///
    /// Only a failure to start eksdemo is an error; any non-zero exit means
    /// the cluster does not exist in the active profile.
    pub fn cluster_exists(&self, name: &str) -> Result<bool> {
        let output = (self.capture)(&CommandSpec::new("eksdemo").args(["get", "cluster", name]))?;
        if !output.success {
            tracing::debug!("eksdemo get cluster {}: {}", name, output.stderr.trim());
        }
        Ok(output.success)
    }

    /// The Splunk admin password.
    pub fn splunk_admin_password(&self) -> Result<String> {
        let stdout = self.stdout_of(
            CommandSpec::new("kubectl")
                .args(["get", "secrets"])
                .arg(format!("--namespace={}", SPLUNK_NAMESPACE))
                .args([SPLUNK_SECRET, "--output", "json"]),
        )?;
        decode_secret_password(&stdout)
    }

    /// External address of the Splunk load balancer, once assigned.
    pub fn splunk_address(&self) -> Result<Option<String>> {
        let stdout = self.stdout_of(
            CommandSpec::new("kubectl")
                .args(["get", "service", SPLUNK_SERVICE])
                .arg(format!("--namespace={}", SPLUNK_NAMESPACE))
                .args(["--output", "json"]),
        )?;
        let status = LoadBalancerStatus::from_service_json(&stdout)?;
        Ok(status.address().map(str::to_string))
    }

    fn stdout_of(&self, command: CommandSpec) -> Result<String> {
        let output = (self.capture)(&command)?;
        if !output.success {
            tracing::debug!("{} failed: {}", command.program, output.stderr.trim());
        }
        output.into_stdout(&command.program)
    }
}

/// Error for a missing cluster that may not be created.
pub fn cluster_unavailable(name: &str) -> HsdemoError {
    HsdemoError::ClusterUnavailable {
        name: name.to_string(),
        message: "not found in the active AWS profile and cluster creation is disabled; \
                  check `aws configure --profile PROFILENAME`"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    fn output(success: bool, stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: Some(if success { 0 } else { 1 }),
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success,
        }
    }

    const IDENTITY: &str = r#"{
        "UserId": "AIDAEXAMPLE",
        "Account": "123456789012",
        "Arn": "arn:aws:iam::123456789012:user/demo"
    }"#;

    #[test]
    fn parses_caller_identity() {
        let identity = CallerIdentity::parse(IDENTITY).unwrap();
        assert_eq!(identity.account, "123456789012");
        assert_eq!(identity.user_id, "AIDAEXAMPLE");
        assert!(identity.arn.ends_with("user/demo"));
    }

    #[test]
    fn malformed_identity_is_an_error() {
        assert!(matches!(
            CallerIdentity::parse("not json"),
            Err(HsdemoError::Other(_))
        ));
    }

    #[test]
    fn decodes_splunk_password() {
        let json = r#"{"apiVersion":"v1","kind":"Secret","data":{"password":"aHVudGVyMg==","hec_token":"eA=="}}"#;
        assert_eq!(decode_secret_password(json).unwrap(), "hunter2");
    }

    #[test]
    fn secret_without_password_is_an_error() {
        let json = r#"{"data":{"hec_token":"eA=="}}"#;
        let err = decode_secret_password(json).unwrap_err();
        assert!(err.to_string().contains("no password"));
    }

    #[test]
    fn load_balancer_prefers_hostname() {
        let json = r#"{"status":{"loadBalancer":{"ingress":[{"hostname":"abc.elb.amazonaws.com"},{"ip":"10.0.0.1"}]}}}"#;
        let status = LoadBalancerStatus::from_service_json(json).unwrap();
        assert_eq!(status.address(), Some("abc.elb.amazonaws.com"));
    }

    #[test]
    fn load_balancer_falls_back_to_ip() {
        let json = r#"{"status":{"loadBalancer":{"ingress":[{"ip":"10.0.0.1"}]}}}"#;
        let status = LoadBalancerStatus::from_service_json(json).unwrap();
        assert_eq!(status.address(), Some("10.0.0.1"));
    }

    #[test]
    fn pending_load_balancer_has_no_address() {
        let json = r#"{"status":{"loadBalancer":{}}}"#;
        assert_eq!(LoadBalancerStatus::from_service_json(json).unwrap().address(), None);
        assert_eq!(LoadBalancerStatus::from_service_json("{}").unwrap().address(), None);
    }

    #[test]
    fn discovery_reads_identity() {
        let calls = RefCell::new(Vec::new());
        let discovery = Discovery::with_capture(|cmd: &CommandSpec| {
            calls.borrow_mut().push(cmd.args.join(" "));
            Ok(output(true, IDENTITY))
        });

        let identity = discovery.caller_identity().unwrap();
        assert_eq!(identity.account, "123456789012");
        assert_eq!(calls.borrow()[0], "sts get-caller-identity --output json");
    }

    #[test]
    fn failed_identity_lookup_is_an_exit_error() {
        let discovery = Discovery::with_capture(|_: &CommandSpec| Ok(output(false, "")));
        assert!(matches!(
            discovery.caller_identity(),
            Err(HsdemoError::ProcessExit { .. })
        ));
    }

    #[test]
    fn cluster_lookup_maps_exit_status() {
        let found = Discovery::with_capture(|_: &CommandSpec| Ok(output(true, "demo")));
        let missing = Discovery::with_capture(|_: &CommandSpec| Ok(output(false, "")));

        assert!(found.cluster_exists("demo").unwrap());
        assert!(!missing.cluster_exists("demo").unwrap());
    }

    #[test]
    fn cluster_lookup_spawn_failure_is_an_error() {
        let discovery = Discovery::with_capture(|cmd: &CommandSpec| {
            Err(HsdemoError::ProcessSpawn {
                program: cmd.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        });
        assert!(discovery.cluster_exists("demo").is_err());
    }

    #[test]
    fn splunk_lookups_target_operator_namespace() {
        let calls = RefCell::new(Vec::new());
        let discovery = Discovery::with_capture(|cmd: &CommandSpec| {
            calls.borrow_mut().push(cmd.args.clone());
            let body = if cmd.args.contains(&"service".to_string()) {
                r#"{"status":{"loadBalancer":{"ingress":[{"hostname":"lb.example"}]}}}"#
            } else {
                r#"{"data":{"password":"cGFzcw=="}}"#
            };
            Ok(output(true, body))
        });

        assert_eq!(discovery.splunk_admin_password().unwrap(), "pass");
        assert_eq!(discovery.splunk_address().unwrap().as_deref(), Some("lb.example"));

        let calls = calls.borrow();
        assert!(calls.iter().all(|args| args.contains(&"--namespace=splunk-operator".to_string())));
        assert!(calls[0].contains(&SPLUNK_SECRET.to_string()));
        assert!(calls[1].contains(&SPLUNK_SERVICE.to_string()));
    }

    #[test]
    fn unavailable_cluster_names_the_cluster() {
        let err = cluster_unavailable("demo");
        assert!(err.to_string().contains("'demo'"));
    }
}
