//! Kubernetes manifests applied through `kubectl apply -f -`.

use std::collections::BTreeMap;

use anyhow::Context;
use base64::Engine;
use serde::Serialize;

use crate::error::Result;

/// Name of the image pull secret the TSA chart references.
pub const PULL_SECRET_NAME: &str = "hypershield-tsa-registry";

/// Namespace the agents are installed in.
pub const AGENT_NAMESPACE: &str = "kube-system";

/// User name ECR expects with `get-login-password` tokens.
pub const REGISTRY_USER: &str = "AWS";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMeta {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    finalizers: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Standalone {
    api_version: &'static str,
    kind: &'static str,
    metadata: ObjectMeta,
}

/// The single-instance Splunk deployment `s1`.
///
/// The delete-pvc finalizer makes the operator remove its volumes when the
/// resource is deleted.
pub fn splunk_standalone() -> Result<String> {
    let resource = Standalone {
        api_version: "enterprise.splunk.com/v4",
        kind: "Standalone",
        metadata: ObjectMeta {
            name: "s1".to_string(),
            namespace: None,
            finalizers: vec!["enterprise.splunk.com/delete-pvc".to_string()],
        },
    };
    Ok(serde_yaml::to_string(&resource).context("serializing Standalone")?)
}

#[derive(Debug, Serialize)]
struct DockerConfig<'a> {
    auths: BTreeMap<&'a str, DockerAuth<'a>>,
}

#[derive(Debug, Serialize)]
struct DockerAuth<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
    auth: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Secret {
    api_version: &'static str,
    kind: &'static str,
    metadata: ObjectMeta,
    #[serde(rename = "type")]
    secret_type: &'static str,
    data: BTreeMap<&'static str, String>,
}

/// Image pull secret for `registry`, equivalent to
/// `kubectl create secret docker-registry` but applied from stdin so the
/// credential never appears on a command line.
pub fn registry_pull_secret(registry: &str, credential: &str, email: &str) -> Result<String> {
    let engine = base64::engine::general_purpose::STANDARD;

    let config = DockerConfig {
        auths: BTreeMap::from([(
            registry,
            DockerAuth {
                username: REGISTRY_USER,
                password: credential,
                email,
                auth: engine.encode(format!("{}:{}", REGISTRY_USER, credential)),
            },
        )]),
    };
    let config_json = serde_json::to_string(&config).context("serializing docker config")?;

    let secret = Secret {
        api_version: "v1",
        kind: "Secret",
        metadata: ObjectMeta {
            name: PULL_SECRET_NAME.to_string(),
            namespace: Some(AGENT_NAMESPACE.to_string()),
            finalizers: Vec::new(),
        },
        secret_type: "kubernetes.io/dockerconfigjson",
        data: BTreeMap::from([(".dockerconfigjson", engine.encode(config_json))]),
    };
    Ok(serde_yaml::to_string(&secret).context("serializing pull secret")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn decode(value: &str) -> String {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(value)
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn standalone_resource_shape() {
        let yaml: Value = serde_yaml::from_str(&splunk_standalone().unwrap()).unwrap();

        assert_eq!(yaml["apiVersion"].as_str(), Some("enterprise.splunk.com/v4"));
        assert_eq!(yaml["kind"].as_str(), Some("Standalone"));
        assert_eq!(yaml["metadata"]["name"].as_str(), Some("s1"));
        assert_eq!(
            yaml["metadata"]["finalizers"][0].as_str(),
            Some("enterprise.splunk.com/delete-pvc")
        );
        assert!(yaml["metadata"].get("namespace").is_none());
    }

    #[test]
    fn pull_secret_resource_shape() {
        let yaml: Value =
            serde_yaml::from_str(&registry_pull_secret("reg.example", "pa55", "ops@example.com").unwrap())
                .unwrap();

        assert_eq!(yaml["kind"].as_str(), Some("Secret"));
        assert_eq!(yaml["type"].as_str(), Some("kubernetes.io/dockerconfigjson"));
        assert_eq!(yaml["metadata"]["name"].as_str(), Some(PULL_SECRET_NAME));
        assert_eq!(yaml["metadata"]["namespace"].as_str(), Some("kube-system"));
        assert!(yaml["metadata"].get("finalizers").is_none());
    }

    #[test]
    fn pull_secret_auth_is_aws_credential() {
        let yaml: Value =
            serde_yaml::from_str(&registry_pull_secret("reg.example", "pa55", "ops@example.com").unwrap())
                .unwrap();
        let encoded = yaml["data"][".dockerconfigjson"].as_str().unwrap();
        let config: serde_json::Value = serde_json::from_str(&decode(encoded)).unwrap();

        let entry = &config["auths"]["reg.example"];
        assert_eq!(entry["username"], "AWS");
        assert_eq!(entry["password"], "pa55");
        assert_eq!(entry["email"], "ops@example.com");
        assert_eq!(decode(entry["auth"].as_str().unwrap()), "AWS:pa55");
    }

    #[test]
    fn credential_is_not_in_clear_text() {
        let yaml = registry_pull_secret("reg.example", "very-secret-token", "a@b.c").unwrap();
        assert!(!yaml.contains("very-secret-token"));
    }
}
