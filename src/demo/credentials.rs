//! Credential and cluster name resolution.

use crate::error::{HsdemoError, Result};
use crate::resolve::{ConfigValue, Request, Source, ValueResolver};
use crate::secrets::OutputMasker;
use crate::ui::UserInterface;

use super::settings::{Settings, DEFAULT_CLUSTER_NAME};

pub const API_TOKEN_VAR: &str = "SCC_API_TOKEN";
pub const REGISTRY_VAR: &str = "HYPERSHIELD_TSA_REGISTRY";
pub const REGISTRY_CREDENTIAL_VAR: &str = "HYPERSHIELD_TSA_REGISTRY_CREDENTIAL";
pub const REGISTRY_EMAIL_VAR: &str = "HYPERSHIELD_TSA_REGISTRY_EMAIL";

/// Everything the Tesseract agent needs from the operator.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Security Cloud Control API token.
    pub api_token: ConfigValue,
    /// Registry host.
    pub registry: ConfigValue,
    /// Registry password.
    pub registry_credential: ConfigValue,
    /// Contact email stored in the pull secret.
    pub registry_email: ConfigValue,
}

impl Credentials {
    /// Register every secret value with `masker`.
    pub fn register_secrets(&self, masker: &mut OutputMasker) {
        for value in [
            &self.api_token,
            &self.registry,
            &self.registry_credential,
            &self.registry_email,
        ] {
            if value.is_secret() {
                masker.add_secret(value.value());
            }
        }
    }
}

/// Source chains for the Tesseract credentials, in resolution order.
pub fn credential_requests(settings: &Settings) -> [Request; 4] {
    [
        Request::new("SCC API token")
            .source(Source::env(API_TOKEN_VAR))
            .source(Source::multiline_prompt(
                "Paste your Security Cloud Control API token",
            ))
            .mark_secret(),
        Request::new("TSA registry")
            .source(Source::env(REGISTRY_VAR))
            .source(Source::literal(settings.tsa_registry.clone())),
        Request::new("TSA registry credential")
            .source(Source::env(REGISTRY_CREDENTIAL_VAR))
            .source(Source::command(
                "aws",
                ["--region", settings.region.as_str(), "ecr", "get-login-password"],
            ))
            .mark_secret(),
        Request::new("TSA registry email")
            .source(Source::flag(settings.tsa_registry_email.as_deref()))
            .source(Source::env(REGISTRY_EMAIL_VAR))
            .source(Source::prompt("TSA registry email")),
    ]
}

/// Resolve all four Tesseract credentials, stopping at the first failure.
pub fn resolve_credentials(
    resolver: &ValueResolver,
    settings: &Settings,
    ui: &mut dyn UserInterface,
) -> Result<Credentials> {
    let [token, registry, credential, email] = credential_requests(settings);
    let mut resolve = |request: Request| -> Result<ConfigValue> {
        let value = resolver.resolve_request(&request, settings.interactive, &mut *ui)?;
        ui.success(&format!("{} (from {})", value.name(), value.source()));
        Ok(value)
    };

    Ok(Credentials {
        api_token: resolve(token)?,
        registry: resolve(registry)?,
        registry_credential: resolve(credential)?,
        registry_email: resolve(email)?,
    })
}

/// Resolve the cluster name: the flag, else a prompt, else the default.
pub fn resolve_cluster_name(
    resolver: &ValueResolver,
    settings: &Settings,
    ui: &mut dyn UserInterface,
) -> Result<ConfigValue> {
    let request = Request::new("cluster name")
        .source(Source::flag(settings.cluster_name.as_deref()))
        .source(Source::prompt_with_default("Cluster name", DEFAULT_CLUSTER_NAME));

    match resolver.resolve_request(&request, settings.interactive, ui) {
        Err(HsdemoError::Unresolved { .. }) if !settings.interactive => {
            ui.message(&format!(
                "Non-interactive mode, using default cluster name {}",
                DEFAULT_CLUSTER_NAME
            ));
            Ok(ConfigValue::new(
                "cluster name",
                DEFAULT_CLUSTER_NAME,
                Source::literal(DEFAULT_CLUSTER_NAME),
            ))
        }
        other => other,
    }
}
