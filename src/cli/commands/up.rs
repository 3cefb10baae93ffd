//! Up command implementation.
//!
//! `hsdemo` checks its tools, resolves credentials, finds or creates the
//! cluster and then runs the deployment plan.

use std::path::PathBuf;

use crate::demo::cluster::cluster_unavailable;
use crate::demo::{
    build_plan, choose_agent, resolve_cluster_name, resolve_credentials, Agent,
    AgentDeployment, ClusterTarget, Discovery, Settings,
};
use crate::error::{HsdemoError, Result};
use crate::requirements::{Preflight, REQUIRED_PROGRAMS};
use crate::resolve::ValueResolver;
use crate::secrets::OutputMasker;
use crate::shell::{ProcessRunner, SystemRunner, TranscriptLog};
use crate::steps::StepSequencer;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The bring-up command.
pub struct UpCommand {
    settings: Settings,
    log_file: Option<PathBuf>,
    preflight: Preflight,
    resolver: ValueResolver,
    runner: Box<dyn ProcessRunner>,
    discovery: Discovery,
}

impl UpCommand {
    /// Create the command with the real environment, PATH and processes.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            log_file: None,
            preflight: Preflight::new(),
            resolver: ValueResolver::new(),
            runner: Box::new(SystemRunner),
            discovery: Discovery::new(),
        }
    }

    /// Append failed transcripts to this file.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn with_preflight(mut self, preflight: Preflight) -> Self {
        self.preflight = preflight;
        self
    }

    pub fn with_resolver(mut self, resolver: ValueResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_discovery(mut self, discovery: Discovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Get the run settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn check_tools(&self, ui: &mut dyn UserInterface) -> Result<()> {
        ui.show_header("Tools");

        let results = self.preflight.check(REQUIRED_PROGRAMS);
        for (program, found) in &results {
            if *found {
                ui.success(program);
            } else {
                ui.error(program);
            }
        }

        let missing: Vec<String> = results
            .into_iter()
            .filter(|(_, found)| !found)
            .map(|(program, _)| program)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            ui.message("Install the missing programs and make sure they are on your PATH.");
            Err(HsdemoError::MissingDependency { programs: missing })
        }
    }

    fn find_cluster(&self, ui: &mut dyn UserInterface) -> Result<ClusterTarget> {
        ui.show_header("AWS Environment");

        let identity = self.discovery.caller_identity()?;
        ui.message(&format!("Account: {}", identity.account));
        ui.message(&format!("Arn:     {}", identity.arn));
        ui.message(&format!("UserId:  {}", identity.user_id));

        let name = resolve_cluster_name(&self.resolver, &self.settings, ui)?;
        let name = name.value().to_string();

        if self.discovery.cluster_exists(&name)? {
            ui.message(&format!(
                "Using existing cluster {} found in the active AWS profile.",
                name
            ));
            return Ok(ClusterTarget { name, create: false });
        }

        if !self.settings.create_cluster {
            return Err(cluster_unavailable(&name));
        }

        ui.message(&format!(
            "No cluster {} found in the active AWS profile; it will be created. \
             If this is not expected, cancel and run `aws configure --profile PROFILENAME`.",
            name
        ));
        Ok(ClusterTarget { name, create: true })
    }

    fn report_splunk(&self, ui: &mut dyn UserInterface) {
        ui.show_header("Splunk");

        match self.discovery.splunk_admin_password() {
            Ok(password) => ui.message(&format!("admin password: {}", password)),
            Err(e) => ui.warning(&format!("Could not read the Splunk admin password: {}", e)),
        }
        match self.discovery.splunk_address() {
            Ok(Some(address)) => ui.message(&format!("Splunk UI: http://{}", address)),
            Ok(None) => ui.warning(
                "The Splunk load balancer has no address yet; check `kubectl get service splunk-lb --namespace=splunk-operator`",
            ),
            Err(e) => ui.warning(&format!("Could not read the Splunk address: {}", e)),
        }
    }
}

impl Command for UpCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.check_tools(ui)?;

        let agent = choose_agent(&self.settings, ui)?;
        let mut masker = OutputMasker::new();

        let deployment = match agent {
            Agent::Tesseract => {
                ui.show_header("Local Environment");
                let creds = resolve_credentials(&self.resolver, &self.settings, ui)?;
                creds.register_secrets(&mut masker);
                AgentDeployment::Tesseract(creds)
            }
            Agent::Tetragon => AgentDeployment::Tetragon,
        };

        let cluster = self.find_cluster(ui)?;
        let steps = build_plan(self.settings.cni, &deployment, &cluster)?;

        ui.show_header("Deploy");
        let log = self.log_file.as_ref().map(TranscriptLog::new);
        let report = StepSequencer::new(ui, self.runner.as_ref())
            .with_masker(&masker)
            .with_transcript_log(log.as_ref())
            .run(&steps, self.settings.interactive);

        ui.show_run_summary(&report.to_summary());
        if report.is_completed() {
            self.report_splunk(ui);
        }

        match report.into_result() {
            Ok(()) => Ok(CommandResult::success()),
            Err(e) if e.is_user_declined() => {
                ui.warning(&e.to_string());
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::credentials::{
        API_TOKEN_VAR, REGISTRY_CREDENTIAL_VAR, REGISTRY_EMAIL_VAR, REGISTRY_VAR,
    };
    use crate::demo::CaptureFn;
    use crate::requirements::probe::tests::create_fake_binary;
    use crate::shell::{CommandOutput, CommandSpec, ExecutionResult, Transcript};
    use crate::steps::StepStatus;
    use crate::ui::{MockUI, StatusSink};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::env::VarError;
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Runner recording every command; fails steps whose name is listed,
    /// echoing the command line and stdin into the transcript.
    struct RecordingRunner {
        failing: Vec<&'static str>,
        calls: Rc<RefCell<Vec<CommandSpec>>>,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, name: &str, command: &CommandSpec, sink: &mut dyn StatusSink) -> ExecutionResult {
            self.calls.borrow_mut().push(command.clone());
            sink.step_started(name);
            if self.failing.contains(&name) {
                let mut transcript = Transcript::new();
                transcript.push(format!("{} {}", command.program, command.args.join(" ")));
                for line in command.stdin.iter().flat_map(|s| s.lines()) {
                    transcript.push(line);
                }
                transcript.push(format!("{} exploded", command.program));
                for line in transcript.lines() {
                    sink.update_line(name, line);
                }
                sink.flush_transcript(name, &transcript);
                ExecutionResult::Failure {
                    transcript,
                    error: HsdemoError::ProcessExit {
                        program: command.program.clone(),
                        code: Some(1),
                    },
                }
            } else {
                sink.step_succeeded(name);
                ExecutionResult::Success {
                    transcript: Transcript::new(),
                }
            }
        }
    }

    fn output(success: bool, stdout: &str) -> Result<CommandOutput> {
        Ok(CommandOutput {
            exit_code: Some(if success { 0 } else { 1 }),
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success,
        })
    }

    fn aws_fake(cmd: &CommandSpec, cluster_found: bool) -> Result<CommandOutput> {
        match (cmd.program.as_str(), cmd.args.first().map(String::as_str)) {
            ("aws", _) => output(
                true,
                r#"{"UserId":"AIDA","Account":"123456789012","Arn":"arn:aws:iam::123456789012:user/demo"}"#,
            ),
            ("eksdemo", _) => output(cluster_found, ""),
            ("kubectl", _) if cmd.args.contains(&"secrets".to_string()) => {
                output(true, r#"{"data":{"password":"aHVudGVyMg=="}}"#)
            }
            ("kubectl", _) => output(
                true,
                r#"{"status":{"loadBalancer":{"ingress":[{"hostname":"lb.example"}]}}}"#,
            ),
            _ => output(false, ""),
        }
    }

    fn cluster_present(cmd: &CommandSpec) -> Result<CommandOutput> {
        aws_fake(cmd, true)
    }

    fn cluster_missing(cmd: &CommandSpec) -> Result<CommandOutput> {
        aws_fake(cmd, false)
    }

    struct Fixture {
        _bin: TempDir,
        calls: Rc<RefCell<Vec<CommandSpec>>>,
        command: UpCommand,
    }

    fn fixture(
        settings: Settings,
        env: &[(&str, &str)],
        capture: CaptureFn,
        failing: Vec<&'static str>,
    ) -> Fixture {
        let bin = TempDir::new().unwrap();
        for program in REQUIRED_PROGRAMS {
            create_fake_binary(&bin.path().join(program));
        }
        let vars: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let command = UpCommand::new(settings)
            .with_preflight(Preflight::with_path(vec![bin.path().to_path_buf()]))
            .with_resolver(ValueResolver::with_env(move |key: &str| {
                vars.get(key).cloned().ok_or(VarError::NotPresent)
            }))
            .with_runner(Box::new(RecordingRunner {
                failing,
                calls: Rc::clone(&calls),
            }))
            .with_discovery(Discovery::with_capture(capture));

        Fixture {
            _bin: bin,
            calls,
            command,
        }
    }

    fn tesseract_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (API_TOKEN_VAR, "tok3n"),
            (REGISTRY_VAR, "reg.example"),
            (REGISTRY_CREDENTIAL_VAR, "pa55"),
            (REGISTRY_EMAIL_VAR, "ops@example.com"),
        ]
    }

    fn non_interactive() -> Settings {
        Settings {
            interactive: false,
            ..Settings::default()
        }
    }

    #[test]
    fn full_run_reuses_existing_cluster() {
        let fx = fixture(non_interactive(), &tesseract_env(), cluster_present, vec![]);
        let mut ui = MockUI::new();

        let result = fx.command.execute(&mut ui).unwrap();

        assert!(result.success);
        let calls = fx.calls.borrow();
        assert_eq!(calls[0].program, "helm");
        assert!(!calls.iter().any(|c| c.args.first().map(String::as_str) == Some("create")));
        assert!(ui.has_message("Using existing cluster hsdemo-cluster"));
        assert!(ui.has_message("admin password: hunter2"));
        assert!(ui.has_message("http://lb.example"));
        assert_eq!(ui.summaries().len(), 1);
    }

    #[test]
    fn missing_cluster_is_created() {
        let fx = fixture(non_interactive(), &tesseract_env(), cluster_missing, vec![]);
        let mut ui = MockUI::new();

        let result = fx.command.execute(&mut ui).unwrap();

        assert!(result.success);
        let calls = fx.calls.borrow();
        let create = calls
            .iter()
            .find(|c| c.program == "eksdemo" && c.args[0] == "create")
            .unwrap();
        assert_eq!(create.args[2], "hsdemo-cluster");
    }

    #[test]
    fn missing_cluster_without_creation_fails_before_any_step() {
        let settings = Settings {
            create_cluster: false,
            ..non_interactive()
        };
        let fx = fixture(settings, &tesseract_env(), cluster_missing, vec![]);
        let mut ui = MockUI::new();

        let err = fx.command.execute(&mut ui).err().unwrap();

        assert!(matches!(err, HsdemoError::ClusterUnavailable { .. }));
        assert!(fx.calls.borrow().is_empty());
    }

    #[test]
    fn missing_tools_stop_the_run() {
        let mut fx = fixture(non_interactive(), &tesseract_env(), cluster_present, vec![]);
        fx.command = fx.command.with_preflight(Preflight::with_path(Vec::new()));
        let mut ui = MockUI::new();

        let err = fx.command.execute(&mut ui).err().unwrap();

        match err {
            HsdemoError::MissingDependency { programs } => {
                assert_eq!(programs, vec!["aws", "eksdemo", "helm", "kubectl"]);
            }
            other => panic!("expected MissingDependency, got {:?}", other),
        }
        assert_eq!(ui.errors().len(), 4);
        assert!(fx.calls.borrow().is_empty());
    }

    #[test]
    fn unresolved_token_stops_the_run() {
        let fx = fixture(non_interactive(), &[], cluster_present, vec![]);
        let mut ui = MockUI::new();

        let err = fx.command.execute(&mut ui).err().unwrap();
        assert!(matches!(err, HsdemoError::Unresolved { .. }));
        assert!(fx.calls.borrow().is_empty());
    }

    #[test]
    fn tetragon_needs_no_credentials() {
        let settings = Settings {
            agent: Some(Agent::Tetragon),
            ..non_interactive()
        };
        let fx = fixture(settings, &[], cluster_present, vec![]);
        let mut ui = MockUI::new();

        assert!(fx.command.execute(&mut ui).unwrap().success);
        assert!(!ui.headers().contains(&"Local Environment".to_string()));
    }

    #[test]
    fn fatal_failure_is_an_error() {
        let fx = fixture(
            non_interactive(),
            &tesseract_env(),
            cluster_present,
            vec!["installing cilium"],
        );
        let mut ui = MockUI::new();

        let err = fx.command.execute(&mut ui).err().unwrap();

        assert!(matches!(err, HsdemoError::StepFailed { ref step, .. } if step == "installing cilium"));
        let summary = &ui.summaries()[0];
        assert!(!summary.success);
        assert!(summary.skipped() > 0);
        assert!(!ui.has_message("admin password"));
    }

    #[test]
    fn soft_failure_still_succeeds() {
        let fx = fixture(
            non_interactive(),
            &tesseract_env(),
            cluster_present,
            vec!["waiting for splunk pod"],
        );
        let mut ui = MockUI::new();

        let result = fx.command.execute(&mut ui).unwrap();

        assert!(result.success);
        let summary = &ui.summaries()[0];
        assert_eq!(summary.failed(), 1);
        let status = summary
            .step_results
            .iter()
            .find(|s| s.name == "waiting for splunk pod")
            .map(|s| s.status);
        assert_eq!(status, Some(StepStatus::Failed));
    }

    #[test]
    fn declined_creation_exits_one_with_warning() {
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_prompt_response("confirming cluster creation", "no");
        let settings = Settings {
            agent: Some(Agent::Tetragon),
            cluster_name: Some("demo".to_string()),
            ..Settings::default()
        };
        let fx = fixture(settings, &[], cluster_missing, vec![]);

        let result = fx.command.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_warning("declined"));
        assert!(fx.calls.borrow().is_empty());
    }

    #[test]
    fn secrets_never_reach_the_transcript() {
        for failing in ["logging in to the TSA registry", "deploying TSA"] {
            let fx = fixture(
                non_interactive(),
                &tesseract_env(),
                cluster_present,
                vec![failing],
            );
            let mut ui = MockUI::new();

            let _ = fx.command.execute(&mut ui);

            let transcripts = ui.transcripts();
            assert_eq!(transcripts.len(), 1, "{}", failing);
            let (step, transcript) = &transcripts[0];
            assert_eq!(step, failing);
            assert!(transcript.contains("[REDACTED]"), "{}", transcript);
            assert!(!transcript.contains("tok3n"), "{}", transcript);
            assert!(!transcript.contains("pa55"), "{}", transcript);
        }
    }
}
