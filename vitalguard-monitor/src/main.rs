//! Binary entrypoint for the VitalGuard monitor.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use vitalguard_connectors::{LogNotifier, Notifier, ShutdownTrigger, WebhookConfig, WebhookNotifier};
use vitalguard_core::MonitorConfig;
use vitalguard_monitor::{LogActuator, LogDisplay, Monitor, SimulatedSource, SimulatedVitals};

const WEBHOOK_URL_VAR: &str = "VITALGUARD_WEBHOOK_URL";
const WEBHOOK_TOKEN_VAR: &str = "VITALGUARD_WEBHOOK_TOKEN";
const WEBHOOK_USER_VAR: &str = "VITALGUARD_WEBHOOK_USER";
const WEBHOOK_PASSWORD_VAR: &str = "VITALGUARD_WEBHOOK_PASSWORD";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scenario {
    Resting,
    Tachycardia,
    Fever,
    Detached,
}

impl Scenario {
    fn vitals(self) -> SimulatedVitals {
        match self {
            Scenario::Resting => SimulatedVitals::resting(),
            Scenario::Tachycardia => SimulatedVitals::tachycardia(),
            Scenario::Fever => SimulatedVitals::fever(),
            Scenario::Detached => SimulatedVitals::detached(),
        }
    }
}

#[derive(Parser)]
#[command(name = "vitalguard", version, about = "Vital signs monitor with debounced alerting")]
struct Cli {
    /// JSON configuration file; defaults apply to missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Control server address, overrides the configuration
    #[arg(long)]
    bind: Option<String>,

    /// Do not start the remote control server
    #[arg(long)]
    no_control: bool,

    /// Vital signs produced by the simulated sensors
    #[arg(long, value_enum, default_value_t = Scenario::Resting)]
    scenario: Scenario,
}

fn load_config(cli: &Cli) -> Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MonitorConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.control.bind = bind.clone();
    }
    if cli.no_control {
        config.control.enabled = false;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Webhook settings from variables; a token wins over user/password
fn webhook_config(var: impl Fn(&str) -> Option<String>) -> Option<WebhookConfig> {
    let mut config = WebhookConfig::new(var(WEBHOOK_URL_VAR)?);
    if let Some(token) = var(WEBHOOK_TOKEN_VAR) {
        config = config.bearer_token(token);
    } else if let Some(user) = var(WEBHOOK_USER_VAR) {
        config = config.basic_auth(user, var(WEBHOOK_PASSWORD_VAR).unwrap_or_default());
    }
    Some(config)
}

fn notifier_from_env() -> Result<Arc<dyn Notifier>> {
    let Some(config) = webhook_config(|name| std::env::var(name).ok()) else {
        log::info!("{WEBHOOK_URL_VAR} not set, alerts go to the log");
        return Ok(Arc::new(LogNotifier));
    };

    let notifier = WebhookNotifier::new(config).context("webhook notifier")?;
    log::info!("alerts go to {}", notifier.config().url);
    Ok(Arc::new(notifier))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let notifier = notifier_from_env()?;

    let monitor = Monitor::new(
        config,
        Arc::new(SimulatedSource::new(cli.scenario.vitals())),
        Box::new(LogActuator::default()),
        Box::new(LogDisplay),
        notifier,
    );

    let (trigger, shutdown) = ShutdownTrigger::new();
    let run = monitor.run(shutdown);
    tokio::pin!(run);

    tokio::select! {
        result = &mut run => return result.context("monitor failed"),
        signal = tokio::signal::ctrl_c() => {
            signal.context("waiting for ctrl-c")?;
            log::info!("ctrl-c received");
            trigger.trigger();
        }
    }

    run.await.context("monitor failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use vitalguard_connectors::webhook::AuthMethod;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_url_means_no_webhook() {
        assert!(webhook_config(vars(&[(WEBHOOK_TOKEN_VAR, "t")])).is_none());
    }

    #[test]
    fn user_and_password_select_basic_auth() {
        let config = webhook_config(vars(&[
            (WEBHOOK_URL_VAR, "https://hooks.example.com/vitals"),
            (WEBHOOK_USER_VAR, "ward7"),
            (WEBHOOK_PASSWORD_VAR, "pw"),
        ]))
        .unwrap();
        match config.auth {
            AuthMethod::Basic { username, password } => {
                assert_eq!(username, "ward7");
                assert_eq!(password, "pw");
            }
            other => panic!("expected basic auth, got {other:?}"),
        }
    }

    #[test]
    fn token_wins_over_user() {
        let config = webhook_config(vars(&[
            (WEBHOOK_URL_VAR, "https://hooks.example.com/vitals"),
            (WEBHOOK_TOKEN_VAR, "t0ken"),
            (WEBHOOK_USER_VAR, "ward7"),
        ]))
        .unwrap();
        assert_eq!(config.auth.header_value().as_deref(), Some("Bearer t0ken"));
    }
}
