//! Shared CLI plumbing: global flags, config loading and sign-in

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Args;
use dashboard::Dashboard;
use dialoguer::{Input, Password};
use shared::AppConfig;
use std::path::{Path, PathBuf};

/// Environment variable holding the sign-in password
pub const PASSWORD_ENV: &str = "OPSDESK_PASSWORD";

/// Default config file name
pub const CONFIG_FILE: &str = "opsdesk.yaml";

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Config file (.yaml or .json)
    #[arg(short, long, global = true, env = "OPSDESK_CONFIG", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Data directory, overriding the config file and OPSDESK_DATA_DIR
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Account email to sign in with
    #[arg(short, long, global = true, env = "OPSDESK_EMAIL")]
    pub email: Option<String>,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalArgs {
    /// Config file plus environment and flag overrides
    ///
    /// A relative `data_dir` from the file is taken relative to the file.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load_or_default(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        if self.config.exists() && config.data_dir.is_relative() {
            if let Some(parent) = self.config.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config
            .with_env_overrides()
            .with_data_dir_override(self.data_dir.clone()))
    }

    pub fn open(&self) -> anyhow::Result<Dashboard> {
        let config = self.load_config()?;
        Dashboard::from_config(&config)
            .with_context(|| format!("opening data directory {}", config.data_dir.display()))
    }

    /// Open the dashboard and sign in with `--email` and the password
    /// from `OPSDESK_PASSWORD` or a prompt
    pub fn signed_in(&self) -> anyhow::Result<Dashboard> {
        let mut dashboard = self.open()?;
        let (email, password) = credentials(self.email.as_deref())?;
        let result = dashboard.sign_in(&email, &password);
        crate::render::notifications(&mut dashboard);
        result?;
        Ok(dashboard)
    }
}

/// Email from the flag or a prompt; password from the environment or a prompt
pub fn credentials(email: Option<&str>) -> anyhow::Result<(String, String)> {
    let email = match email {
        Some(email) => email.to_string(),
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => password,
        _ => Password::new().with_prompt("Password").interact()?,
    };
    Ok((email, password))
}

/// Password for a new account, confirmed twice when prompted
pub fn new_password(env_var: &str) -> anyhow::Result<String> {
    match std::env::var(env_var) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => Ok(Password::new()
            .with_prompt("New password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?),
    }
}

/// clap value parser for `YYYY-MM-DD` (or RFC 3339) dates
pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    opsdesk_domain::parse_date(raw).ok_or_else(|| format!("'{}' is not a date (YYYY-MM-DD)", raw))
}

/// The given agent, or the signed-in user's own agent link
pub fn agent_or_self(dashboard: &Dashboard, agent: Option<&str>) -> anyhow::Result<String> {
    if let Some(agent) = agent.map(str::trim).filter(|a| !a.is_empty()) {
        return Ok(agent.to_string());
    }
    match dashboard.current_user().and_then(|p| p.agent_name.clone()) {
        Some(own) => Ok(own),
        None => bail!("--agent is required"),
    }
}

/// Read pasted text from a file, or stdin when no file is given
pub fn read_text(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut text)?;
            Ok(text)
        }
    }
}
