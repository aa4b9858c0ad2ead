//! opsdesk init command

use crate::context::{new_password, CONFIG_FILE};
use clap::Args;
use dashboard::Dashboard;
use shared::AppConfig;
use std::path::PathBuf;

/// Environment variable holding the first admin's password
pub const ADMIN_PASSWORD_ENV: &str = "OPSDESK_ADMIN_PASSWORD";

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Create the first administrator account with this email
    #[arg(long)]
    pub admin_email: Option<String>,

    /// Display name of the first administrator
    #[arg(long, default_value = "Administrator")]
    pub admin_name: String,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        println!("Initializing OpsDesk in {:?}", self.directory);
        std::fs::create_dir_all(&self.directory)?;

        let config_path = self.directory.join(CONFIG_FILE);
        if config_path.exists() && !self.force {
            println!("{} already exists, keeping it (use --force to overwrite)", config_path.display());
        } else {
            std::fs::write(&config_path, AppConfig::default().to_yaml()?)?;
            println!("✓ Wrote {}", config_path.display());
        }

        let mut config = AppConfig::from_file(&config_path)?;
        if config.data_dir.is_relative() {
            config.data_dir = self.directory.join(&config.data_dir);
        }
        std::fs::create_dir_all(&config.data_dir)?;

        if let Some(email) = &self.admin_email {
            let password = new_password(ADMIN_PASSWORD_ENV)?;
            let mut dashboard = Dashboard::from_config(&config)?;
            let profile = dashboard.bootstrap_admin(email, &password, &self.admin_name)?;
            println!("✓ Administrator {} created", profile.email);
        }

        println!("✓ OpsDesk initialized");
        Ok(())
    }
}
