//! opsdesk daily command

use crate::context::{parse_day, read_text, GlobalArgs};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DailyCommand {
    #[command(subcommand)]
    pub command: DailySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum DailySubcommand {
    /// Add a client from pasted details (Name/Age/Location/Work lines)
    Add {
        /// File with the pasted text; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
        /// Agent who added the client (defaults to your own)
        #[arg(long)]
        agent: Option<String>,
        /// Day the client was added (defaults to today)
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// List daily-added clients
    List,
}

impl DailyCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        match &self.command {
            DailySubcommand::Add { file, agent, date } => {
                // Read before the password prompt so piped text is not mistaken for input
                let text = read_text(file.as_deref())?;
                let mut dashboard = global.signed_in()?;
                let result = dashboard.add_daily_client_from_text(&text, agent.as_deref(), *date);
                let stored = render::outcome(&mut dashboard, result)?;
                println!(
                    "{} ({}), {} from {} on {}",
                    stored.record.name, stored.record.age, stored.record.work, stored.record.location, stored.record.date
                );
            }
            DailySubcommand::List => {
                let mut dashboard = global.signed_in()?;
                let result = dashboard.daily_clients();
                let daily = render::outcome(&mut dashboard, result)?;
                if global.json {
                    return render::json(&daily);
                }
                let rows: Vec<Vec<String>> = daily
                    .iter()
                    .map(|d| {
                        vec![
                            d.record.date.to_string(),
                            d.record.name.clone(),
                            d.record.age.to_string(),
                            d.record.location.clone(),
                            d.record.work.clone(),
                            d.record.agent.clone(),
                        ]
                    })
                    .collect();
                render::table(&["DATE", "NAME", "AGE", "LOCATION", "WORK", "AGENT"], &rows);
            }
        }
        Ok(())
    }
}
