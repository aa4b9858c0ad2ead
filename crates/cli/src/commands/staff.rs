//! opsdesk staff command - absences, penalties and rewards

use crate::context::{parse_day, GlobalArgs};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use opsdesk_domain::{Absence, Penalty, Reward};

#[derive(Debug, Args)]
pub struct StaffCommand {
    #[command(subcommand)]
    pub command: StaffSubcommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StaffRecordKind {
    Absences,
    Penalties,
    Rewards,
}

#[derive(Debug, Subcommand)]
pub enum StaffSubcommand {
    /// Record an absence
    Absence {
        agent: String,
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Record a penalty
    Penalty {
        agent: String,
        amount: f64,
        reason: String,
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// Record a reward
    Reward {
        agent: String,
        amount: f64,
        reason: String,
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// List staff records
    List {
        #[arg(value_enum)]
        kind: StaffRecordKind,
    },
}

impl StaffCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        let today = dashboard.today();
        match &self.command {
            StaffSubcommand::Absence { agent, date, reason } => {
                let result = dashboard.record_absence(Absence {
                    agent: agent.clone(),
                    date: date.unwrap_or(today),
                    reason: reason.clone(),
                });
                render::outcome(&mut dashboard, result)?;
            }
            StaffSubcommand::Penalty {
                agent,
                amount,
                reason,
                date,
            } => {
                let result = dashboard.record_penalty(Penalty {
                    agent: agent.clone(),
                    date: date.unwrap_or(today),
                    amount: *amount,
                    reason: reason.clone(),
                });
                render::outcome(&mut dashboard, result)?;
            }
            StaffSubcommand::Reward {
                agent,
                amount,
                reason,
                date,
            } => {
                let result = dashboard.record_reward(Reward {
                    agent: agent.clone(),
                    date: date.unwrap_or(today),
                    amount: *amount,
                    reason: reason.clone(),
                });
                render::outcome(&mut dashboard, result)?;
            }
            StaffSubcommand::List { kind } => {
                let rows: Vec<Vec<String>> = match kind {
                    StaffRecordKind::Absences => {
                        let result = dashboard.absences();
                        let records = render::outcome(&mut dashboard, result)?;
                        if global.json {
                            return render::json(&records);
                        }
                        records
                            .iter()
                            .map(|r| vec![r.record.date.to_string(), r.record.agent.clone(), "-".to_string(), r.record.reason.clone()])
                            .collect()
                    }
                    StaffRecordKind::Penalties => {
                        let result = dashboard.penalties();
                        let records = render::outcome(&mut dashboard, result)?;
                        if global.json {
                            return render::json(&records);
                        }
                        records
                            .iter()
                            .map(|r| vec![r.record.date.to_string(), r.record.agent.clone(), render::money(r.record.amount), r.record.reason.clone()])
                            .collect()
                    }
                    StaffRecordKind::Rewards => {
                        let result = dashboard.rewards();
                        let records = render::outcome(&mut dashboard, result)?;
                        if global.json {
                            return render::json(&records);
                        }
                        records
                            .iter()
                            .map(|r| vec![r.record.date.to_string(), r.record.agent.clone(), render::money(r.record.amount), r.record.reason.clone()])
                            .collect()
                    }
                };
                render::table(&["DATE", "AGENT", "AMOUNT", "REASON"], &rows);
            }
        }
        Ok(())
    }
}
