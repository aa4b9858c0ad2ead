//! opsdesk agent command

use crate::context::{parse_day, GlobalArgs};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use opsdesk_domain::Agent;

#[derive(Debug, Args)]
pub struct AgentCommand {
    #[command(subcommand)]
    pub command: AgentSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentSubcommand {
    /// Add an agent to the roster
    Add {
        name: String,
        agent_email: String,
        /// Hire date (defaults to today)
        #[arg(long, value_parser = parse_day)]
        hired: Option<NaiveDate>,
        /// Employment type, e.g. "Full Time"
        #[arg(long = "type")]
        agent_type: Option<String>,
        /// Job role, e.g. "Field Agent"
        #[arg(long)]
        role: Option<String>,
    },
    /// List agents
    List,
}

impl AgentCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        match &self.command {
            AgentSubcommand::Add {
                name,
                agent_email,
                hired,
                agent_type,
                role,
            } => {
                let mut agent = Agent::new(name, agent_email, hired.unwrap_or_else(|| dashboard.today()));
                if let Some(agent_type) = agent_type {
                    agent = agent.with_type(agent_type);
                }
                if let Some(role) = role {
                    agent = agent.with_role(role);
                }
                let result = dashboard.add_agent(agent);
                let stored = render::outcome(&mut dashboard, result)?;
                println!("id: {}", stored.id);
            }
            AgentSubcommand::List => {
                let result = dashboard.agents();
                let agents = render::outcome(&mut dashboard, result)?;
                if global.json {
                    return render::json(&agents);
                }
                let rows: Vec<Vec<String>> = agents
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.record.name.clone(),
                            a.record.email.clone(),
                            a.record.hire_date.to_string(),
                            a.record.agent_type.clone(),
                            a.record.role.clone(),
                        ]
                    })
                    .collect();
                render::table(&["ID", "NAME", "EMAIL", "HIRED", "TYPE", "ROLE"], &rows);
            }
        }
        Ok(())
    }
}
