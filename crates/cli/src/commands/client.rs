//! opsdesk client command

use crate::context::{agent_or_self, parse_day, GlobalArgs};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use opsdesk_domain::{Client, ClientStatus, DocumentId};

#[derive(Debug, Args)]
pub struct ClientCommand {
    #[command(subcommand)]
    pub command: ClientSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientSubcommand {
    /// Register a client shop
    Add {
        shop_id: String,
        name: String,
        /// Responsible agent (defaults to your own)
        #[arg(long)]
        agent: Option<String>,
        /// KYC completion date
        #[arg(long, value_parser = parse_day)]
        kyc: Option<NaiveDate>,
        /// "In Process", "Active" or "Eliminated"
        #[arg(long, default_value = "In Process")]
        status: ClientStatus,
    },
    /// Set a client's status
    Status { id: String, status: ClientStatus },
    /// Record a client's KYC completion date
    Kyc {
        id: String,
        #[arg(value_parser = parse_day)]
        date: NaiveDate,
    },
    /// List clients
    List,
}

impl ClientCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        match &self.command {
            ClientSubcommand::Add {
                shop_id,
                name,
                agent,
                kyc,
                status,
            } => {
                let agent = agent_or_self(&dashboard, agent.as_deref())?;
                let mut client = Client::new(shop_id, name, agent).with_status(*status);
                if let Some(kyc) = kyc {
                    client = client.with_kyc_date(*kyc);
                }
                let result = dashboard.add_client(client);
                let stored = render::outcome(&mut dashboard, result)?;
                println!("id: {}", stored.id);
            }
            ClientSubcommand::Status { id, status } => {
                let result = dashboard.set_client_status(&DocumentId::new(id.as_str()), *status);
                render::outcome(&mut dashboard, result)?;
            }
            ClientSubcommand::Kyc { id, date } => {
                let id = DocumentId::new(id.as_str());
                let listed = dashboard.clients();
                let clients = render::outcome(&mut dashboard, listed)?;
                let Some(current) = clients.into_iter().find(|c| c.id == id) else {
                    anyhow::bail!("no client '{}'", id);
                };
                let result = dashboard.update_client(&id, current.record.with_kyc_date(*date));
                render::outcome(&mut dashboard, result)?;
            }
            ClientSubcommand::List => {
                let result = dashboard.clients();
                let clients = render::outcome(&mut dashboard, result)?;
                if global.json {
                    return render::json(&clients);
                }
                let rows: Vec<Vec<String>> = clients
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.record.shop_id.clone(),
                            c.record.name.clone(),
                            c.record.agent.clone(),
                            render::optional(&c.record.kyc_date),
                            c.record.status.to_string(),
                        ]
                    })
                    .collect();
                render::table(&["ID", "SHOP", "NAME", "AGENT", "KYC", "STATUS"], &rows);
            }
        }
        Ok(())
    }
}
