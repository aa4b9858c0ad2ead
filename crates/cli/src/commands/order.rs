//! opsdesk order command

use crate::context::{agent_or_self, GlobalArgs};
use crate::render;
use clap::{Args, Subcommand};
use opsdesk_domain::{DocumentId, Order};

#[derive(Debug, Args)]
pub struct OrderCommand {
    #[command(subcommand)]
    pub command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum OrderSubcommand {
    /// Place an order (starts as Pending)
    Place {
        shop_id: String,
        location: String,
        price: f64,
        /// Ordering agent (defaults to your own)
        #[arg(long)]
        agent: Option<String>,
        #[arg(long, default_value = "")]
        remarks: String,
    },
    /// Approve a pending order (manager or admin)
    Approve { id: String },
    /// Reject a pending order (manager or admin)
    Reject { id: String },
    /// List orders
    List,
}

impl OrderCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        match &self.command {
            OrderSubcommand::Place {
                shop_id,
                location,
                price,
                agent,
                remarks,
            } => {
                let agent = agent_or_self(&dashboard, agent.as_deref())?;
                let order = Order::new(agent, shop_id, location, *price).with_remarks(remarks);
                let result = dashboard.place_order(order);
                let stored = render::outcome(&mut dashboard, result)?;
                println!("id: {}", stored.id);
            }
            OrderSubcommand::Approve { id } => {
                let result = dashboard.approve_order(&DocumentId::new(id.as_str()));
                render::outcome(&mut dashboard, result)?;
            }
            OrderSubcommand::Reject { id } => {
                let result = dashboard.reject_order(&DocumentId::new(id.as_str()));
                render::outcome(&mut dashboard, result)?;
            }
            OrderSubcommand::List => {
                let result = dashboard.orders();
                let orders = render::outcome(&mut dashboard, result)?;
                if global.json {
                    return render::json(&orders);
                }
                let rows: Vec<Vec<String>> = orders
                    .iter()
                    .map(|o| {
                        vec![
                            o.id.to_string(),
                            o.record.shop_id.clone(),
                            o.record.location.clone(),
                            o.record.agent.clone(),
                            render::money(o.record.price),
                            o.record.status.to_string(),
                            o.record.remarks.clone(),
                        ]
                    })
                    .collect();
                render::table(&["ID", "SHOP", "LOCATION", "AGENT", "PRICE", "STATUS", "REMARKS"], &rows);
            }
        }
        Ok(())
    }
}
