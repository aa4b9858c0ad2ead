//! opsdesk inventory command

use crate::context::{parse_day, GlobalArgs};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use opsdesk_domain::{DocumentId, InventoryItem};

#[derive(Debug, Args)]
pub struct InventoryCommand {
    #[command(subcommand)]
    pub command: InventorySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum InventorySubcommand {
    /// Add a stock line
    Add {
        item: String,
        quantity: u32,
        unit_price: f64,
        /// Agent holding the stock
        #[arg(long)]
        agent: Option<String>,
        /// Stock date (defaults to today)
        #[arg(long, value_parser = parse_day)]
        date: Option<NaiveDate>,
    },
    /// Change the quantity of a stock line
    SetQuantity { id: String, quantity: u32 },
    /// List stock
    List,
}

impl InventoryCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        match &self.command {
            InventorySubcommand::Add {
                item,
                quantity,
                unit_price,
                agent,
                date,
            } => {
                let line = InventoryItem {
                    item: item.clone(),
                    quantity: *quantity,
                    unit_price: *unit_price,
                    agent: agent.clone(),
                    date: date.unwrap_or_else(|| dashboard.today()),
                };
                let result = dashboard.add_inventory_item(line);
                let stored = render::outcome(&mut dashboard, result)?;
                println!("id: {}", stored.id);
            }
            InventorySubcommand::SetQuantity { id, quantity } => {
                let id = DocumentId::new(id.as_str());
                let listed = dashboard.inventory();
                let items = render::outcome(&mut dashboard, listed)?;
                let Some(mut line) = items.into_iter().find(|i| i.id == id).map(|i| i.record) else {
                    anyhow::bail!("no inventory item '{}'", id);
                };
                line.quantity = *quantity;
                let result = dashboard.update_inventory_item(&id, line);
                render::outcome(&mut dashboard, result)?;
            }
            InventorySubcommand::List => {
                let result = dashboard.inventory();
                let items = render::outcome(&mut dashboard, result)?;
                if global.json {
                    return render::json(&items);
                }
                let rows: Vec<Vec<String>> = items
                    .iter()
                    .map(|i| {
                        vec![
                            i.record.date.to_string(),
                            i.record.item.clone(),
                            i.record.quantity.to_string(),
                            render::money(i.record.unit_price),
                            render::money(i.record.stock_value()),
                            render::optional(&i.record.agent),
                        ]
                    })
                    .collect();
                render::table(&["DATE", "ITEM", "QTY", "UNIT", "VALUE", "AGENT"], &rows);
            }
        }
        Ok(())
    }
}
