//! opsdesk txn command

use crate::context::{agent_or_self, parse_day, GlobalArgs};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use opsdesk_domain::{PaymentMode, Stored, Transaction};

#[derive(Debug, Args)]
pub struct TxnCommand {
    #[command(subcommand)]
    pub command: TxnSubcommand,
}

#[derive(Debug, Args)]
pub struct TxnArgs {
    pub shop_id: String,
    pub client_name: String,
    pub amount: f64,
    /// Agent handling the transaction (defaults to your own)
    #[arg(long)]
    pub agent: Option<String>,
    /// Transaction date (defaults to today)
    #[arg(long, value_parser = parse_day)]
    pub date: Option<NaiveDate>,
    /// Cash, "Bank Transfer", "Mobile Money" or Cheque
    #[arg(long, default_value = "Cash")]
    pub mode: PaymentMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TxnKind {
    Deposits,
    Withdrawals,
}

#[derive(Debug, Subcommand)]
pub enum TxnSubcommand {
    /// Record a deposit
    Deposit(TxnArgs),
    /// Record a withdrawal
    Withdraw(TxnArgs),
    /// List deposits or withdrawals
    List {
        #[arg(value_enum, default_value = "deposits")]
        kind: TxnKind,
    },
}

impl TxnCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        match &self.command {
            TxnSubcommand::Deposit(args) => {
                let txn = build(&dashboard, args)?;
                let result = dashboard.record_deposit(txn);
                let stored = render::outcome(&mut dashboard, result)?;
                println!("id: {}", stored.id);
            }
            TxnSubcommand::Withdraw(args) => {
                let txn = build(&dashboard, args)?;
                let result = dashboard.record_withdrawal(txn);
                let stored = render::outcome(&mut dashboard, result)?;
                println!("id: {}", stored.id);
            }
            TxnSubcommand::List { kind } => {
                let listed: Vec<Stored<Transaction>> = match kind {
                    TxnKind::Deposits => {
                        let result = dashboard.deposits();
                        render::outcome(&mut dashboard, result)?
                            .into_iter()
                            .map(|s| Stored::new(s.id, s.record.0))
                            .collect()
                    }
                    TxnKind::Withdrawals => {
                        let result = dashboard.withdrawals();
                        render::outcome(&mut dashboard, result)?
                            .into_iter()
                            .map(|s| Stored::new(s.id, s.record.0))
                            .collect()
                    }
                };
                if global.json {
                    return render::json(&listed);
                }
                let rows: Vec<Vec<String>> = listed
                    .iter()
                    .map(|t| {
                        vec![
                            t.record.date.to_string(),
                            t.record.shop_id.clone(),
                            t.record.client_name.clone(),
                            t.record.agent.clone(),
                            render::money(t.record.amount),
                            t.record.payment_mode.to_string(),
                        ]
                    })
                    .collect();
                render::table(&["DATE", "SHOP", "CLIENT", "AGENT", "AMOUNT", "MODE"], &rows);
            }
        }
        Ok(())
    }
}

fn build(dashboard: &dashboard::Dashboard, args: &TxnArgs) -> anyhow::Result<Transaction> {
    Ok(Transaction {
        shop_id: args.shop_id.clone(),
        client_name: args.client_name.clone(),
        agent: agent_or_self(dashboard, args.agent.as_deref())?,
        date: args.date.unwrap_or_else(|| dashboard.today()),
        amount: args.amount,
        payment_mode: args.mode,
    })
}
