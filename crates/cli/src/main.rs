//! OpsDesk CLI - Command-line interface for the operations dashboard
//!
//! Usage:
//!   opsdesk                              - Start interactive mode
//!   opsdesk init [dir] --admin-email ..  - Initialize a data directory
//!   opsdesk client add <shop> <name>     - Register a client
//!   opsdesk daily add --file paste.txt   - Add a client from pasted details
//!   opsdesk order approve <id>           - Approve a pending order
//!   opsdesk perf --team                  - Per-agent performance
//!   opsdesk audit --denials              - Audit trail (admin)

use clap::{Parser, Subcommand};
use cli::commands::{
    AgentCommand, AuditCommand, ClientCommand, DailyCommand, InitCommand, InventoryCommand,
    OrderCommand, PerfCommand, StaffCommand, TxnCommand, UserCommand,
};
use cli::context::GlobalArgs;
use cli::interactive::InteractiveCli;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opsdesk")]
#[command(about = "OpsDesk - Business operations dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new OpsDesk data directory
    Init(InitCommand),
    /// Manage agents
    Agent(AgentCommand),
    /// Manage clients
    Client(ClientCommand),
    /// Daily-added clients
    Daily(DailyCommand),
    /// Deposits and withdrawals
    Txn(TxnCommand),
    /// Orders
    Order(OrderCommand),
    /// Inventory
    Inventory(InventoryCommand),
    /// Absences, penalties and rewards
    Staff(StaffCommand),
    /// Agent performance
    Perf(PerfCommand),
    /// User accounts
    User(UserCommand),
    /// Audit trail
    Audit(AuditCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the config file's level
    let log_level = cli
        .global
        .load_config()
        .map(|c| c.log_level)
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let global = &cli.global;
    match cli.command {
        Some(Commands::Init(cmd)) => cmd.run(),
        Some(Commands::Agent(cmd)) => cmd.run(global),
        Some(Commands::Client(cmd)) => cmd.run(global),
        Some(Commands::Daily(cmd)) => cmd.run(global),
        Some(Commands::Txn(cmd)) => cmd.run(global),
        Some(Commands::Order(cmd)) => cmd.run(global),
        Some(Commands::Inventory(cmd)) => cmd.run(global),
        Some(Commands::Staff(cmd)) => cmd.run(global),
        Some(Commands::Perf(cmd)) => cmd.run(global),
        Some(Commands::User(cmd)) => cmd.run(global),
        Some(Commands::Audit(cmd)) => cmd.run(global),
        None => {
            // No subcommand - start interactive mode
            let dashboard = global.signed_in()?;
            let mut interactive = InteractiveCli::new(dashboard);
            interactive.run()
        }
    }
}
