//! CLI Commands

pub mod agent;
pub mod audit;
pub mod client;
pub mod daily;
pub mod init;
pub mod inventory;
pub mod order;
pub mod perf;
pub mod staff;
pub mod txn;
pub mod user;

pub use agent::AgentCommand;
pub use audit::AuditCommand;
pub use client::ClientCommand;
pub use daily::DailyCommand;
pub use init::InitCommand;
pub use inventory::InventoryCommand;
pub use order::OrderCommand;
pub use perf::PerfCommand;
pub use staff::StaffCommand;
pub use txn::TxnCommand;
pub use user::UserCommand;
