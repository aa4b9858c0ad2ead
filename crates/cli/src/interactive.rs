//! Interactive REPL mode over a signed-in dashboard

use crate::render;
use console::style;
use dashboard::Dashboard;
use opsdesk_domain::DocumentId;
use rbac::Page;
use std::io::{self, Write};

/// Interactive CLI bound to one signed-in session
pub struct InteractiveCli {
    dashboard: Dashboard,
    /// Lines of a `/daily` paste collected so far
    pending_daily: Option<String>,
}

impl InteractiveCli {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            pending_daily: None,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Run the interactive REPL
    pub fn run(&mut self) -> anyhow::Result<()> {
        println!("OpsDesk Interactive Mode");
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            print!("{}", self.prompt());
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }

            match self.handle_input(input.trim_end_matches(['\r', '\n'])) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => println!("{} {}", style("Error:").red(), e),
            }
            render::notifications(&mut self.dashboard);
        }

        Ok(())
    }

    fn prompt(&self) -> String {
        if self.pending_daily.is_some() {
            return "... ".to_string();
        }
        match self.dashboard.current_user() {
            Some(profile) => format!("[{} {}] > ", profile.role, profile.email),
            None => "[signed out] > ".to_string(),
        }
    }

    /// One line of input; returns true when the session should end
    pub fn handle_input(&mut self, input: &str) -> anyhow::Result<bool> {
        if let Some(buffer) = self.pending_daily.as_mut() {
            if !input.trim().is_empty() {
                buffer.push_str(input);
                buffer.push('\n');
                return Ok(false);
            }
            let text = self.pending_daily.take().unwrap_or_default();
            let stored = self.dashboard.add_daily_client_from_text(&text, None, None)?;
            println!("Added {} ({})", stored.record.name, stored.record.agent);
            return Ok(false);
        }

        let input = input.trim();
        if input.is_empty() {
            return Ok(false);
        }
        if input.starts_with('/') {
            return self.handle_command(input);
        }
        println!("Type /help for commands");
        Ok(false)
    }

    fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let arg = parts.get(1).copied();

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                return Ok(true);
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /whoami          - Show the signed-in user");
                println!("  /pages           - Pages you can open");
                println!("  /open <page>     - Open a page and show its counts");
                println!("  /clients         - List clients");
                println!("  /orders          - List orders");
                println!("  /approve <id>    - Approve a pending order");
                println!("  /reject <id>     - Reject a pending order");
                println!("  /daily           - Paste client details, end with an empty line");
                println!("  /perf [agent]    - Performance for one agent");
                println!("  /team            - Performance for every agent");
                println!("  /logout          - Sign out and exit");
                println!("  /quit            - Exit");
            }
            "/whoami" => match self.dashboard.current_user() {
                Some(profile) => {
                    println!("{} <{}>", profile.display_name, profile.email);
                    println!("  Role:  {}", profile.role.display_name());
                    println!("  Agent: {}", render::optional(&profile.agent_name));
                }
                None => println!("Not signed in"),
            },
            "/pages" => {
                for page in self.dashboard.visible_pages() {
                    println!("  {:<18} {}", page.as_str(), page.title());
                }
            }
            "/open" => {
                let Some(name) = arg else {
                    anyhow::bail!("usage: /open <page>");
                };
                let page: Page = name.parse()?;
                let summary = self.dashboard.open_page(page)?;
                println!("{}", style(summary.title).bold());
                for (collection, count) in summary.counts {
                    println!("  {:<20} {}", collection.as_str(), count);
                }
            }
            "/clients" => {
                let clients = self.dashboard.clients()?;
                let rows: Vec<Vec<String>> = clients
                    .iter()
                    .map(|c| {
                        vec![
                            c.record.shop_id.clone(),
                            c.record.name.clone(),
                            c.record.agent.clone(),
                            c.record.status.to_string(),
                        ]
                    })
                    .collect();
                render::table(&["SHOP", "NAME", "AGENT", "STATUS"], &rows);
            }
            "/orders" => {
                let orders = self.dashboard.orders()?;
                let rows: Vec<Vec<String>> = orders
                    .iter()
                    .map(|o| {
                        vec![
                            o.id.to_string(),
                            o.record.shop_id.clone(),
                            o.record.agent.clone(),
                            render::money(o.record.price),
                            o.record.status.to_string(),
                        ]
                    })
                    .collect();
                render::table(&["ID", "SHOP", "AGENT", "PRICE", "STATUS"], &rows);
            }
            "/approve" | "/reject" => {
                let Some(id) = arg else {
                    anyhow::bail!("usage: {} <order id>", cmd);
                };
                let id = DocumentId::new(id);
                if cmd == "/approve" {
                    self.dashboard.approve_order(&id)?;
                } else {
                    self.dashboard.reject_order(&id)?;
                }
            }
            "/daily" => {
                println!("Paste the client details, end with an empty line");
                self.pending_daily = Some(String::new());
            }
            "/perf" => {
                let summary = self.dashboard.agent_performance(arg)?;
                println!(
                    "today {} | month {} | kyc {} | deposits {}",
                    summary.daily_added_today,
                    summary.daily_added_month,
                    summary.kyc_completed_month,
                    render::money(summary.deposits_month)
                );
            }
            "/team" => {
                let rows: Vec<Vec<String>> = self
                    .dashboard
                    .team_overview()?
                    .into_iter()
                    .map(|row| {
                        vec![
                            row.agent,
                            row.summary.daily_added_today.to_string(),
                            row.summary.daily_added_month.to_string(),
                            row.summary.kyc_completed_month.to_string(),
                            render::money(row.summary.deposits_month),
                        ]
                    })
                    .collect();
                render::table(&["AGENT", "TODAY", "MONTH", "KYC", "DEPOSITS"], &rows);
            }
            "/logout" => {
                self.dashboard.sign_out()?;
                return Ok(true);
            }
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(false)
    }
}
