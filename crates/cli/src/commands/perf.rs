//! opsdesk perf command - per-agent performance

use crate::context::{agent_or_self, GlobalArgs};
use crate::render;
use chrono::Local;
use clap::Args;
use console::style;
use dashboard::{Dashboard, ProviderView};
use opsdesk_domain::PerformanceSummary;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

#[derive(Debug, Args)]
pub struct PerfCommand {
    /// Agent to report on (agents always see their own figures)
    #[arg(long)]
    pub agent: Option<String>,

    /// Show every agent instead of one
    #[arg(long, conflicts_with = "watch")]
    pub team: bool,

    /// Save the figures as team performance snapshots (manager or admin)
    #[arg(long, conflicts_with = "watch")]
    pub publish: bool,

    /// Keep the figures on screen and update them as records change
    #[arg(long)]
    pub watch: bool,

    /// Seconds between data directory checks in --watch mode
    #[arg(long, default_value_t = 2)]
    pub interval: u64,
}

impl PerfCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        if self.watch {
            return self.watch(dashboard);
        }

        if self.team {
            let result = dashboard.team_overview();
            let rows = render::outcome(&mut dashboard, result)?;
            if self.publish {
                for row in &rows {
                    let result = dashboard.publish_team_performance(&row.agent);
                    render::outcome(&mut dashboard, result)?;
                }
            }
            if global.json {
                return render::json(&rows);
            }
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    let mut cells = vec![row.agent.clone()];
                    cells.extend(summary_cells(&row.summary));
                    cells
                })
                .collect();
            render::table(&["AGENT", "TODAY", "MONTH", "KYC", "DEPOSITS"], &table);
            return Ok(());
        }

        let result = dashboard.agent_performance(self.agent.as_deref());
        let summary = render::outcome(&mut dashboard, result)?;
        if self.publish {
            let agent = agent_or_self(&dashboard, self.agent.as_deref())?;
            let result = dashboard.publish_team_performance(&agent);
            render::outcome(&mut dashboard, result)?;
        }
        if global.json {
            return render::json(&summary);
        }
        print_summary(self.agent.as_deref(), &summary);
        Ok(())
    }

    fn watch(&self, mut dashboard: Dashboard) -> anyhow::Result<()> {
        let result = dashboard.data_provider();
        let mut provider = render::outcome(&mut dashboard, result)?;
        let supervisor = dashboard.current_user().is_some_and(|p| p.role.is_supervisor());
        if supervisor && self.agent.is_some() {
            provider.select_agent(self.agent.clone());
        }

        let store = dashboard.store().clone();
        let (date_tx, date_rx) = watch::channel(dashboard.today());
        provider.follow_dates(date_rx);
        let interval = Duration::from_secs(self.interval.max(1));
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async move {
            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let poller = tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                let ctrl_c = tokio::signal::ctrl_c();
                tokio::pin!(ctrl_c);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            if let Err(err) = store.refresh() {
                                warn!(error = %err, "Refresh failed");
                            }
                            let today = Local::now().date_naive();
                            date_tx.send_if_modified(|current| {
                                let rolled = *current != today;
                                *current = today;
                                rolled
                            });
                        }
                        _ = &mut ctrl_c => break,
                    }
                }
                let _ = shutdown_tx.send(true);
            });

            println!("{}", style("Watching performance, Ctrl-C to stop").dim());
            provider.run(shutdown_rx, print_view).await;
            poller.await?;
            Ok::<_, anyhow::Error>(())
        })
    }
}

fn summary_cells(summary: &PerformanceSummary) -> Vec<String> {
    vec![
        summary.daily_added_today.to_string(),
        summary.daily_added_month.to_string(),
        summary.kyc_completed_month.to_string(),
        render::money(summary.deposits_month),
    ]
}

fn print_summary(agent: Option<&str>, summary: &PerformanceSummary) {
    if let Some(agent) = agent {
        println!("{}", style(agent).bold());
    }
    println!("  Clients added today      {}", summary.daily_added_today);
    println!("  Clients added this month {}", summary.daily_added_month);
    println!("  KYC completed this month {}", summary.kyc_completed_month);
    println!("  Deposits this month      {}", render::money(summary.deposits_month));
}

fn print_view(view: &ProviderView) {
    match &view.selected_agent {
        Some(agent) => {
            let cells = summary_cells(&view.summary);
            println!(
                "{} today {} | month {} | kyc {} | deposits {}",
                style(agent).bold(),
                cells[0],
                cells[1],
                cells[2],
                cells[3]
            );
        }
        None => println!(
            "{} agents, {} clients, {} deposits, {} orders",
            view.agents.len(),
            view.clients.len(),
            view.deposits.len(),
            view.orders.len()
        ),
    }
}
