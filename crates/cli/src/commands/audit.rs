//! opsdesk audit command

use crate::context::GlobalArgs;
use crate::render;
use clap::Args;
use rbac::Capability;

#[derive(Debug, Args)]
pub struct AuditCommand {
    /// Number of entries to show
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Only denials and failures
    #[arg(long, conflicts_with = "actor")]
    pub denials: bool,

    /// Only entries by this email
    #[arg(long)]
    pub actor: Option<String>,
}

impl AuditCommand {
    /// Show the audit trail (admin only)
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let dashboard = global.signed_in()?;
        if let Some(profile) = dashboard.current_user() {
            Capability::ManageUsers.check(profile.role)?;
        }

        let log = dashboard.audit_log();
        let entries = match (&self.actor, self.denials) {
            (Some(actor), _) => log.get_recent_by_actor(actor, self.limit),
            (None, true) => log.get_recent_denials(self.limit),
            (None, false) => log.get_recent(self.limit),
        };
        if global.json {
            return render::json(&entries);
        }

        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                let target = match (&e.page, &e.collection, &e.record_id) {
                    (Some(page), _, _) => page.clone(),
                    (None, Some(collection), Some(id)) => format!("{}/{}", collection, id),
                    (None, Some(collection), None) => collection.clone(),
                    _ => "-".to_string(),
                };
                vec![
                    e.timestamp.clone(),
                    e.event_type.to_string(),
                    e.actor.clone(),
                    render::optional(&e.role),
                    target,
                    render::optional(&e.reason),
                ]
            })
            .collect();
        render::table(&["TIME", "EVENT", "ACTOR", "ROLE", "TARGET", "REASON"], &rows);

        let stats = dashboard.audit_stats();
        println!(
            "{} entries, {} denied or failed, {} sign-ins, {} writes",
            stats.total_entries, stats.denial_count, stats.sign_ins, stats.writes
        );
        Ok(())
    }
}
