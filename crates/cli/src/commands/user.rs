//! opsdesk user command

use crate::context::{new_password, GlobalArgs};
use crate::render;
use clap::{Args, Subcommand};
use opsdesk_domain::UserRole;

/// Environment variable holding a new user's password
pub const NEW_PASSWORD_ENV: &str = "OPSDESK_NEW_PASSWORD";

#[derive(Debug, Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum UserSubcommand {
    /// Create a sign-in account and its profile (admin only)
    Add {
        /// Email of the new user
        user_email: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// admin, manager or agent
        #[arg(long, default_value = "agent")]
        role: UserRole,
        /// Agent record the user acts as (required for agents)
        #[arg(long)]
        agent: Option<String>,
    },
    /// List user profiles
    List,
}

impl UserCommand {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let mut dashboard = global.signed_in()?;
        match &self.command {
            UserSubcommand::Add {
                user_email,
                name,
                role,
                agent,
            } => {
                let password = new_password(NEW_PASSWORD_ENV)?;
                let result = dashboard.register_user(user_email, &password, name, *role, agent.as_deref());
                let user = render::outcome(&mut dashboard, result)?;
                println!("uid: {}", user.id);
            }
            UserSubcommand::List => {
                let result = dashboard.users();
                let users = render::outcome(&mut dashboard, result)?;
                if global.json {
                    return render::json(&users);
                }
                let rows: Vec<Vec<String>> = users
                    .iter()
                    .map(|u| {
                        vec![
                            u.record.email.clone(),
                            u.record.display_name.clone(),
                            u.record.role.to_string(),
                            render::optional(&u.record.agent_name),
                        ]
                    })
                    .collect();
                render::table(&["EMAIL", "NAME", "ROLE", "AGENT"], &rows);
            }
        }
        Ok(())
    }
}
