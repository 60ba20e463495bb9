use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::api::ApiClient;
use crate::cli::utils::{output_success, output_value, read_line_stdin};
use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::models::{LoginCredentials, RegisterData, Role};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Doctor,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Doctor => Role::Doctor,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Create an account and sign in")]
    Register {
        #[arg(help = "Email")]
        email: String,
        #[arg(help = "Display name")]
        name: String,
        #[arg(long, value_enum, default_value = "doctor", help = "Account role")]
        role: RoleArg,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current user information")]
    Whoami,

    #[command(about = "Exchange the stored token for a fresh one")]
    Refresh,
}

pub async fn handle(cmd: AuthCommands, ctx: &AppContext, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let password = password_or_stdin(password)?;
            let user = ctx.session.login(&LoginCredentials::new(email, password)).await?;

            output_success(
                output_format,
                &format!("Signed in as {} ({})", user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Register {
            email,
            name,
            role,
            password,
        } => {
            let data = RegisterData {
                email,
                password: password_or_stdin(password)?,
                name,
                role: role.into(),
            };
            let user = ctx.session.register(&data).await?;

            output_success(
                output_format,
                &format!("Registered {} as {}", user.email, user.role),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            ctx.session.logout().await;
            output_success(output_format, "Signed out", None)
        }
        AuthCommands::Status => {
            let snapshot = ctx.session.snapshot();
            let status = json!({
                "authenticated": snapshot.is_authenticated,
                "persistent": ctx.tokens.is_persistent(),
                "api_url": ctx.api.http().base_url(),
            });

            output_value(output_format, "status", &status, |_| {
                if snapshot.is_authenticated {
                    format!("Authenticated against {}", ctx.api.http().base_url())
                } else {
                    "Not authenticated".to_string()
                }
            })
        }
        AuthCommands::Whoami => {
            let view = ctx.session.user_view();
            let user = view
                .user
                .ok_or_else(|| anyhow::anyhow!("Not authenticated, run 'psych auth login' first"))?;

            output_value(output_format, "user", &user, |u| {
                let name = if u.name.is_empty() { u.email.as_str() } else { u.name.as_str() };
                format!("{} <{}> role={}", name, u.email, u.role)
            })
        }
        AuthCommands::Refresh => refresh(&ctx.api, output_format).await,
    }
}

async fn refresh(api: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    if !api.is_authenticated() {
        return Err(anyhow::anyhow!("Not authenticated, nothing to refresh"));
    }

    api.refresh_token().await?.into_result("Token refresh failed")?;
    output_success(output_format, "Token refreshed", None)
}

fn password_or_stdin(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => read_line_stdin(),
    }
}
