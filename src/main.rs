use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use share_dashboard::config::ClientConfig;
use share_dashboard::create_context;
use share_dashboard::models::ShareRecord;
use share_dashboard::services::dashboard::{DashboardAggregator, DashboardView};
use share_dashboard::services::share_actions::ShareActions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show disk usage, recent files and recent shares
    Dashboard,
    /// Print the public link of a share
    CopyLink { share_id: String },
    /// Edit a share's name, expiration, view limit or password
    EditShare {
        share_id: String,
        #[arg(long)]
        name: Option<String>,
        /// Local time, e.g. 2024-05-01T14:30 (empty string keeps the current value)
        #[arg(long)]
        expires_at: Option<String>,
        /// Empty string removes the limit
        #[arg(long)]
        max_views: Option<String>,
        #[arg(long, conflicts_with = "no_password")]
        password: Option<String>,
        /// Remove password protection
        #[arg(long)]
        no_password: bool,
    },
    /// Delete a share
    DeleteShare { share_id: String },
    /// Replace the files attached to a share
    ShareFiles {
        share_id: String,
        file_ids: Vec<String>,
    },
    /// Replace the recipients of a share
    ShareRecipients {
        share_id: String,
        emails: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "share_dashboard=info,notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    info!("🚀 Using backend at {}", config.api_base_url);

    let ctx = create_context(config).context("failed to build API client")?;
    let dashboard = DashboardAggregator::new(&ctx);
    let actions = ShareActions::new(&ctx, Arc::new(dashboard.clone()));

    match args.command {
        Command::Dashboard => {
            dashboard.load().await?;
            dashboard.refresh_smtp_enabled().await;
            print_dashboard(&dashboard.view().await);
        }
        Command::CopyLink { share_id } => {
            let share = find_share(&ctx, &share_id).await?;
            if dashboard.copy_share_link(&share)?.is_none() {
                return Err(anyhow!("share {} has no public alias yet", share_id));
            }
        }
        Command::EditShare {
            share_id,
            name,
            expires_at,
            max_views,
            password,
            no_password,
        } => {
            let share = find_share(&ctx, &share_id).await?;
            let mut form = actions.open_edit(&share);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(expires_at) = expires_at {
                form.expires_at = expires_at;
            }
            if let Some(max_views) = max_views {
                form.max_views = max_views;
            }
            if no_password {
                form.set_password_protected(false);
            } else if let Some(password) = password {
                form.set_password_protected(true);
                form.password = password;
            }
            actions.submit_edit(&form, &share).await?;
        }
        Command::DeleteShare { share_id } => {
            let share = find_share(&ctx, &share_id).await?;
            actions.open_delete(&share);
            actions.submit_delete(&share).await?;
        }
        Command::ShareFiles { share_id, file_ids } => {
            let share = find_share(&ctx, &share_id).await?;
            actions.open_manage_files(&share);
            actions.save_share_files(&share.id, &file_ids).await?;
        }
        Command::ShareRecipients { share_id, emails } => {
            let share = find_share(&ctx, &share_id).await?;
            actions.open_manage_recipients(&share);
            actions.save_share_recipients(&share.id, &emails).await?;
        }
    }

    Ok(())
}

async fn find_share(
    ctx: &share_dashboard::AppContext,
    share_id: &str,
) -> anyhow::Result<ShareRecord> {
    ctx.api
        .list_user_shares()
        .await?
        .into_iter()
        .find(|s| s.id == share_id)
        .ok_or_else(|| anyhow!("share {} not found", share_id))
}

fn print_dashboard(view: &DashboardView) {
    match &view.disk_space {
        Some(disk) => println!(
            "Disk: {:.1} GB used of {:.1} GB ({:.1}%), {:.1} GB free, uploads {}",
            disk.disk_used_gb,
            disk.disk_size_gb,
            disk.usage_percent(),
            disk.disk_available_gb,
            if disk.upload_allowed { "allowed" } else { "blocked" }
        ),
        None => println!("Disk: unknown"),
    }

    println!("\nRecent files:");
    for file in &view.recent_files {
        println!(
            "  {}  {}  {}",
            file.created_at.format("%Y-%m-%d %H:%M"),
            file.id,
            file.name.as_deref().unwrap_or("-")
        );
    }

    println!("\nRecent shares:");
    for share in &view.recent_shares {
        println!(
            "  {}  {}  {}{}",
            share.created_at.format("%Y-%m-%d %H:%M"),
            share.id,
            share.name.as_deref().unwrap_or("-"),
            share
                .alias_token()
                .map(|a| format!("  (/s/{})", a))
                .unwrap_or_default()
        );
    }

    println!(
        "\nEmail notifications: {}",
        if view.smtp_enabled { "enabled" } else { "disabled" }
    );
}
