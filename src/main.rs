use std::fs;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use driveboard::auth::{SessionKeys, hash_password};
use driveboard::config::ServerConfig;
use driveboard::server::{AppState, create_router};
use driveboard::store::{SqliteStore, Store};
use driveboard::types::Admin;

#[derive(Parser)]
#[command(name = "driveboard")]
#[command(about = "A placement-drive tracker server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "5001", env = "PORT")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Secret used to sign session tokens
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        jwt_secret: String,

        /// Comma-separated origins allowed to make credentialed requests
        #[arg(
            long,
            env = "FRONTEND_URL",
            value_delimiter = ',',
            default_value = "http://localhost:5173"
        )]
        allowed_origins: Vec<String>,

        /// Harden session cookies for a TLS, cross-site deployment
        #[arg(long, env = "PRODUCTION")]
        production: bool,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create an admin account (admins are never created via the API)
    Create {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Unique login email
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Contact phone
        #[arg(long)]
        phone: Option<String>,

        /// Password; prompted interactively when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the most recent audit entries
    Audit {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

fn open_store(data_dir: &str) -> anyhow::Result<SqliteStore> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let store = SqliteStore::new(data_path.join("driveboard.db"))?;
    store.initialize()?;
    Ok(store)
}

fn run_admin_create(
    data_dir: String,
    email: String,
    name: String,
    phone: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let store = open_store(&data_dir)?;

    if store.get_admin_by_email(&email)?.is_some() {
        bail!("An admin with email '{email}' already exists");
    }

    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        bail!("Password cannot be empty");
    }

    let admin = Admin {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        password_hash: hash_password(&password)?,
        phone,
        is_active: true,
        created_at: Utc::now(),
    };

    store.create_admin(&admin)?;

    println!("Created admin '{}' ({})", admin.name, admin.email);
    Ok(())
}

fn run_admin_audit(data_dir: String, limit: i64) -> anyhow::Result<()> {
    let store = open_store(&data_dir)?;
    let entries = store.list_audit(limit)?;

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in entries {
        let actor = store
            .get_admin(&entry.admin_id)?
            .map_or_else(|| entry.admin_id.clone(), |a| a.email);
        println!(
            "{}  {:<6}  {}/{}  by {}",
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.action.as_str(),
            entry.table_name,
            entry.record_id,
            actor
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("driveboard=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Create {
                data_dir,
                email,
                name,
                phone,
                password,
            } => {
                run_admin_create(data_dir, email, name, phone, password)?;
            }
            AdminCommands::Audit { data_dir, limit } => {
                run_admin_audit(data_dir, limit)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            jwt_secret,
            allowed_origins,
            production,
        } => {
            if jwt_secret.is_empty() {
                bail!("JWT secret cannot be empty");
            }

            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                jwt_secret,
                allowed_origins,
                production,
            };

            fs::create_dir_all(&config.data_dir)?;
            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;

            if !store.has_admin()? {
                warn!("No admin account found. Run 'driveboard admin create' to add one.");
            }

            let state = Arc::new(AppState {
                store: Arc::new(store),
                sessions: SessionKeys::new(&config.jwt_secret),
                secure_cookies: config.production,
            });

            let app = create_router(state, &config.allowed_origins);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
