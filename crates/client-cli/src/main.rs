use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schoolbook::auth::{self, LoginOutcome};
use schoolbook::config::Config;
use schoolbook::forms::SignUpForm;
use schoolbook::storage::FileStorage;
use schoolbook::{ApiClient, SchoolContext, SessionStore};
use shared::{RegisterRequest, Role};

mod pages;

#[derive(Parser)]
#[command(name = "schoolbook")]
#[command(about = "Terminal client for the school management backend")]
#[command(version)]
struct Cli {
    /// Backend URL (overrides SCHOOLBOOK_API_URL and config)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Log in with username and password
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account for an existing record using its registration code
    Register {
        username: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Create a user account directly (director only)
    CreateUser {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Forget the stored session
    Logout,
    /// Show current login status
    Whoami,
    #[command(flatten)]
    Page(pages::Page),
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (server, storage)
        key: String,
        value: String,
    },
    Get {
        key: String,
    },
    /// Show all configuration
    Show,
    /// Get the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schoolbook=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_default();
    let server = config.api_url(cli.server.as_deref());
    let storage = Arc::new(FileStorage::open(config.session_path()?)?);
    let sessions = Arc::new(SessionStore::new(storage));
    sessions.restore(chrono::Utc::now());

    tracing::debug!("Using backend {}", server);
    let ctx = SchoolContext::new(ApiClient::new(&server, sessions.clone()));

    match cli.command {
        Commands::Config { action } => handle_config_command(action)?,
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            print_outcome(auth::login(&ctx, &username, &password).await)?;
        }
        Commands::Register { username, code, password, confirm_password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let confirm_password = match confirm_password {
                Some(p) => p,
                None => prompt("Confirm password: ")?,
            };
            let form = SignUpForm {
                username,
                password,
                confirm_password,
                registration_code: code,
            };
            print_outcome(auth::register_with_code(&ctx, &form).await)?;
        }
        Commands::CreateUser { username, password, role } => {
            match sessions.current() {
                Some(session) if session.role == Role::Admin => {}
                _ => bail!("Only the director can create accounts"),
            }
            let request = RegisterRequest { username, password, role };
            ctx.api().auth().register(&request).await?;
            println!("\x1b[32m✓ Account {} created\x1b[0m", request.username);
        }
        Commands::Logout => {
            ctx.logout().await;
            println!("\x1b[32m✅ Logged out successfully\x1b[0m");
        }
        Commands::Whoami => match sessions.current() {
            Some(session) => {
                println!("\x1b[32m✓ Logged in\x1b[0m as {} {}", session.avatar, session.display_name);
                println!("Username: {}", session.username);
                println!("Role: {}", session.role);
                println!("Server: {}", server);
            }
            None => not_logged_in(),
        },
        Commands::Page(page) => {
            let Some(session) = sessions.current() else {
                not_logged_in();
                return Ok(());
            };
            ctx.refresh().await;
            // A 401 during the load logs the user out
            if !sessions.is_authenticated() {
                not_logged_in();
                return Ok(());
            }
            pages::run(&ctx, &session, page).await?;
        }
    }

    Ok(())
}

fn not_logged_in() {
    eprintln!("\x1b[33m🔐 Not logged in.\x1b[0m");
    eprintln!("   Run '\x1b[1mschoolbook login <username>\x1b[0m' to authenticate.");
}

fn print_outcome(outcome: LoginOutcome) -> Result<()> {
    match outcome {
        LoginOutcome::Success { session } => {
            println!("\x1b[1;32m✅ Welcome, {} {}\x1b[0m", session.avatar, session.display_name);
            Ok(())
        }
        LoginOutcome::Failure { message } => bail!("✗ {}", message),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().unwrap_or_default();
            config.set(&key, value)?;
            config.save()?;
            println!("Configuration saved");
        }
        ConfigAction::Get { key } => {
            println!("{}", Config::load()?.get(&key)?);
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("server: {}", config.api_url(None));
            println!("storage: {}", config.session_path()?.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}
