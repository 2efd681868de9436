use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs};
use tokio::sync::mpsc;

use users_console::contract::model::Credentials;
use users_console::domain::ports::{Notification, Route};
use users_console::domain::session_guard::GuardDecision;
use users_console::domain::state::Outcome;
use users_console::infra::navigation::{ChannelNavigator, LoggingNavigator};
use users_console::infra::notify::{ChannelNotifier, TracingNotifier};
use users_console::UsersConsole;

mod console;

/// userdesk - admin console for a remote user directory
#[derive(Parser)]
#[command(name = "userdesk")]
#[command(about = "userdesk - admin console for a remote user directory")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory service root, e.g. https://reqres.in/api (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Print one page of users
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Case-insensitive filter over name and email
        #[arg(long)]
        search: Option<String>,
    },
    /// Interactive user list (default)
    Console,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        base_url: cli.base_url.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::info!("userdesk starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Check => check_config(&config),
        Commands::Login { email, password } => {
            let users = UsersConsole::from_app_config(&config)?;
            login(&users, Credentials::new(email, password)).await
        }
        Commands::Logout => {
            let users = UsersConsole::from_app_config(&config)?;
            users
                .authenticator(Arc::new(LoggingNavigator), Arc::new(TracingNotifier))
                .logout()?;
            println!("Logged out");
            Ok(())
        }
        Commands::List { page, search } => {
            let users = UsersConsole::from_app_config(&config)?;
            list(&users, page, search.as_deref()).await
        }
        Commands::Console => {
            let users = UsersConsole::from_app_config(&config)?;
            console::run(&users).await
        }
    }
}

fn print_notifications(rx: &mut mpsc::UnboundedReceiver<Notification>) {
    while let Ok(n) = rx.try_recv() {
        println!("{}", console::format_notification(&n));
    }
}

async fn login(users: &UsersConsole, credentials: Credentials) -> Result<()> {
    let (navigator, mut routes) = ChannelNavigator::new();
    let (notifier, mut notes) = ChannelNotifier::new();

    let result = users
        .authenticator(Arc::new(navigator), Arc::new(notifier))
        .login(&credentials)
        .await;
    print_notifications(&mut notes);
    result?;

    if !std::io::stdin().is_terminal() {
        return Ok(());
    }
    // Follow the delayed navigation to the list screen.
    match routes.recv().await {
        Some(Route::UserList) => console::run(users).await,
        _ => Ok(()),
    }
}

async fn list(users: &UsersConsole, page: u32, search: Option<&str>) -> Result<()> {
    let (notifier, mut notes) = ChannelNotifier::new();
    let notifier = Arc::new(notifier);

    let guard = users.session_guard(Arc::new(LoggingNavigator), notifier.clone());
    if guard.check() == GuardDecision::Redirecting {
        print_notifications(&mut notes);
        bail!("no session; run `userdesk login` first");
    }

    let mut controller = users.controller(notifier);
    let outcome = controller.load_page(page).await;
    print_notifications(&mut notes);
    if outcome != Outcome::Applied {
        bail!("could not load page {page}");
    }
    if let Some(q) = search {
        controller.apply_filter(q);
    }

    print!(
        "{}",
        console::format_table(controller.page(), controller.filter().query(), controller.filtered())
    );
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    let users = UsersConsole::from_app_config(config)?;
    tracing::info!(base_url = %users.config().base_url, "Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
