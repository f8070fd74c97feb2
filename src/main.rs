//! EpiGuard - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use epiguard::{
    cli::{Args, Commands, ContactsCommand},
    clock::{Clock, SystemClock},
    config::{Config, EmergencyContact, SettingsStore},
    llm::{ChatClient, LanguageModelService},
    notify::TerminalNotifier,
    reminder::ReminderTicker,
    repl::{input::InputHandler, DisplayManager, ReplSession},
    session::{SessionController, SessionServices, SessionState},
    telemetry::TelemetryCollector,
    timeline::AdviceResolver,
    translation::LlmTranslator,
    types::Severity,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let stored = Config::load(args.config.as_deref())?;
    let mut config = stored.clone();
    apply_overrides(&args, &mut config);
    config.validate()?;

    match args.command() {
        Commands::Chat => run_chat(&args, &config, stored).await,
        Commands::Config => show_config(&args, &config),
        Commands::Advice { severity } => {
            show_advice(&severity);
            Ok(())
        }
        Commands::Contacts { command } => {
            manage_contacts(&args, stored, command.unwrap_or(ContactsCommand::List))
        }
    }
}

/// Initialize tracing; `RUST_LOG` overrides the verbosity flags
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_overrides(args: &Args, config: &mut Config) {
    if let Some(language) = args.language {
        config.language.active = language;
    }
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.llm.base_url = base_url.clone();
    }
}

async fn run_chat(args: &Args, config: &Config, stored: Config) -> Result<()> {
    let client = ChatClient::with_config(&config.llm.base_url, &config.llm.model, config.api_key())?;
    let llm: Arc<dyn LanguageModelService> = Arc::new(client);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let state = SessionState::new(
        config.reminders.interval_hours,
        config.language.active,
        clock.now(),
    )
    .with_history_window(config.llm.history_window)
    .with_notifications(config.reminders.notifications);

    let services = SessionServices {
        translator: Arc::new(LlmTranslator::new(llm.clone())),
        llm,
        notifier: Arc::new(TerminalNotifier),
        clock,
    };
    let controller = Arc::new(SessionController::new(
        state,
        services,
        TelemetryCollector::new(),
    ));

    let ticker = {
        let controller = controller.clone();
        ReminderTicker::spawn(config.check_period(), move || {
            let controller = controller.clone();
            async move {
                if controller.tick().await.is_none() {
                    debug!("reminder not due");
                }
            }
        })
    };
    info!(
        model = %config.llm.model,
        interval = %config.reminders.interval_hours,
        "session started"
    );

    let input = InputHandler::with_history(history_path())?;
    let display = DisplayManager::new(args.verbosity().show_progress());
    let mut repl = ReplSession::new(input, display, controller.clone(), config.contacts.clone());
    if let Some(path) = config_path(args) {
        repl = repl.with_settings(SettingsStore::new(path, stored));
    }

    repl.show_welcome(env!("CARGO_PKG_VERSION"), &config.llm.model).await;
    let result = repl.run().await;

    ticker.stop().await;
    let stats = controller.telemetry().get_stats();
    info!(
        replies = stats.replies,
        service_failures = stats.service_failures,
        reminders = stats.reminders_fired,
        "session ended"
    );

    result
}

fn config_path(args: &Args) -> Option<PathBuf> {
    args.config.clone().or_else(Config::default_path)
}

fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".epiguard")
        .join("history")
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    let path = config_path(args);

    println!("{}", "EpiGuard Configuration".bold().cyan());
    println!("{}", "=".repeat(40).cyan());
    if let Some(path) = path {
        let note = if path.exists() { "" } else { " (not found, using defaults)" };
        println!("File:           {}{}", path.display(), note.dimmed());
    }
    println!("Endpoint:       {}", config.llm.base_url);
    println!("Model:          {}", config.llm.model);
    let key_state = if config.api_key().is_some() { "set".green() } else { "missing".red() };
    println!("API key:        ${} ({})", config.llm.api_key_env, key_state);
    println!("History window: {} turns", config.llm.history_window);
    println!("Reminders:      {}", config.reminders.interval_hours);
    println!("Notifications:  {}", config.reminders.notifications);
    println!("Language:       {}", config.language.active);
    println!("Contacts:       {}", config.contacts.len());
    Ok(())
}

fn show_advice(label: &str) {
    let severity = Severity::parse(label);
    let note = if severity.is_recognized() {
        String::new()
    } else {
        " (unrecognized label)".dimmed().to_string()
    };
    println!("{}{}", severity.label().bold(), note);
    println!("  {}", AdviceResolver::resolve(&severity));
}

fn manage_contacts(args: &Args, mut config: Config, command: ContactsCommand) -> Result<()> {
    let list = |contacts: &[EmergencyContact]| {
        if contacts.is_empty() {
            println!("{}", "No contacts configured.".dimmed());
        }
        for (index, contact) in contacts.iter().enumerate() {
            println!("{}. {} {} [{}]", index + 1, contact.name.bold(), contact.number, contact.kind);
        }
    };

    match command {
        ContactsCommand::List => {
            list(&config.contacts);
            return Ok(());
        }
        ContactsCommand::Add { name, number, kind } => {
            config.add_contact(EmergencyContact {
                name,
                number,
                kind: kind.into(),
            });
        }
        ContactsCommand::Remove { position } => {
            let index = position
                .checked_sub(1)
                .context("Contact numbers start at 1")?;
            let removed = config.remove_contact(index)?;
            println!("Removed {}", removed.name);
        }
    }

    let path = config_path(args)
        .context("Could not determine the configuration file location")?;
    config.save(&path)?;
    list(&config.contacts);
    println!("{}", format!("Saved to {}", path.display()).dimmed());
    Ok(())
}
