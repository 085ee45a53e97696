//! sattva command-line shell.
//!
//! Thin presentation layer over the chat controller: reads lines from
//! stdin, renders snapshots, and wires either the hosted backend or the
//! in-memory one. All chat semantics live in the library crates.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use sattva_application::{AuthFlow, ChatController, SendOutcome};
use sattva_core::Gateway;
use sattva_core::search::SearchProvider;
use sattva_core::user::IdentityProvider;
use sattva_infrastructure::config::SattvaConfig;
use sattva_infrastructure::google_search::GoogleSearchProvider;
use sattva_infrastructure::memory::{MemoryGateway, MemoryIdentityProvider};
use sattva_infrastructure::rest::{rest_gateway, rest_identity_provider};

const HELP: &str = "\
Commands:
  :login <email> <password>          sign in
  :signup <email> <password> <name>  create an account
  :sessions                          list your sessions
  :new [name]                        start a new session
  :switch <session-id>               switch to a session
  :rename <session-id> <name>        rename a session
  :delete <session-id>               delete a session
  :pay                               simulate the $9.99 payment
  :help                              show this help
  :quit                              exit
Anything else is sent as a search query.";

#[derive(Parser)]
#[command(name = "sattva")]
#[command(about = "Sattva - retreat discovery chat", long_about = None)]
struct Cli {
    /// Persistence backend to run against
    #[arg(long, value_enum, default_value = "memory")]
    backend: Backend,

    /// Config file path (defaults to <config dir>/sattva/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// In-memory backend; nothing survives exit
    Memory,
    /// Hosted backend configured under [backend]
    Rest,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SattvaConfig::from_path(path)?,
        None => SattvaConfig::load()?,
    };

    let search: Arc<dyn SearchProvider> =
        Arc::new(GoogleSearchProvider::from_config(config.require_search()?));
    let (gateway, identity_provider) = build_backend(cli.backend, &config)?;

    let controller = ChatController::new(gateway, search);
    let auth = AuthFlow::new(identity_provider);

    run_repl(&controller, &auth).await
}

fn build_backend(
    backend: Backend,
    config: &SattvaConfig,
) -> Result<(Gateway, Arc<dyn IdentityProvider>)> {
    match backend {
        Backend::Memory => {
            let store = MemoryGateway::new();
            let provider: Arc<dyn IdentityProvider> =
                Arc::new(MemoryIdentityProvider::new(store.clone()));
            Ok((store.gateway(), provider))
        }
        Backend::Rest => {
            let backend_config = config.require_backend()?;
            let provider: Arc<dyn IdentityProvider> = rest_identity_provider(backend_config);
            Ok((rest_gateway(backend_config), provider))
        }
    }
}

async fn run_repl(controller: &ChatController, auth: &AuthFlow) -> Result<()> {
    println!("sattva - retreat discovery chat");
    println!("Type a query like \"Yoga in Bali\", or :help for commands.");
    render(controller).await;

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            if !handle_command(controller, auth, command).await {
                break;
            }
        } else {
            match controller.send(line).await {
                Ok(SendOutcome::AuthRequired) => {
                    println!(
                        "Please sign in first: :login <email> <password> \
                         or :signup <email> <password> <name>"
                    );
                }
                Ok(_) => render(controller).await,
                Err(err) => println!("error: {err}"),
            }
        }
    }
    Ok(())
}

/// Runs one `:command`. Returns false when the shell should exit.
async fn handle_command(controller: &ChatController, auth: &AuthFlow, command: &str) -> bool {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("help", _) => println!("{HELP}"),
        ("quit" | "exit", _) => return false,
        ("login", [email, password]) => match auth.sign_in(email, password).await {
            Ok(identity) => {
                controller.on_authenticated(identity.clone()).await;
                println!("Signed in as {}", identity.email);
            }
            Err(err) => println!("error: {err}"),
        },
        ("signup", [email, password, rest @ ..]) if !rest.is_empty() => {
            let full_name = rest.join(" ");
            match auth.sign_up(email, password, &full_name).await {
                Ok(identity) => {
                    controller.on_authenticated(identity.clone()).await;
                    println!("Signed up as {}", identity.email);
                }
                Err(err) => println!("error: {err}"),
            }
        }
        ("sessions", _) => match controller.list_sessions().await {
            Ok(sessions) if sessions.is_empty() => println!("No sessions yet."),
            Ok(sessions) => {
                for session in sessions {
                    println!("{}  {}  (updated {})", session.id, session.name, session.updated_at);
                }
            }
            Err(err) => println!("error: {err}"),
        },
        ("new", rest) => {
            let session_name = (!rest.is_empty()).then(|| rest.join(" "));
            match controller.new_session(session_name.as_deref()).await {
                Ok(session) => {
                    println!("Started session {}", session.id);
                    render(controller).await;
                }
                Err(err) => println!("error: {err}"),
            }
        }
        ("switch", [session_id]) => match controller.switch_session(session_id).await {
            Ok(session) => {
                println!("Switched to {}", session.name);
                render(controller).await;
            }
            Err(err) => println!("error: {err}"),
        },
        ("rename", [session_id, rest @ ..]) if !rest.is_empty() => {
            match controller.rename_session(session_id, &rest.join(" ")).await {
                Ok(session) => println!("Renamed to {}", session.name),
                Err(err) => println!("error: {err}"),
            }
        }
        ("delete", [session_id]) => match controller.delete_session(session_id).await {
            Ok(()) => {
                println!("Deleted.");
                render(controller).await;
            }
            Err(err) if err.is_partial_delete() => {
                println!("Session partially deleted; try again: {err}");
            }
            Err(err) => println!("error: {err}"),
        },
        ("pay", _) => match controller.confirm_payment().await {
            Ok(()) => render(controller).await,
            Err(err) => println!("error: {err}"),
        },
        _ => println!("Unknown command; :help lists commands."),
    }
    true
}

async fn render(controller: &ChatController) {
    let snapshot = controller.snapshot().await;
    println!();
    for message in &snapshot.transcript {
        println!("[{}] {}", message.role, message.text);
    }
    if snapshot.loading {
        println!("[bot] Loading...");
    }
    if !snapshot.results.cards.is_empty() {
        if snapshot.results.obscured {
            // The whole block is withheld as a unit while locked.
            println!(
                "--- {} retreat(s) found. Pay $9.99 with :pay to unlock booking info. ---",
                snapshot.results.cards.len()
            );
        } else {
            println!("--- retreats ---");
            for card in &snapshot.results.cards {
                println!("* {} | {} | {}", card.title, card.location, card.date);
                println!("  image: {}", card.image);
                if let Some(link) = &card.booking_link {
                    println!("  book: {link}");
                }
            }
        }
    }
    println!();
}
