//! Console Front-End Entry Point
//!
//! Interactive terminal client for the shipping front-end: registration,
//! login with role-based dashboard dispatch, guarded navigation and the
//! backend services. Uses `anyhow` for startup errors; everything after
//! startup is reported through the localized error messages.

mod commands;
mod config;

use std::sync::Arc;

use anyhow::Result;
use auth::presentation::{AppRouter, NavigationResult, message_for, retry_hint};
use auth::{
    AuthGateway, CognitoIdentityProvider, ErrorKind, RoleResolver, SessionStore,
    redirect_after_login,
};
use platform::storage::FileStore;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use shipping::{ApiClient, PriceQuote, Rating};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Command, HELP};
use crate::config::ConsoleConfig;

type Gateway = AuthGateway<CognitoIdentityProvider, FileStore>;

struct Console {
    config: ConsoleConfig,
    store: Arc<SessionStore<FileStore>>,
    gateway: Arc<Gateway>,
    router: AppRouter<RoleResolver<CognitoIdentityProvider, FileStore>>,
    api: ApiClient<SessionStore<FileStore>>,
}

impl Console {
    fn new(config: ConsoleConfig) -> Result<Self> {
        let storage = FileStore::open(&config.storage_dir, &config.origin)?;
        let store = Arc::new(SessionStore::new(storage, &config.auth));
        let provider = Arc::new(CognitoIdentityProvider::new(&config.cognito)?);
        let auth_config = Arc::new(config.auth.clone());

        let gateway = Arc::new(AuthGateway::new(provider, store.clone(), auth_config.clone()));
        let resolver = Arc::new(RoleResolver::new(gateway.clone()));
        let router = AppRouter::new(resolver, &auth_config.login_path, auth_config.guard_history);
        let api = ApiClient::new(&config.api, store.clone())?;

        Ok(Self {
            config,
            store,
            gateway,
            router,
            api,
        })
    }

    fn fail(&self, kind: ErrorKind) {
        eprintln!("✗ {}", message_for(kind, self.config.locale));
        if let Some(hint) = retry_hint(kind, self.config.locale) {
            eprintln!("  {hint}");
        }
    }

    /// Run the guard for `route`; true when the user may proceed
    async fn enter(&self, route: &str) -> bool {
        match self.router.navigate(route).await {
            NavigationResult::Entered(path) => {
                println!("→ /{path}");
                true
            }
            NavigationResult::Redirected { from, to } => {
                println!("✗ /{from} not available, redirected to /{to}");
                false
            }
            NavigationResult::NotFound(path) => {
                println!("✗ no such route: {path}");
                false
            }
        }
    }

    /// Returns false when the loop should stop
    async fn run(&self, command: Command) -> bool {
        match command {
            Command::Empty => {}
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,

            Command::Register(input) => match self.gateway.register(input).await {
                Ok(pending) => {
                    println!("✓ Registered {} ({})", pending.email, pending.phone);
                    if let Some(destination) = pending.delivery_destination {
                        println!("  confirmation code sent to {destination}");
                    }
                }
                Err(e) => self.fail(e.kind()),
            },
            Command::Confirm { email, code } => match self.gateway.confirm(&email, &code).await {
                Ok(()) => println!("✓ Account confirmed, you can log in now"),
                Err(e) => self.fail(e.kind()),
            },
            Command::Resend { email } => match self.gateway.resend_confirmation(&email).await {
                Ok(()) => println!("✓ A new code is on its way"),
                Err(e) => self.fail(e.kind()),
            },
            Command::Login { email, password } => match self.gateway.login(&email, &password).await {
                Ok(role) => {
                    println!("✓ Signed in as {role}");
                    redirect_after_login(
                        role,
                        &**self.router.location(),
                        &self.config.auth.login_path,
                    );
                    if let Some(path) = self.router.location().current() {
                        println!("→ /{path}");
                    }
                }
                Err(e) => self.fail(e.kind()),
            },
            Command::Logout => {
                self.gateway.logout().await;
                println!("✓ Signed out");
            }
            Command::Whoami => match self.store.get_session() {
                Some(session) => println!(
                    "{} · {} · expires {}",
                    session.subject_id,
                    session.role,
                    session.expires_at.format("%Y-%m-%d %H:%M UTC")
                ),
                None => self.fail(ErrorKind::NoSession),
            },
            Command::Open { route } => {
                self.enter(&route).await;
            }

            Command::Price {
                origin,
                destination,
                weight_kg,
                declared_value,
            } => {
                if !self.enter("pricing").await {
                    return true;
                }
                let quote = PriceQuote {
                    origin,
                    destination,
                    weight_kg,
                    declared_value,
                };
                match shipping::calculate_price(&self.api, &quote).await {
                    Ok(price) => println!(
                        "base {:.0} + weight {:.0} + insurance {:.0} + taxes {:.0} = {:.0} {}",
                        price.base_price,
                        price.weight_charge,
                        price.insurance,
                        price.taxes,
                        price.total,
                        price.currency
                    ),
                    Err(e) => self.fail(e.kind()),
                }
            }
            Command::Track { guide } => match shipping::track_shipment(&self.api, &guide).await {
                Ok(tracking) => {
                    println!("{} · {}", tracking.guide_number, tracking.status);
                    for event in &tracking.events {
                        println!(
                            "  {} {} {}",
                            event.timestamp.format("%Y-%m-%d %H:%M"),
                            event.status,
                            event.location.as_deref().unwrap_or("")
                        );
                    }
                }
                Err(e) => self.fail(e.kind()),
            },
            Command::Rate {
                guide,
                score,
                comment,
            } => {
                if !self.enter("ratings").await {
                    return true;
                }
                let rating = Rating {
                    guide_number: guide,
                    score,
                    comment,
                };
                match shipping::submit_rating(&self.api, &rating).await {
                    Ok(()) => println!("✓ Thanks for rating {}", rating.guide_number),
                    Err(e) => self.fail(e.kind()),
                }
            }
        }
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, so it does not interleave with command output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "console=info,auth=info,shipping=info,platform=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConsoleConfig::from_env()?;
    tracing::info!(
        origin = %config.origin,
        region = %config.cognito.region,
        api = %config.api.base_url,
        "Starting console"
    );

    let console = Console::new(config)?;

    if let Some(session) = console.store.get_session() {
        println!("Welcome back ({})", session.role);
    }
    println!("Type `help` for commands.");

    let mut editor = DefaultEditor::new()?;
    loop {
        let line = match editor.readline("courier> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{msg}");
                continue;
            }
        };

        // Passwords stay out of the history file.
        if !matches!(command, Command::Login { .. } | Command::Register(_) | Command::Empty) {
            let _ = editor.add_history_entry(line.as_str());
        }

        if !console.run(command).await {
            break;
        }
    }

    tracing::info!("Console closed");
    Ok(())
}
