//! CLI administration tool for folio.
//!
//! Provides commands for managing admin tokens, viewing content counts,
//! checking the database and converting legacy math markup without going
//! through the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin token
//! cargo run --bin admin -- token create
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token
//! cargo run --bin admin -- token revoke laptop
//!
//! # Content counts per section
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Convert legacy math markup from a file (or stdin)
//! cargo run --bin admin -- convert notes.html --trace
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (`DATABASE_URL`, `TOKEN_SIGNING_SECRET`, ...). The
//! `convert` command needs none of them.

use folio::application::services::{AuthService, ContentService};
use folio::config::{Config, load_from_env};
use folio::domain::clock::SystemClock;
use folio::domain::markup::{trace_legacy_math, transform_legacy_math};
use folio::domain::repositories::TokenRepository;
use folio::infrastructure::persistence::{PgContentRepository, PgTokenRepository};
use folio::server::connect_pool;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Shortest accepted custom token.
const MIN_TOKEN_LEN: usize = 16;

/// CLI tool for managing folio.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage admin tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show item counts per section
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Convert legacy <sub>/<sup> math markup to LaTeX
    Convert {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Print the text after every stage
        #[arg(long)]
        trace: bool,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new admin token
    Create {
        /// Token name (e.g., "laptop", "ci")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

type TokenService = AuthService<PgTokenRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Convert { file, trace } => return handle_convert(file, trace),
        command => command,
    };

    let config = load_from_env()?;
    let pool = connect_pool(&config).await?;

    match command {
        Commands::Token { action } => handle_token_action(action, &pool, &config).await?,
        Commands::Stats => handle_stats(&pool, &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Convert { .. } => {}
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool, config: &Config) -> Result<()> {
    let repo = Arc::new(PgTokenRepository::new(Arc::new(pool.clone())));
    let service = AuthService::new(repo.clone(), config.token_signing_secret.clone());

    match action {
        TokenAction::Create { name, token, yes } => {
            create_token(&service, name, token, yes).await?;
        }
        TokenAction::List => {
            list_tokens(&service).await?;
        }
        TokenAction::Revoke { name_or_id } => {
            revoke_token(&service, repo.as_ref(), name_or_id).await?;
        }
    }

    Ok(())
}

/// Creates a new admin token with interactive prompts.
///
/// Only the HMAC of the token is stored. The raw value is shown once.
async fn create_token(
    service: &TokenService,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create Admin Token".bright_blue().bold());
    println!();

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("laptop")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            validate_custom_token(&t)?;
            println!("{}", "⚠️  Using provided token value".yellow());
            t
        }
        None => {
            let generated = generate_token();
            println!("{}", "✨ Generated new token".green());
            generated
        }
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .create_token(&token_name, &token_value)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!(
        "  Log in at {} or send it to the API:",
        "/admin/login".bright_cyan()
    );
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/content/articles",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all admin tokens with status indicators.
async fn list_tokens(service: &TokenService) -> Result<()> {
    println!("{}", "📋 Admin Tokens".bright_blue().bold());
    println!();

    let tokens = service
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<24} {:<17} {:<17} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Last used".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };
        let last_used = token
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "  {:<3} {:<24} {:<17} {:<17} {}",
            token.id.to_string().bright_black(),
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            last_used.bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by name or ID after confirmation.
async fn revoke_token(
    service: &TokenService,
    repo: &PgTokenRepository,
    name_or_id: String,
) -> Result<()> {
    println!("{}", "🔒 Revoke Admin Token".bright_blue().bold());
    println!();

    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    service
        .revoke(&token.id.to_string())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays item counts per section and the number of active tokens.
async fn handle_stats(pool: &PgPool, config: &Config) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let pool = Arc::new(pool.clone());
    let content = ContentService::new(
        Arc::new(PgContentRepository::new(pool.clone())),
        Arc::new(SystemClock),
        config.visibility_policy()?,
    );
    let counts = content
        .counts()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count content: {}", e))?;

    println!(
        "  {:<12} {:>7} {:>9} {:>10} {:>7}",
        "Section".bright_white().bold(),
        "Total".bright_white().bold(),
        "Published".bright_white().bold(),
        "Scheduled".bright_white().bold(),
        "Drafts".bright_white().bold()
    );
    println!("  {}", "─".repeat(50).bright_black());

    for (kind, c) in &counts {
        println!(
            "  {:<12} {:>7} {:>9} {:>10} {:>7}",
            kind.plural_label().cyan(),
            c.total.to_string().bright_white().bold(),
            c.live.to_string().green(),
            c.scheduled.to_string().yellow(),
            c.drafts.to_string().bright_black()
        );
    }

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool.as_ref())
            .await?;

    println!();
    println!(
        "  Active tokens: {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

/// Runs the markup converter over a file or stdin and prints the result.
fn handle_convert(file: Option<PathBuf>, trace: bool) -> Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    if trace {
        for (n, stage) in trace_legacy_math(&input).iter().enumerate() {
            println!(
                "{} {}",
                format!("[{:>2}]", n + 1).bright_black(),
                stage.stage.bright_cyan().bold()
            );
            println!("{}", stage.output);
            println!();
        }
    } else {
        println!("{}", transform_legacy_math(&input));
    }

    Ok(())
}

/// Rejects custom tokens that are too short or unsafe in a cookie.
fn validate_custom_token(token: &str) -> Result<()> {
    if token.len() < MIN_TOKEN_LEN {
        bail!("Token must be at least {MIN_TOKEN_LEN} characters");
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        bail!("Token may only contain ASCII letters, digits, '-', '_' and '.'");
    }
    Ok(())
}

/// Generates a cryptographically random token.
///
/// # Format
///
/// - Length: 48 characters
/// - Character set: A-Z, a-z, 0-9
/// - Entropy: ~286 bits
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
