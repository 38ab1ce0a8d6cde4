//! CLI administration tool for short-link.
//!
//! Provides commands for managing user accounts, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (prompts for missing values)
//! cargo run --bin admin -- user create --email ops@example.com --name Ops
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use short_link::application::services::auth_service::hash_password;
use short_link::domain::entities::NewUser;
use short_link::domain::repositories::UserRepository;
use short_link::error::AppError;
use short_link::infrastructure::persistence::PgUserRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing short-link.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        /// Generate a random password instead of prompting
        #[arg(short = 'g', long)]
        generate_password: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create {
            email,
            name,
            generate_password,
            yes,
        } => create_user(&repo, email, name, generate_password, yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates a user account with interactive prompts.
///
/// The password is hashed with Argon2id before it is stored. A generated
/// password is printed once and cannot be retrieved later.
async fn create_user(
    repo: &PgUserRepository,
    email: Option<String>,
    name: Option<String>,
    generate: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let password = if generate {
        let generated = generate_password();
        println!("{}", "✨ Generated password".green());
        println!("  Password: {}", generated.bright_yellow().bold());
        println!(
            "{}",
            "⚠️  IMPORTANT: Save this password now! You won't be able to see it again."
                .red()
                .bold()
        );
        generated
    } else {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?
    };

    println!();
    println!("  Email: {}", email.cyan());
    println!("  Name:  {}", name.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = hash_password(&password).map_err(|e| anyhow::anyhow!("{e}"))?;

    let user = match repo
        .create(NewUser {
            email,
            password_hash,
            name,
        })
        .await
    {
        Ok(user) => user,
        Err(AppError::Conflict { .. }) => {
            println!("{}", "⚠️  A user with this email already exists".yellow());
            return Ok(());
        }
        Err(e) => anyhow::bail!("Failed to create user: {e}"),
    };

    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id.to_string().bright_black()
    );
    println!();
    println!("{}", "Get a token with:".bright_white());
    println!(
        "  curl -X POST http://localhost:3000/auth/login -H 'Content-Type: application/json' -d '{{\"email\":\"{}\",\"password\":\"...\"}}'",
        user.email
    );
    println!();

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {e}"))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<35} {:<25} {:<20}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(85).bright_black());

    for user in &users {
        println!(
            "  {:<5} {:<35} {:<25} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.name,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Displays system statistics: live and deleted links, clicks (total and
/// today, UTC) and users.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let live_links: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;

    let deleted_links: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE deleted_at IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let total_clicks: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM link_stats")
        .fetch_one(pool)
        .await?;

    let today_clicks: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM link_stats WHERE date = (NOW() AT TIME ZONE 'UTC')::date",
    )
    .fetch_one(pool)
    .await?;

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:         {} live, {} deleted",
        live_links.to_string().bright_green().bold(),
        deleted_links.to_string().bright_black()
    );
    println!(
        "  Clicks:        {} total, {} today",
        total_clicks.to_string().bright_green().bold(),
        today_clicks.to_string().bright_green()
    );
    println!("  Users:         {}", users.to_string().bright_green().bold());
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

            let migrations: Option<i64> = sqlx::query_scalar(
                "SELECT MAX(version) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(None);

            println!("  PostgreSQL: {}", version.bright_white());
            match migrations {
                Some(v) => println!("  Schema:     migration {}", v.to_string().bright_white()),
                None => println!("  Schema:     {}", "not migrated".yellow()),
            }
            println!();
        }
    }

    Ok(())
}

/// Generates a random 20-character alphanumeric password.
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
