use anyhow::{anyhow, Result};
use cozy_gym_bot::config::Config;
use cozy_gym_bot::database::connection::DatabaseManager;
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

/// `DATABASE_URL` is mandatory here, unlike for the server.
fn database_url() -> Result<String> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    config
        .database_url
        .ok_or_else(|| anyhow!("DATABASE_URL must be set to run migrations"))
}

async fn run_migrations() -> Result<()> {
    println!("🏋️ Cozy Gym Bot - Database Migration Tool");
    println!("==========================================");

    let url = database_url()?;
    println!("📊 Database URL: {}", mask_url(&url));

    if let Some(path) = sqlite_path(&url) {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                println!("📁 Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    println!("🚀 Running database migrations...");
    let db = DatabaseManager::new(&url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    if let Err(e) = db.run_migrations().await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
    println!("✅ Migrations completed successfully!");
    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let url = database_url()?;
    println!("📊 Database URL: {}", mask_url(&url));

    let db = DatabaseManager::new(&url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match check_tables(&db).await {
        Ok(tables) if tables.is_empty() => {
            println!("⚠️  Database is empty");
            println!("💡 Try running 'migrate up' to create the schema");
        }
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }
    Ok(())
}

async fn check_tables(db: &DatabaseManager) -> Result<Vec<String>> {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&db.pool)
    .await?;
    Ok(tables)
}

fn sqlite_path(url: &str) -> Option<&str> {
    let path = url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("//").unwrap_or(path);
    Some(path.split('?').next().unwrap_or(path))
}

fn mask_url(url: &str) -> String {
    match sqlite_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🏋️ Cozy Gym Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations (default)");
    println!("    check          Check database connection and list tables");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   SQLite connection string, e.g. sqlite://data/cozy_gym.db");
    println!();
}
