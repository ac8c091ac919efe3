//! Basic usage example

use envfill::FromEnv;

#[derive(Debug, Default, FromEnv)]
struct Config {
    // Required field: fails when DATABASE_URL is unset or empty
    #[env("DATABASE_URL,required")]
    pub database_url: String,

    // With default value
    #[env("SERVER_ADDR,default=127.0.0.1:8080")]
    pub server_addr: String,

    // Numeric type
    #[env("MAX_CONNECTIONS,default=10")]
    pub max_connections: u32,

    // Boolean type
    #[env("DEBUG_MODE,default=false")]
    pub debug_mode: bool,

    // Not annotated: keeps its Default value
    pub started_by: String,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables for demonstration
    std::env::set_var("DATABASE_URL", "postgres://localhost/mydb");
    std::env::set_var("SERVER_ADDR", "0.0.0.0:3000");

    // Load configuration
    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Database URL: {}", config.database_url);
    println!("  Server Address: {}", config.server_addr);
    println!("  Max Connections: {}", config.max_connections);
    println!("  Debug Mode: {}", config.debug_mode);
    println!("  Started By: {:?}", config.started_by);

    // Errors name the variable
    std::env::remove_var("DATABASE_URL");
    if let Err(err) = Config::from_env() {
        println!("Expected error: {err}");
    }

    Ok(())
}
