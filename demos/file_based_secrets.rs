//! File-based secrets example

use envfill::{FileSecrets, FromEnv, ProcessEnv};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Default, FromEnv)]
struct Config {
    // Loaded from API_KEY, or from the file named by API_KEY_FILE
    #[env("API_KEY,required")]
    pub api_key: String,

    // Secrets go through the same annotation options as any other field
    #[env("DATABASE_PASSWORD,type=byte")]
    pub database_password: Vec<u8>,

    // Regular environment variable
    #[env("DATABASE_HOST,default=localhost")]
    pub database_host: String,
}

fn main() -> anyhow::Result<()> {
    // Save API key to file
    let mut api_key_file = NamedTempFile::new()?;
    writeln!(api_key_file, "super_secret_api_key_12345")?;

    // Save database password to file
    let mut db_password_file = NamedTempFile::new()?;
    writeln!(db_password_file, "db_password_67890")?;

    // Set environment variables (with _FILE suffix)
    std::env::remove_var("API_KEY");
    std::env::remove_var("DATABASE_PASSWORD");
    std::env::set_var("API_KEY_FILE", api_key_file.path());
    std::env::set_var("DATABASE_PASSWORD_FILE", db_password_file.path());

    // Load configuration
    let config = Config::from_lookup(&FileSecrets::new(ProcessEnv))?;

    println!("Configuration loaded from files:");
    println!("  API Key: {}", config.api_key);
    println!(
        "  Database Password: {}",
        String::from_utf8_lossy(&config.database_password)
    );
    println!("  Database Host: {}", config.database_host);

    Ok(())
}
