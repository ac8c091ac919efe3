//! Nested configuration example

use envfill::{lookup::from_fn, FromEnv};
use std::collections::HashMap;

#[derive(Debug, Default, FromEnv)]
struct DatabaseConfig {
    #[env("DATABASE_URL,required")]
    pub url: String,

    #[env("DATABASE_POOL_SIZE,default=5")]
    pub pool_size: u32,
}

#[derive(Debug, Default, FromEnv)]
struct ServerConfig {
    #[env("SERVER_PORT,default=8080")]
    pub port: u16,

    // Names are not prefixed: the nested struct reads LOG_LEVEL too
    #[env("LOG_LEVEL,default=info")]
    pub log_level: String,
}

#[derive(Debug, Default, FromEnv)]
struct Config {
    #[env(nested)]
    pub database: DatabaseConfig,

    #[env(nested)]
    pub server: ServerConfig,

    #[env("LOG_LEVEL,default=info")]
    pub log_level: String,
}

fn main() -> anyhow::Result<()> {
    // Any Lookup works as a source; here a fixed map instead of the process env
    let vars = HashMap::from([
        ("DATABASE_URL".to_string(), "postgres://db/app".to_string()),
        ("LOG_LEVEL".to_string(), "debug".to_string()),
    ]);

    let config = Config::from_lookup(&vars)?;
    println!("From a map: {config:#?}");

    // Closures work too
    let config = Config::from_lookup(&from_fn(|name| match name {
        "DATABASE_URL" => Some("postgres://other/app".to_string()),
        "SERVER_PORT" => Some("9000".to_string()),
        _ => None,
    }))?;
    println!("From a closure: {config:#?}");

    Ok(())
}
