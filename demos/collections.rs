//! Collections, byte/rune fields and richer scalar types

use envfill::FromEnv;
use regex::Regex;
use std::time::Duration;
use time::OffsetDateTime;

#[derive(Debug, Default, FromEnv)]
struct Config {
    // Comma-separated by default
    #[env("ALLOWED_HOSTS")]
    pub allowed_hosts: Vec<String>,

    // Custom separator; a default cannot contain a comma
    #[env("PORTS,default=8080:8081,separator=:")]
    pub ports: Vec<u16>,

    // One byte per character of the value
    #[env("SIGNING_KEY,type=byte")]
    pub signing_key: Vec<u8>,

    // A single code point
    #[env("DELIMITER,type=rune,default=|")]
    pub delimiter: char,

    // Durations use humantime syntax
    #[env("REQUEST_TIMEOUT,default=30s")]
    pub request_timeout: Duration,

    #[env("RETRY_BACKOFF,default=100ms;250ms;1s,separator=;")]
    pub retry_backoff: Vec<Duration>,

    // RFC3339 timestamp; None when unset
    #[env("MAINTENANCE_AT")]
    pub maintenance_at: Option<OffsetDateTime>,

    // Compiled regular expression
    #[env("PATH_FILTER")]
    pub path_filter: Option<Regex>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("ALLOWED_HOSTS", "localhost,127.0.0.1");
    std::env::set_var("SIGNING_KEY", "hello");
    std::env::set_var("MAINTENANCE_AT", "2030-01-01T03:00:00Z");
    std::env::set_var("PATH_FILTER", r"^/api/v\d+/");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Allowed Hosts: {:?}", config.allowed_hosts);
    println!("  Ports: {:?}", config.ports);
    println!("  Signing Key: {:?}", config.signing_key);
    println!("  Delimiter: {:?}", config.delimiter);
    println!("  Request Timeout: {:?}", config.request_timeout);
    println!("  Retry Backoff: {:?}", config.retry_backoff);
    println!("  Maintenance At: {:?}", config.maintenance_at);
    println!(
        "  Path Filter matches /api/v2/users: {}",
        config
            .path_filter
            .as_ref()
            .is_some_and(|re| re.is_match("/api/v2/users"))
    );

    // A byte field holds one sequence; a list of them is rejected
    std::env::set_var("SIGNING_KEY", "a,b");
    if let Err(err) = Config::from_env() {
        println!("Expected error: {err}");
    }

    Ok(())
}
