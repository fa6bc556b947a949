//! Turbocache CLI
//!
//! Inspects and edits a persistent cache kept in a JSON registry file.
//!
//! ```text
//! turbocache get <key>
//! turbocache set <key> <value> [ttl]
//! turbocache delete <key>
//! turbocache has <key>
//! turbocache keys | size | clear
//! ```

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turbocache::{parse_ttl, Cache, CacheConfig, FileRegistry, StoreKind};

const USAGE: &str = "usage: turbocache <get|set|delete|has|keys|size|clear> [key] [value] [ttl]";

/// Entry point: loads configuration, opens the registry file and runs one command.
///
/// # Environment Variables
/// - `TURBOCACHE_FILE` - Registry file (default: `turbocache.json`)
/// - `TURBOCACHE_*` - Cache options, see `CacheConfig::from_env`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turbocache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        bail!(USAGE);
    };

    let mut config = CacheConfig::from_env().context("Failed to load configuration")?;
    if config.name.is_none() {
        config.name = Some("cli".to_string());
    }

    let path = env::var("TURBOCACHE_FILE").unwrap_or_else(|_| "turbocache.json".to_string());
    let registry = FileRegistry::open(&path).with_context(|| format!("Failed to open {path}"))?;
    info!("Using registry {}", registry.path().display());

    let cache = Cache::new(config, StoreKind::PersistentProperty(Arc::new(registry)))?;
    let key = || args.get(1).map(String::as_str).context(USAGE);

    match command {
        "get" => match cache.get(key()?).await? {
            Some(value) => println!("{value}"),
            None => println!("(absent)"),
        },
        "set" => {
            let raw = args.get(2).context(USAGE)?;
            // Anything that is not valid JSON is stored as a plain string
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            let ttl = args.get(3).map(|raw| parse_ttl(raw)).transpose()?;

            if let Some(outcome) = cache.set(key()?, value, ttl).await? {
                println!("{}", outcome.hash().unwrap_or("stored"));
            }
        }
        "delete" => {
            cache.delete(key()?).await?;
        }
        "has" => println!("{}", cache.has(key()?).await?),
        "keys" => {
            for key in cache.keys().await? {
                println!("{key}");
            }
        }
        "size" => println!("{}", cache.size().await),
        "clear" => {
            cache.clear().await?;
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }

    Ok(())
}
