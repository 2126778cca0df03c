//! Backend entry-point: configuration, logging, and server bootstrap.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{ServerConfig, create_server};

/// Command-line and environment configuration.
#[derive(Debug, Parser)]
#[command(name = "backend", about = "Library lending service")]
struct Args {
    /// PostgreSQL connection string. Without it the server runs against
    /// fixture ports serving an empty library.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Socket address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,

    /// File holding the session signing key material.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    session_key_file: PathBuf,

    /// Permit an ephemeral session key when the key file is unreadable.
    /// Always permitted in debug builds.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL")]
    session_allow_ephemeral: bool,

    /// Set the `Secure` flag on the session cookie.
    #[arg(long, env = "SESSION_COOKIE_SECURE", default_value_t = true)]
    session_cookie_secure: bool,
}

fn load_session_key(args: &Args) -> Result<Key> {
    match std::fs::read(&args.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            if cfg!(debug_assertions) || args.session_allow_ephemeral {
                warn!(
                    path = %args.session_key_file.display(),
                    %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(error).wrap_err_with(|| {
                    format!(
                        "failed to read session key at {}",
                        args.session_key_file.display()
                    )
                })
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = Args::parse();
    let key = load_session_key(&args)?;

    let mut config = ServerConfig::new(key, args.session_cookie_secure, SameSite::Lax, args.bind_addr);
    match &args.database_url {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url.clone()))
                .await
                .wrap_err("failed to build the database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("DATABASE_URL not set; serving fixture ports with an empty library"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(addr = %args.bind_addr, "server listening");
    server.await.wrap_err("server terminated with an error")
}
