//! Command-line and environment configuration.

use clap::Parser;
use scrapbook_auth::{AuthResult, DEFAULT_LEEWAY_SECS, SignedTokenVerifier};
use scrapbook_storage::{Database, StoreResult};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Path value that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Parser, Debug, Clone)]
#[command(name = "scrapbook-server", version)]
#[command(about = "Scrapbook HTTP API server")]
pub struct Args {
    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long, env = "SCRAPBOOK_DB", default_value = "scrapbook.db")]
    pub database: PathBuf,

    /// Address to bind the HTTP listener to
    #[arg(long, env = "SCRAPBOOK_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// HTTP port
    #[arg(short, long, env = "SCRAPBOOK_PORT", default_value = "4100")]
    pub port: u16,

    /// Base64url Ed25519 public key that session tokens are signed with
    #[arg(long, env = "SCRAPBOOK_TOKEN_PUBLIC_KEY")]
    pub token_public_key: String,

    /// Clock skew tolerated on token expiry, in seconds
    #[arg(long, env = "SCRAPBOOK_TOKEN_LEEWAY_SECS", default_value_t = DEFAULT_LEEWAY_SECS)]
    pub token_leeway_secs: i64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn open_database(&self) -> StoreResult<Database> {
        if self.database.as_os_str() == IN_MEMORY {
            Database::open_in_memory()
        } else {
            Database::open(&self.database)
        }
    }

    pub fn verifier(&self) -> AuthResult<SignedTokenVerifier> {
        Ok(SignedTokenVerifier::from_base64(&self.token_public_key)?
            .with_leeway(self.token_leeway_secs))
    }
}
