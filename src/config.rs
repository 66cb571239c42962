use crate::models::{ReceiverIdentity, SenderIdentity};
use std::path::PathBuf;
use std::time::Duration;

/// Path of the synchronous BG 0204 service on the register host.
pub const DEFAULT_SERVICE_PATH: &str = "/CGS/StUF/services/BGSynchroon/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 8000;

const REQUIRED_VARS: [&str; 7] = [
    "BRP_HOST",
    "BRP_CERT",
    "BRP_VERIFY",
    "BRP_ZENDER_APPLICATIE",
    "BRP_ZENDER_GEBRUIKER",
    "BRP_ONTVANGER_APPLICATIE",
    "BRP_ONTVANGER_ORGANISATIE",
];

/// How the register's server certificate is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsVerification {
    Disabled,
    /// Built-in web PKI roots.
    SystemRoots,
    /// Only trust the CA certificate in this PEM file.
    CaBundle(PathBuf),
}

impl TlsVerification {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "False" | "false" | "0" | "no" => TlsVerification::Disabled,
            "True" | "true" | "1" | "yes" => TlsVerification::SystemRoots,
            path => TlsVerification::CaBundle(PathBuf::from(path)),
        }
    }
}

/// Everything a lookup needs to reach the population register.
#[derive(Debug, Clone)]
pub struct BrpConfig {
    /// PEM file holding the client certificate and its private key.
    pub client_certificate: PathBuf,
    pub tls_verification: TlsVerification,
    pub host: String,
    pub path: String,
    pub sender: SenderIdentity,
    pub receiver: ReceiverIdentity,
    pub timeout: Duration,
}

impl BrpConfig {
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.host, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub brp: BrpConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_source<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|&name| value(name).is_none())
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        let required = |name: &str| {
            value(name).ok_or_else(|| anyhow::anyhow!("{} environment variable required", name))
        };

        let host = required("BRP_HOST")?.trim_end_matches('/').to_string();
        if !host.starts_with("http://") && !host.starts_with("https://") {
            anyhow::bail!("BRP_HOST must start with http:// or https://");
        }

        let timeout_secs = match value("BRP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow::anyhow!("BRP_TIMEOUT_SECS must be a positive number"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let port = match value("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            port,
            brp: BrpConfig {
                client_certificate: PathBuf::from(required("BRP_CERT")?),
                tls_verification: TlsVerification::parse(&required("BRP_VERIFY")?),
                host,
                path: value("BRP_PATH").unwrap_or_else(|| DEFAULT_SERVICE_PATH.to_string()),
                sender: SenderIdentity {
                    application: required("BRP_ZENDER_APPLICATIE")?,
                    user: required("BRP_ZENDER_GEBRUIKER")?,
                },
                receiver: ReceiverIdentity {
                    application: required("BRP_ONTVANGER_APPLICATIE")?,
                    organisation: required("BRP_ONTVANGER_ORGANISATIE")?,
                },
                timeout: Duration::from_secs(timeout_secs),
            },
        };

        // Certificate paths and identities are not logged.
        tracing::debug!("BRP endpoint: {}", config.brp.endpoint());
        tracing::debug!("TLS verification: {:?}", config.brp.tls_verification);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
