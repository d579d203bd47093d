//! Application configuration loaded from environment variables.

use crate::errors::{Result, WatcherError};

#[derive(Debug, Clone)]
pub struct Config {
    /// Soroban RPC endpoint (e.g. https://soroban-testnet.stellar.org)
    pub rpc_url: String,
    /// Contract addresses to watch (Strkey format). Both the shipping and
    /// shopping contracts emit the same alert shape, so one list covers any
    /// mix of deployed instances.
    pub contract_ids: Vec<String>,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to poll the RPC for new events
    pub poll_interval_secs: u64,
    /// Maximum number of events to fetch per RPC request
    pub events_per_page: u32,
    /// Ledger to start from if no cursor is saved
    pub start_ledger: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let contract_ids = parse_contract_ids(&env_var("CONTRACT_IDS").map_err(|_| {
            WatcherError::Config("CONTRACT_IDS environment variable is required".to_string())
        })?)?;

        Ok(Config {
            rpc_url: env_var("RPC_URL")
                .unwrap_or_else(|_| "https://soroban-testnet.stellar.org".to_string()),
            contract_ids,
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./delivery_alerts.db".to_string()),
            api_port: env_var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| WatcherError::Config("Invalid API_PORT".to_string()))?,
            poll_interval_secs: env_var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| WatcherError::Config("Invalid POLL_INTERVAL_SECS".to_string()))?,
            events_per_page: env_var("EVENTS_PER_PAGE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| WatcherError::Config("Invalid EVENTS_PER_PAGE".to_string()))?,
            start_ledger: env_var("START_LEDGER")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .map_err(|_| WatcherError::Config("Invalid START_LEDGER".to_string()))?,
        })
    }
}

/// Split a comma-separated contract ID list, trimming whitespace and
/// dropping empty entries. At least one ID must remain.
fn parse_contract_ids(raw: &str) -> Result<Vec<String>> {
    let ids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if ids.is_empty() {
        return Err(WatcherError::Config(
            "CONTRACT_IDS must contain at least one contract address".to_string(),
        ));
    }
    Ok(ids)
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| WatcherError::Config(format!("Missing env var: {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_contract_id() {
        let ids = parse_contract_ids("CSHIPPING123").unwrap();
        assert_eq!(ids, vec!["CSHIPPING123".to_string()]);
    }

    #[test]
    fn parse_multiple_contract_ids_with_whitespace() {
        let ids = parse_contract_ids(" CSHIPPING123 , CSHOPPING456 ,").unwrap();
        assert_eq!(
            ids,
            vec!["CSHIPPING123".to_string(), "CSHOPPING456".to_string()]
        );
    }

    #[test]
    fn parse_empty_contract_ids_rejected() {
        assert!(parse_contract_ids(" , ").is_err());
    }
}
