use std::env;
use std::time::Duration;

use crate::axelarscan::DEFAULT_API_BASE;

/// The two ITS executor contracts tracked by default: the EVM Interchain
/// Token Service and the Axelar ITS Hub.
const DEFAULT_ITS_CONTRACTS: &str = "Interchain Token Service=0xB5FB4BE02232B1bBA4dC8f81dc24C26980dE9e3C,\
     Axelar ITS Hub=axelar1aqcj54lzz0rk22gvqgcn8fr5tx4rzwdv5wv5j9dmnacgefvd7wzsy2j2mr";

/// One tracked ITS contract with its dashboard label.
#[derive(Debug, Clone)]
pub struct ItsContract {
    pub label: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    pub axelarscan_api_url: String,
    pub its_contracts: Vec<ItsContract>,

    pub http_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub search_page_size: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let contracts_raw =
            env::var("ITS_CONTRACT_ADDRESSES").unwrap_or_else(|_| DEFAULT_ITS_CONTRACTS.into());
        let its_contracts = parse_contracts(&contracts_raw);
        if its_contracts.is_empty() {
            anyhow::bail!("ITS_CONTRACT_ADDRESSES must list at least one contract");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            axelarscan_api_url: env::var("AXELARSCAN_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
            its_contracts,

            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .unwrap_or(30),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),
            search_page_size: env::var("SEARCH_PAGE_SIZE")
                .unwrap_or_else(|_| "1000".into())
                .parse()
                .unwrap_or(1000),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// ILIKE patterns matching any tracked ITS contract address.
    pub fn contract_patterns(&self) -> Vec<String> {
        self.its_contracts
            .iter()
            .map(|c| format!("%{}%", c.address))
            .collect()
    }
}

/// Parse a comma-separated list of `Label=address` entries; a bare
/// address doubles as its own label.
fn parse_contracts(raw: &str) -> Vec<ItsContract> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((label, address)) => ItsContract {
                label: label.trim().to_string(),
                address: address.trim().to_string(),
            },
            None => ItsContract {
                label: entry.to_string(),
                address: entry.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contracts_defaults() {
        let contracts = parse_contracts(DEFAULT_ITS_CONTRACTS);
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].label, "Interchain Token Service");
        assert!(contracts[0].address.starts_with("0xB5FB"));
        assert_eq!(contracts[1].label, "Axelar ITS Hub");
    }

    #[test]
    fn test_parse_contracts_bare_address() {
        let contracts = parse_contracts("0xabc, Label=0xdef ,");
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].label, "0xabc");
        assert_eq!(contracts[0].address, "0xabc");
        assert_eq!(contracts[1].label, "Label");
        assert_eq!(contracts[1].address, "0xdef");
    }
}
