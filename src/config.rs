//! Environment configuration
//!
//! Settings are read from the process environment, after loading a `.env`
//! file from the working directory if one exists.
//!
//! | Variable                   | Required | Default                      |
//! |----------------------------|----------|------------------------------|
//! | `ORIGIN_RPC_URL`           | yes      |                              |
//! | `DESTINATION_RPC_URL`      | yes      |                              |
//! | `FACILITATOR_ADDRESS`      | yes      |                              |
//! | `ACROSS_API_URL`           | no       | `https://app.across.to/api`  |
//! | `NOTIFICATION_URL`         | no       | `http://localhost:3001`      |
//! | `OFFSET_TEAM_ADDRESS`      | no       |                              |
//! | `TRANSACTION_HISTORY_PATH` | no       |                              |

use alloy_primitives::Address;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use crate::error::{OffsetZapError, Result};
use crate::providers::{ACROSS_API, DEFAULT_NOTIFICATION_URL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetZapConfig {
    pub origin_rpc_url: Url,
    pub destination_rpc_url: Url,
    pub across_api_url: Url,
    pub notification_url: Url,
    /// Facilitator contract on the destination chain
    pub facilitator: Address,
    /// Owner account used for Facilitator withdrawals
    pub offset_team: Option<Address>,
    pub history_path: Option<PathBuf>,
}

impl OffsetZapConfig {
    /// Loads `.env` if present, then reads the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), event = "dotenv_loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| OffsetZapError::InvalidConfig(format!("{key} is not set")))
        };

        Ok(Self {
            origin_rpc_url: parse_url("ORIGIN_RPC_URL", &required("ORIGIN_RPC_URL")?)?,
            destination_rpc_url: parse_url(
                "DESTINATION_RPC_URL",
                &required("DESTINATION_RPC_URL")?,
            )?,
            across_api_url: parse_url(
                "ACROSS_API_URL",
                &get("ACROSS_API_URL").unwrap_or_else(|| ACROSS_API.to_string()),
            )?,
            notification_url: parse_url(
                "NOTIFICATION_URL",
                &get("NOTIFICATION_URL").unwrap_or_else(|| DEFAULT_NOTIFICATION_URL.to_string()),
            )?,
            facilitator: parse_address("FACILITATOR_ADDRESS", &required("FACILITATOR_ADDRESS")?)?,
            offset_team: get("OFFSET_TEAM_ADDRESS")
                .map(|value| parse_address("OFFSET_TEAM_ADDRESS", &value))
                .transpose()?,
            history_path: get("TRANSACTION_HISTORY_PATH").map(PathBuf::from),
        })
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value.trim())
        .map_err(|e| OffsetZapError::InvalidConfig(format!("{key} is not a valid URL: {e}")))
}

fn parse_address(key: &str, value: &str) -> Result<Address> {
    value
        .trim()
        .parse()
        .map_err(|e| OffsetZapError::InvalidConfig(format!("{key} is not a valid address: {e}")))
}
