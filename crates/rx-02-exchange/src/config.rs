//! Exchange configuration
//!
//! Timing constants and role addresses. Defaults are the production
//! constants; every timing can be overridden from the environment.

use crate::error::{ExchangeError, ExchangeResult};
use serde::{Deserialize, Serialize};
use shared_types::{address_hex, is_zero_address, parse_address, Address, ZERO_ADDRESS};
use std::env;

const DAY: u64 = 24 * 60 * 60;

/// Exchange configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Age (seconds) after which an unprocessed request forces withdrawal mode
    pub max_age_request_until_withdraw_mode: u64,
    /// Age (seconds) after which a block batch must include a request
    pub max_age_request_until_forced: u64,
    /// Fixed part of the shutdown allowance (seconds)
    pub max_time_in_shutdown_base: u64,
    /// Per-account part of the shutdown allowance (seconds)
    pub max_time_in_shutdown_delta: u64,
    /// May call `shutdown`
    pub owner: Address,
    /// May call `submit_blocks`
    pub operator: Address,
    /// Receives withdrawals of the protocol fee account
    pub protocol_fee_vault: Address,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_age_request_until_withdraw_mode: 15 * DAY,
            max_age_request_until_forced: 14 * DAY,
            max_time_in_shutdown_base: 30 * DAY,
            max_time_in_shutdown_delta: 1,
            owner: ZERO_ADDRESS,
            operator: ZERO_ADDRESS,
            protocol_fee_vault: ZERO_ADDRESS,
        }
    }
}

impl ExchangeConfig {
    /// Production timings with the given roles.
    pub fn with_roles(owner: Address, operator: Address, protocol_fee_vault: Address) -> Self {
        Self {
            owner,
            operator,
            protocol_fee_vault,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RX_MAX_AGE_REQUEST_UNTIL_WITHDRAW_MODE`: seconds (default: 15 days)
    /// - `RX_MAX_AGE_REQUEST_UNTIL_FORCED`: seconds (default: 14 days)
    /// - `RX_MAX_TIME_IN_SHUTDOWN_BASE`: seconds (default: 30 days)
    /// - `RX_MAX_TIME_IN_SHUTDOWN_DELTA`: seconds per account (default: 1)
    /// - `RX_OWNER`, `RX_OPERATOR`, `RX_PROTOCOL_FEE_VAULT`: hex addresses
    ///
    /// Unset variables keep their defaults; malformed ones are rejected.
    pub fn from_env() -> ExchangeResult<Self> {
        let defaults = Self::default();
        let config = Self {
            max_age_request_until_withdraw_mode: env_seconds(
                "RX_MAX_AGE_REQUEST_UNTIL_WITHDRAW_MODE",
                defaults.max_age_request_until_withdraw_mode,
            )?,
            max_age_request_until_forced: env_seconds(
                "RX_MAX_AGE_REQUEST_UNTIL_FORCED",
                defaults.max_age_request_until_forced,
            )?,
            max_time_in_shutdown_base: env_seconds(
                "RX_MAX_TIME_IN_SHUTDOWN_BASE",
                defaults.max_time_in_shutdown_base,
            )?,
            max_time_in_shutdown_delta: env_seconds(
                "RX_MAX_TIME_IN_SHUTDOWN_DELTA",
                defaults.max_time_in_shutdown_delta,
            )?,
            owner: env_address("RX_OWNER", defaults.owner)?,
            operator: env_address("RX_OPERATOR", defaults.operator)?,
            protocol_fee_vault: env_address("RX_PROTOCOL_FEE_VAULT", defaults.protocol_fee_vault)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations under which the fallback guarantees break.
    ///
    /// The forced deadline must fall strictly before the withdrawal-mode
    /// deadline, otherwise an honest operator cannot avoid withdrawal mode.
    pub fn validate(&self) -> ExchangeResult<()> {
        if self.max_age_request_until_withdraw_mode == 0 {
            return Err(invalid("max_age_request_until_withdraw_mode must be non-zero"));
        }
        if self.max_age_request_until_forced >= self.max_age_request_until_withdraw_mode {
            return Err(invalid(
                "max_age_request_until_forced must be below max_age_request_until_withdraw_mode",
            ));
        }
        if is_zero_address(&self.owner) || is_zero_address(&self.operator) {
            return Err(invalid("owner and operator must be set"));
        }
        if is_zero_address(&self.protocol_fee_vault) {
            return Err(invalid("protocol_fee_vault must be set"));
        }
        Ok(())
    }

    /// Shutdown allowance for `num_accounts` accounts.
    pub fn shutdown_allowance(&self, num_accounts: u32) -> u64 {
        self.max_time_in_shutdown_delta
            .saturating_mul(num_accounts as u64)
            .saturating_add(self.max_time_in_shutdown_base)
    }

    pub fn describe_roles(&self) -> String {
        format!(
            "owner={} operator={} fee_vault={}",
            address_hex(&self.owner),
            address_hex(&self.operator),
            address_hex(&self.protocol_fee_vault)
        )
    }
}

fn invalid(reason: &str) -> ExchangeError {
    ExchangeError::InvalidConfig {
        reason: reason.to_string(),
    }
}

fn env_seconds(key: &str, default: u64) -> ExchangeResult<u64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| invalid(&format!("{key} is not a number of seconds: {value}"))),
        Err(_) => Ok(default),
    }
}

fn env_address(key: &str, default: Address) -> ExchangeResult<Address> {
    match env::var(key) {
        Ok(value) => parse_address(value.trim())
            .ok_or_else(|| invalid(&format!("{key} is not an address: {value}"))),
        Err(_) => Ok(default),
    }
}
