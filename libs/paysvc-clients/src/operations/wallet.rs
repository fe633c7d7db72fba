//! Wallet service balances. Amounts are integers in minor currency units.

use std::fmt;
use std::str::FromStr;

use http::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ServiceClients;
use crate::error::CallError;
use crate::operation::{Operation, Target};

/// ISO 4217 alphabetic currency code, held upper-cased.
///
/// Only three ASCII letters are accepted, so the value is always safe to
/// place in a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("currency must be three ASCII letters, got {0:?}")]
pub struct InvalidCurrency(String);

impl CurrencyCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = InvalidCurrency;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() == 3 && value.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(value.to_ascii_uppercase()))
        } else {
            Err(InvalidCurrency(value.to_owned()))
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup key of one balance; travels in the URL, not the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalletBalanceQuery {
    pub account_id: u64,
    pub currency: CurrencyCode,
}

impl WalletBalanceQuery {
    /// `/{account_id}/{CURRENCY}`
    #[must_use]
    pub fn path_suffix(&self) -> String {
        format!("/{}/{}", self.account_id, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewWalletBalance {
    pub account_id: u64,
    pub currency: String,
    #[serde(default)]
    pub available_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalletBalanceUpdate {
    pub account_id: u64,
    pub currency: String,
    pub available_balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_balance: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletBalance {
    pub id: i64,
    pub account_id: u64,
    pub currency: String,
    pub available_balance: i64,
    pub ledger_balance: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct GetWalletBalance;

impl Operation for GetWalletBalance {
    type Request = WalletBalanceQuery;
    type Data = WalletBalance;
    type Output = WalletBalance;

    const NAME: &'static str = "get_wallet_balance";
    const TARGET: Target = Target::Wallet;
    const METHOD: Method = Method::GET;
    const PATH: &'static str = "/wallet_balance";
    const SENDS_BODY: bool = false;

    fn path_suffix(request: &Self::Request) -> Option<String> {
        Some(request.path_suffix())
    }

    fn extract(data: Self::Data) -> Self::Output {
        data
    }
}

impl ServiceClients {
    /// Balance of `account_id` in `currency` (case-insensitive).
    ///
    /// # Errors
    /// [`CallError::RequestFormat`] without any I/O when `currency` is not a
    /// three-letter code; otherwise see [`CallError`].
    pub async fn get_wallet_balance(
        &self,
        account_id: u64,
        currency: &str,
    ) -> Result<WalletBalance, CallError> {
        let currency = currency.parse::<CurrencyCode>().map_err(|err| {
            tracing::error!(
                operation = GetWalletBalance::NAME,
                currency,
                error = %err,
                "Payload does not match operation"
            );
            CallError::RequestFormat {
                operation: GetWalletBalance::NAME.to_owned(),
                source: <serde_json::Error as serde::de::Error>::custom(err),
            }
        })?;
        let query = WalletBalanceQuery {
            account_id,
            currency,
        };
        self.call::<GetWalletBalance>(&query).await
    }
}

json_operation! {
    CreateWalletBalance {
        name: "create_wallet_balance",
        target: Wallet,
        method: POST,
        path: "/create_wallet_balance",
        request: NewWalletBalance,
        data: WalletBalance,
        adapter: create_wallet_balance,
    }
}

json_operation! {
    UpdateWalletBalance {
        name: "update_wallet_balance",
        target: Wallet,
        method: PATCH,
        path: "/update_wallet_balance",
        request: WalletBalanceUpdate,
        data: WalletBalance,
        adapter: update_wallet_balance,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn query(account_id: u64, currency: &str) -> WalletBalanceQuery {
        WalletBalanceQuery {
            account_id,
            currency: currency.parse().unwrap(),
        }
    }

    #[test]
    fn suffix_uppercases_currency() {
        assert_eq!(
            GetWalletBalance::path_suffix(&query(42, "usd")).as_deref(),
            Some("/42/USD")
        );
        assert_eq!(query(7, "NgN").path_suffix(), "/7/NGN");
    }

    #[test]
    fn suffix_uses_plain_decimal_account_id() {
        assert_eq!(query(0, "eur").path_suffix(), "/0/EUR");
        assert_eq!(
            query(u64::MAX, "gbp").path_suffix(),
            "/18446744073709551615/GBP"
        );
    }

    #[test]
    fn currency_accepts_only_three_letters() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap().as_str(), "USD");
        for bad in ["usd/../../get_access_token", "us d?x=1", "US", "USDT", "U$D", "", "ÜSD"] {
            assert!(bad.parse::<CurrencyCode>().is_err(), "{bad:?} accepted");
        }
    }

    #[test]
    fn currency_is_checked_during_deserialization() {
        let ok: WalletBalanceQuery =
            serde_json::from_str(r#"{"account_id":42,"currency":"ngn"}"#).unwrap();
        assert_eq!(ok.path_suffix(), "/42/NGN");
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"account_id": 42, "currency": "NGN"})
        );

        let err = serde_json::from_str::<WalletBalanceQuery>(
            r#"{"account_id":42,"currency":"usd/../x"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("three ASCII letters"), "{err}");
    }

    #[test]
    fn lookup_has_no_body() {
        assert!(!GetWalletBalance::SENDS_BODY);
        assert_eq!(GetWalletBalance::METHOD, Method::GET);
    }
}
