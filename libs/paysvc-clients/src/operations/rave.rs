//! Rave (Flutterwave) payment gateway. Authenticated with the bearer secret.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveAccountRequest {
    pub account_number: String,
    /// Bank code, e.g. `044`.
    pub account_bank: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedAccount {
    pub account_number: String,
    pub account_name: String,
}

json_operation! {
    /// Resolve the holder name of a bank account.
    RaveResolveBankAccount {
        name: "rave_resolve_bank_account",
        target: Rave,
        method: POST,
        path: "/accounts/resolve",
        request: ResolveAccountRequest,
        data: ResolvedAccount,
        adapter: rave_resolve_bank_account,
    }
}
