//! Auth service: users, profiles, reference data and token checks.

use std::fmt;

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::ServiceClients;
use crate::error::CallError;
use crate::operation::{Operation, Target};
use crate::secret::REDACTED;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserQuery {
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryQuery {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
}

/// Existence check of one value in the auth database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DbValidation {
    pub table: String,
    pub column: String,
    pub value: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizationCheck {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub user_id: i64,
    pub country_id: i64,
    pub address: String,
    pub date_of_birth: String,
    pub kyc_level: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub user_id: i64,
    pub business_name: String,
    pub registration_number: String,
    pub country_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankDetail {
    pub user_id: i64,
    pub account_name: String,
    pub account_number: String,
    pub bank_code: String,
    pub bank_name: String,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl fmt::Debug for AuthorizationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCheck")
            .field("token", &REDACTED)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &REDACTED)
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// `data` of `validate_authorization`; only `status` is surfaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationStatus {
    pub status: bool,
}

json_operation! {
    GetUser {
        name: "get_user",
        target: Auth,
        method: POST,
        path: "/get_user",
        request: UserQuery,
        data: User,
        adapter: get_user,
    }
}

json_operation! {
    GetUserProfile {
        name: "get_user_profile",
        target: Auth,
        method: POST,
        path: "/get_user_profile",
        request: UserQuery,
        data: UserProfile,
        adapter: get_user_profile,
    }
}

json_operation! {
    GetBusinessProfile {
        name: "get_business_profile",
        target: Auth,
        method: POST,
        path: "/get_business_profile",
        request: UserQuery,
        data: BusinessProfile,
        adapter: get_business_profile,
    }
}

json_operation! {
    GetCountry {
        name: "get_country",
        target: Auth,
        method: POST,
        path: "/get_country",
        request: CountryQuery,
        data: Country,
        adapter: get_country,
    }
}

json_operation! {
    GetBankDetails {
        name: "get_bank_details",
        target: Auth,
        method: POST,
        path: "/get_bank_detail",
        request: UserQuery,
        data: BankDetail,
        adapter: get_bank_details,
    }
}

json_operation! {
    /// `data` is a bare boolean.
    ValidateOnAuth {
        name: "validate_on_auth",
        target: Auth,
        method: POST,
        path: "/validate_on_db",
        request: DbValidation,
        data: bool,
        adapter: validate_on_auth,
    }
}

/// Service access token; a plain `GET` with no body.
#[derive(Debug, Clone, Copy)]
pub struct GetAccessToken;

impl Operation for GetAccessToken {
    type Request = ();
    type Data = AccessToken;
    type Output = AccessToken;

    const NAME: &'static str = "get_access_token";
    const TARGET: Target = Target::Auth;
    const METHOD: Method = Method::GET;
    const PATH: &'static str = "/get_access_token";
    const SENDS_BODY: bool = false;

    fn extract(data: Self::Data) -> Self::Output {
        data
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ValidateAuthorization;

impl Operation for ValidateAuthorization {
    type Request = AuthorizationCheck;
    type Data = AuthorizationStatus;
    type Output = bool;

    const NAME: &'static str = "validate_authorization";
    const TARGET: Target = Target::Auth;
    const METHOD: Method = Method::POST;
    const PATH: &'static str = "/validate_authorization";

    fn extract(data: Self::Data) -> Self::Output {
        data.status
    }
}

impl ServiceClients {
    /// # Errors
    /// See [`CallError`].
    pub async fn get_access_token(&self) -> Result<AccessToken, CallError> {
        self.call::<GetAccessToken>(&()).await
    }

    /// Whether the auth service accepts `check.token`.
    ///
    /// # Errors
    /// See [`CallError`].
    pub async fn validate_authorization(
        &self,
        check: &AuthorizationCheck,
    ) -> Result<bool, CallError> {
        self.call::<ValidateAuthorization>(check).await
    }
}
