//! Closed set of operations reachable by name.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ServiceClients;
use crate::error::CallError;
use crate::operation::{CallOptions, Operation, Target};
use crate::operations::auth::{
    GetAccessToken, GetBankDetails, GetBusinessProfile, GetCountry, GetUser, GetUserProfile,
    ValidateAuthorization, ValidateOnAuth,
};
use crate::operations::authorization::{CreateAuthorize, GetAuthorize, UpdateAuthorize};
use crate::operations::credential::{
    CreateUserCredential, GetUserCredential, UpdateUserCredential,
};
use crate::operations::rave::RaveResolveBankAccount;
use crate::operations::wallet::{CreateWalletBalance, GetWalletBalance, UpdateWalletBalance};

/// Static description of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationInfo {
    pub name: &'static str,
    pub target: Target,
    pub method: Method,
    pub path: &'static str,
    pub sends_body: bool,
}

impl OperationInfo {
    #[must_use]
    pub fn of<O: Operation>() -> Self {
        Self {
            name: O::NAME,
            target: O::TARGET,
            method: O::METHOD,
            path: O::PATH,
            sends_body: O::SENDS_BODY,
        }
    }
}

macro_rules! operation_table {
    ($( $variant:ident => $op:ty ),+ $(,)?) => {
        /// A request payload tagged with its operation name.
        ///
        /// Wire form: `{"operation": "<name>", "payload": <request>}`. An
        /// unknown name or a payload of the wrong shape fails to deserialize.
        #[derive(Debug, Serialize, Deserialize)]
        #[serde(tag = "operation", content = "payload", rename_all = "snake_case")]
        pub enum OperationPayload {
            $( $variant(<$op as Operation>::Request), )+
        }

        impl OperationPayload {
            #[must_use]
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => <$op as Operation>::NAME, )+
                }
            }

            pub(crate) async fn dispatch(
                self,
                clients: &ServiceClients,
                options: &CallOptions,
            ) -> Result<Value, CallError> {
                match self {
                    $( Self::$variant(request) => clients.call_value::<$op>(&request, options).await, )+
                }
            }
        }

        /// Every operation, in table order.
        #[must_use]
        pub fn operations() -> Vec<OperationInfo> {
            vec![ $( OperationInfo::of::<$op>(), )+ ]
        }
    };
}

operation_table! {
    GetUser => GetUser,
    GetUserProfile => GetUserProfile,
    GetBusinessProfile => GetBusinessProfile,
    GetCountry => GetCountry,
    GetBankDetails => GetBankDetails,
    GetAccessToken => GetAccessToken,
    ValidateOnAuth => ValidateOnAuth,
    ValidateAuthorization => ValidateAuthorization,
    GetUserCredential => GetUserCredential,
    CreateUserCredential => CreateUserCredential,
    UpdateUserCredential => UpdateUserCredential,
    GetWalletBalance => GetWalletBalance,
    CreateWalletBalance => CreateWalletBalance,
    UpdateWalletBalance => UpdateWalletBalance,
    GetAuthorize => GetAuthorize,
    CreateAuthorize => CreateAuthorize,
    UpdateAuthorize => UpdateAuthorize,
    RaveResolveBankAccount => RaveResolveBankAccount,
}

/// Look up one operation by name.
#[must_use]
pub fn find_operation(name: &str) -> Option<OperationInfo> {
    operations().into_iter().find(|info| info.name == name)
}
