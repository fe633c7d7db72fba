use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialQuery {
    pub user_id: i64,
    /// e.g. `pin`, `api_key`
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCredential {
    pub user_id: i64,
    pub kind: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialUpdate {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCredential {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub reference: String,
    pub is_active: bool,
}

json_operation! {
    GetUserCredential {
        name: "get_user_credential",
        target: Credential,
        method: POST,
        path: "/get_user_credential",
        request: CredentialQuery,
        data: UserCredential,
        adapter: get_user_credential,
    }
}

json_operation! {
    CreateUserCredential {
        name: "create_user_credential",
        target: Credential,
        method: POST,
        path: "/create_user_credential",
        request: NewCredential,
        data: UserCredential,
        adapter: create_user_credential,
    }
}

json_operation! {
    UpdateUserCredential {
        name: "update_user_credential",
        target: Credential,
        method: PATCH,
        path: "/update_user_credential",
        request: CredentialUpdate,
        data: UserCredential,
        adapter: update_user_credential,
    }
}
