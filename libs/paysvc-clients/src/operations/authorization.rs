use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizeQuery {
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAuthorize {
    pub user_id: i64,
    pub reference: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorizeUpdate {
    pub reference: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorize {
    pub id: i64,
    pub user_id: i64,
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    pub channel: String,
    pub status: String,
}

json_operation! {
    GetAuthorize {
        name: "get_authorize",
        target: Authorization,
        method: POST,
        path: "/get_authorize",
        request: AuthorizeQuery,
        data: Authorize,
        adapter: get_authorize,
    }
}

json_operation! {
    CreateAuthorize {
        name: "create_authorize",
        target: Authorization,
        method: POST,
        path: "/create_authorize",
        request: NewAuthorize,
        data: Authorize,
        adapter: create_authorize,
    }
}

json_operation! {
    UpdateAuthorize {
        name: "update_authorize",
        target: Authorization,
        method: PATCH,
        path: "/update_authorize",
        request: AuthorizeUpdate,
        data: Authorize,
        adapter: update_authorize,
    }
}
