//! Operation payloads
//!
//! The sealed body of every call is `{"op": "<name>", "params": <JSON>}`.
//! Parameters are opaque here; their schemas belong to the enclave.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "params", rename_all = "kebab-case")]
pub enum Payload {
    Ping,
    CreateEoa(Value),
    ListEoa(Value),
    SignTransaction(Value),
    SignMessage(Value),
    SignTypedData(Value),
    SignStructuredMessage(Value),
    SignAuthorization(Value),
    CreateServiceAccount(Value),
    GetServiceAccount(Value),
    RotateServiceAccount(Value),
    CreateAccessToken(Value),
    ListAccessTokens(Value),
    RevokeAccessToken(Value),
}

impl Payload {
    /// Matches the `op` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::CreateEoa(_) => "create-eoa",
            Self::ListEoa(_) => "list-eoa",
            Self::SignTransaction(_) => "sign-transaction",
            Self::SignMessage(_) => "sign-message",
            Self::SignTypedData(_) => "sign-typed-data",
            Self::SignStructuredMessage(_) => "sign-structured-message",
            Self::SignAuthorization(_) => "sign-authorization",
            Self::CreateServiceAccount(_) => "create-service-account",
            Self::GetServiceAccount(_) => "get-service-account",
            Self::RotateServiceAccount(_) => "rotate-service-account",
            Self::CreateAccessToken(_) => "create-access-token",
            Self::ListAccessTokens(_) => "list-access-tokens",
            Self::RevokeAccessToken(_) => "revoke-access-token",
        }
    }

    /// Route under `/api/v1/`.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::CreateEoa(_) => "eoa/create",
            Self::ListEoa(_) => "eoa/list",
            Self::SignTransaction(_) => "sign/transaction",
            Self::SignMessage(_) => "sign/message",
            Self::SignTypedData(_) => "sign/typed-data",
            Self::SignStructuredMessage(_) => "sign/structured-message",
            Self::SignAuthorization(_) => "sign/authorization",
            Self::CreateServiceAccount(_) => "service-account/create",
            Self::GetServiceAccount(_) => "service-account/get",
            Self::RotateServiceAccount(_) => "service-account/rotate",
            Self::CreateAccessToken(_) => "access-token/create",
            Self::ListAccessTokens(_) => "access-token/list",
            Self::RevokeAccessToken(_) => "access-token/revoke",
        }
    }
}
