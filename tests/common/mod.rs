//! In-process mock enclave for bootstrap and dispatcher tests.
//!
//! Request params steer the answer:
//!   {"deny": true}     -> 403 {"error": "policy denied"}
//!   {"tamper": true}   -> sealed reply with one ciphertext bit flipped
//!   {"text": "..."}    -> sealed raw text instead of JSON
//!   {"garbage": true}  -> 200 with a non-JSON body
//!   anything else      -> sealed {"op": <op>, "params": <params>}

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use enclave_envelope::wire::SECRET_HEADER;
use enclave_envelope::{Envelope, EnvelopeCodec, Payload, PublicKey, SecretKey};
use serde_json::{json, Value};

pub enum InfoMode {
    Ok,
    Status(StatusCode),
    Body(Value),
    Page(StatusCode, String),
}

pub struct MockEnclave {
    pub key: SecretKey,
    pub secret: Option<&'static str>,
    pub info: InfoMode,
}

impl MockEnclave {
    pub fn new() -> Self {
        Self {
            key: SecretKey::random(),
            secret: None,
            info: InfoMode::Ok,
        }
    }

    pub fn with_secret(mut self, secret: &'static str) -> Self {
        self.secret = Some(secret);
        self
    }

    pub fn with_info(mut self, info: InfoMode) -> Self {
        self.info = info;
        self
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        match self.secret {
            None => true,
            Some(expected) => {
                headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok()) == Some(expected)
            }
        }
    }
}

pub fn all_payloads() -> Vec<Payload> {
    vec![
        Payload::Ping,
        Payload::CreateEoa(json!({ "label": "hot" })),
        Payload::ListEoa(json!({})),
        Payload::SignTransaction(json!({ "to": "0x01", "value": "10" })),
        Payload::SignMessage(json!({ "message": "hello" })),
        Payload::SignTypedData(json!({ "domain": { "name": "x" } })),
        Payload::SignStructuredMessage(json!({ "fields": [1, 2] })),
        Payload::SignAuthorization(json!({ "nonce": 4 })),
        Payload::CreateServiceAccount(json!({ "name": "ci" })),
        Payload::GetServiceAccount(json!({ "id": "sa-1" })),
        Payload::RotateServiceAccount(json!({ "id": "sa-1" })),
        Payload::CreateAccessToken(json!({ "scopes": ["sign"] })),
        Payload::ListAccessTokens(json!({})),
        Payload::RevokeAccessToken(json!({ "id": "tok-1" })),
    ]
}

/// Serve the mock on an ephemeral port and return its base URL.
pub async fn spawn(mock: MockEnclave) -> (String, PublicKey) {
    let public_key = mock.key.public_key();

    let mut router = Router::new().route("/api/v1/enclave", get(enclave_info));
    for payload in all_payloads() {
        router = router.route(&format!("/api/v1/{}", payload.route()), post(operation));
    }
    let app = router.with_state(Arc::new(mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), public_key)
}

/// A base URL nothing listens on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

async fn enclave_info(State(mock): State<Arc<MockEnclave>>, headers: HeaderMap) -> Response {
    if !mock.authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "unauthorized");
    }
    match &mock.info {
        InfoMode::Ok => Json(json!({ "publicKey": mock.key.public_key().to_hex() })).into_response(),
        InfoMode::Status(status) => error(*status, "unavailable"),
        InfoMode::Body(body) => Json(body.clone()).into_response(),
        InfoMode::Page(status, page) => (*status, page.clone()).into_response(),
    }
}

async fn operation(
    State(mock): State<Arc<MockEnclave>>,
    uri: Uri,
    headers: HeaderMap,
    Json(envelope): Json<Envelope>,
) -> Response {
    if !mock.authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let codec: EnvelopeCodec = EnvelopeCodec::new();
    let request = match codec.open_payload(&envelope, &mock.key).map(|p| p.as_json().cloned()) {
        Ok(Some(v)) => v,
        _ => return error(StatusCode::BAD_REQUEST, "cannot open request"),
    };
    let payload: Payload = match serde_json::from_value(request.clone()) {
        Ok(p) => p,
        Err(_) => return error(StatusCode::BAD_REQUEST, "unknown operation"),
    };
    if uri.path() != format!("/api/v1/{}", payload.route()) {
        return error(StatusCode::BAD_REQUEST, "route mismatch");
    }

    let params = request.get("params").cloned().unwrap_or(Value::Null);
    if params["deny"] == true {
        return error(StatusCode::FORBIDDEN, "policy denied");
    }
    if params["garbage"] == true {
        return (StatusCode::OK, "<html>oops</html>").into_response();
    }

    let client_key = match PublicKey::from_hex(&envelope.ephemeral_public_key) {
        Ok(k) => k,
        Err(_) => return error(StatusCode::BAD_REQUEST, "bad ephemeral key"),
    };
    let body = match params["text"].as_str() {
        Some(text) => text.as_bytes().to_vec(),
        None => serde_json::to_vec(&json!({ "op": payload.name(), "params": params })).unwrap(),
    };
    let (mut sealed, _) = codec.seal(&body, &client_key).unwrap();

    if params["tamper"] == true {
        let mut ct = hex::decode(&sealed.ciphertext).unwrap();
        ct[0] ^= 0x01;
        sealed.ciphertext = hex::encode(ct);
    }

    Json(sealed).into_response()
}
