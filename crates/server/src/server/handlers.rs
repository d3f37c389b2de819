//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use common::protocol::{ErrorResponse, HealthResponse};
use common::ServiceError;
use sealbox::CryptoError;
use tracing::warn;

use super::state::AppState;

/// `POST /crypto/encrypt`: seal the raw request body.
///
/// Responds with the JSON envelope `{"ciphertext": ..., "hmac": ...}`.
pub async fn encrypt(State(state): State<AppState>, body: Bytes) -> Response {
    match state.sealer.encode(state.key.expose(), &body) {
        Ok(envelope) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            envelope,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "encryption failed");
            error_response(&ServiceError::Internal("encryption failed".into()))
        }
    }
}

/// `POST /crypto/decrypt`: verify and open a JSON envelope.
///
/// The plaintext is returned verbatim as `application/octet-stream`. Every
/// decoding or authentication failure, including a body that is not UTF-8,
/// produces the same `400` body.
pub async fn decrypt(State(state): State<AppState>, body: Bytes) -> Response {
    match state.sealer.decode_bytes(state.key.expose(), &body) {
        Ok(plaintext) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            plaintext,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "decryption failed");
            error_response(&classify(&e))
        }
    }
}

/// `GET /health`: liveness check reporting the configured suite.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        suite: state.sealer.suite(),
        tag_len: state.sealer.tag_len(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn classify(err: &CryptoError) -> ServiceError {
    if err.is_rejection() {
        ServiceError::Rejected
    } else {
        ServiceError::Internal("decryption failed".into())
    }
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::routing::{get, post};
    use axum::Router;
    use axum_test::TestServer;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use common::Envelope;
    use sealbox::{SealedMessage, Sealer};

    use crate::key::KeyBytes;

    mockall::mock! {
        pub TestSealer {}

        impl Sealer for TestSealer {
            fn suite(&self) -> String;
            fn tag_len(&self) -> usize;
            fn seal(&self, key: &[u8], plaintext: &[u8]) -> Result<SealedMessage, CryptoError>;
            fn open(&self, key: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, CryptoError>;
            fn encode(&self, key: &[u8], plaintext: &[u8]) -> Result<String, CryptoError>;
            fn decode(&self, key: &[u8], text: &str) -> Result<Vec<u8>, CryptoError>;
            fn decode_bytes(&self, key: &[u8], bytes: &[u8]) -> Result<Vec<u8>, CryptoError>;
        }
    }

    fn test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route("/crypto/encrypt", post(encrypt))
            .route("/crypto/decrypt", post(decrypt))
            .route("/health", get(health))
            .fallback(not_found)
            .with_state(state);
        TestServer::new(app).unwrap()
    }

    fn mocked(sealer: MockTestSealer) -> AppState {
        AppState::new(Arc::new(sealer), KeyBytes::from([0u8; 16]))
    }

    async fn seal_hello(server: &TestServer) -> Envelope {
        server
            .post("/crypto/encrypt")
            .bytes(Bytes::from_static(b"hello"))
            .expect_success()
            .await
            .json::<Envelope>()
    }

    #[tokio::test]
    async fn encrypt_returns_envelope() {
        let server = test_server(AppState::default());
        let envelope = seal_hello(&server).await;

        let ciphertext = STANDARD.decode(&envelope.ciphertext).unwrap();
        let tag = STANDARD.decode(&envelope.hmac).unwrap();
        assert_eq!(ciphertext.len(), 16 + 5);
        assert_eq!(tag.len(), 32);
    }

    #[tokio::test]
    async fn encrypt_then_decrypt_returns_plaintext() {
        let server = test_server(AppState::default());
        let envelope = seal_hello(&server).await;

        let response = server
            .post("/crypto/decrypt")
            .json(&envelope)
            .expect_success()
            .await;
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/octet-stream"
        );
        assert_eq!(response.as_bytes().as_ref(), b"hello");
    }

    #[tokio::test]
    async fn encrypting_twice_differs() {
        let server = test_server(AppState::default());
        let a = seal_hello(&server).await;
        let b = seal_hello(&server).await;
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_ne!(a.hmac, b.hmac);
    }

    #[tokio::test]
    async fn tampered_tag_is_rejected() {
        let server = test_server(AppState::default());
        let mut envelope = seal_hello(&server).await;
        let mut tag = STANDARD.decode(&envelope.hmac).unwrap();
        tag[0] ^= 0x01;
        envelope.hmac = STANDARD.encode(tag);

        let response = server
            .post("/crypto/decrypt")
            .json(&envelope)
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorResponse>().code, "rejected");
    }

    #[tokio::test]
    async fn rejections_are_indistinguishable() {
        let server = test_server(AppState::default());
        let mut envelope = seal_hello(&server).await;
        let mut ciphertext = STANDARD.decode(&envelope.ciphertext).unwrap();
        ciphertext[20] ^= 0x80;
        envelope.ciphertext = STANDARD.encode(ciphertext);

        let tampered = server
            .post("/crypto/decrypt")
            .json(&envelope)
            .expect_failure()
            .await;
        let garbage = server
            .post("/crypto/decrypt")
            .text("not json")
            .expect_failure()
            .await;
        let bad_base64 = server
            .post("/crypto/decrypt")
            .text(r#"{"ciphertext":"***","hmac":"***"}"#)
            .expect_failure()
            .await;

        assert_eq!(tampered.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(tampered.text(), garbage.text());
        assert_eq!(tampered.text(), bad_base64.text());
    }

    #[tokio::test]
    async fn non_utf8_body_is_rejected() {
        let server = test_server(AppState::default());
        let response = server
            .post("/crypto/decrypt")
            .bytes(Bytes::from_static(&[0xff, 0xfe, 0xfd]))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_suite() {
        let server = test_server(AppState::default());
        let body = server
            .get("/health")
            .expect_success()
            .await
            .json::<HealthResponse>();
        assert_eq!(body.status, "ok");
        assert_eq!(body.suite, "aes-cfb-hmac-sha256");
        assert_eq!(body.tag_len, 32);
    }

    #[tokio::test]
    async fn encrypt_failure_is_internal_error() {
        let mut sealer = MockTestSealer::new();
        sealer
            .expect_encode()
            .returning(|_, _| Err(CryptoError::RandomSource("entropy unavailable".into())));
        let server = test_server(mocked(sealer));

        let response = server
            .post("/crypto/encrypt")
            .bytes(Bytes::from_static(b"hello"))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let err = response.json::<ErrorResponse>();
        assert_eq!(err.code, "internal_error");
        assert!(!err.message.contains("entropy"));
    }

    #[tokio::test]
    async fn key_error_on_decrypt_is_internal_error() {
        let mut sealer = MockTestSealer::new();
        sealer
            .expect_decode_bytes()
            .returning(|_, _| Err(CryptoError::InvalidKey { len: 5 }));
        let server = test_server(mocked(sealer));

        let response = server
            .post("/crypto/decrypt")
            .text("{}")
            .expect_failure()
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn decrypt_passes_raw_body_to_sealer() {
        let mut sealer = MockTestSealer::new();
        sealer
            .expect_decode_bytes()
            .withf(|key, body| key.len() == 16 && body == b"envelope".as_slice())
            .times(1)
            .returning(|_, _| Ok(b"opened".to_vec()));
        let server = test_server(mocked(sealer));

        let response = server
            .post("/crypto/decrypt")
            .text("envelope")
            .expect_success()
            .await;
        assert_eq!(response.as_bytes().as_ref(), b"opened");
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = test_server(AppState::default());
        let response = server.get("/crypto").expect_failure().await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<ErrorResponse>().code, "not_found");
    }
}
