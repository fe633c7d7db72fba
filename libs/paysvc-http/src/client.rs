use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use tower::Service;
use tower::buffer::Buffer;

pub(crate) type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

pub(crate) type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// Outbound HTTP client.
///
/// `Clone + Send + Sync`; clones share one connection pool through the
/// internal tower `Buffer`, so callers keep it by value without any lock.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
}

impl HttpClient {
    /// Start a request with an arbitrary method.
    ///
    /// `url` must be absolute (scheme and host); it is validated on send.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            self.transport_security,
            method,
            url.to_owned(),
        )
    }
}

/// Unwrap the inner `HttpError` from a buffer error; anything else means the
/// buffer worker is gone.
pub(crate) fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(error = %err, "buffer worker closed unexpectedly");
            HttpError::ServiceClosed
        }
    }
}

/// Poll the buffer once; a full buffer fails fast with `Overloaded`.
pub(crate) async fn try_acquire_buffer_slot(
    service: &mut BufferedService,
) -> Result<(), HttpError> {
    use std::task::Poll;

    let ready = std::future::poll_fn(|cx| match service.poll_ready(cx) {
        Poll::Ready(result) => Poll::Ready(Some(result)),
        Poll::Pending => Poll::Ready(None),
    })
    .await;

    match ready {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(map_buffer_error(e)),
        None => Err(HttpError::Overloaded),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::builder::HttpClientBuilder;
    use crate::config::HttpClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn client_with(config: HttpClientConfig) -> HttpClient {
        HttpClientBuilder::with_config(config).build().unwrap()
    }

    fn test_client() -> HttpClient {
        client_with(HttpClientConfig {
            transport: TransportSecurity::AllowInsecureHttp,
            ..HttpClientConfig::default()
        })
    }

    #[tokio::test]
    async fn post_sends_headers_and_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/get_user")
                .header("content-type", "application/json")
                .json_body(json!({"id": 7}));
            then.status(200).json_body(json!({"data": {"id": 7}}));
        });

        let resp = test_client()
            .request(Method::POST, &server.url("/get_user"))
            .headers([("content-type", "application/json")])
            .body_bytes(Bytes::from_static(br#"{"id":7}"#))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&resp.bytes().await.unwrap()).unwrap();
        assert_eq!(body["data"]["id"], 7);
        mock.assert();
    }

    #[tokio::test]
    async fn headers_are_forwarded_in_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/get_access_token")
                .header("v-app", "app-key")
                .header("x-request-id", "r-1");
            then.status(200);
        });

        test_client()
            .request(Method::GET, &server.url("/get_access_token"))
            .headers([("v-app", "app-key"), ("x-request-id", "r-1")])
            .send()
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn non_2xx_is_a_completed_exchange() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body(r#"{"status":"error","message":"not found"}"#);
        });

        let resp = test_client()
            .request(Method::GET, &server.url("/missing"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        let body = resp.bytes().await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("not found"));
    }

    #[tokio::test]
    async fn body_limit_is_enforced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/large");
            then.status(200).body("x".repeat(4096));
        });

        let client = client_with(HttpClientConfig {
            transport: TransportSecurity::AllowInsecureHttp,
            max_body_size: 1024,
            ..HttpClientConfig::default()
        });
        let result = client
            .request(Method::GET, &server.url("/large"))
            .send()
            .await
            .unwrap()
            .bytes()
            .await;

        assert!(matches!(
            result,
            Err(HttpError::BodyTooLarge { limit: 1024, .. })
        ));
    }

    #[tokio::test]
    async fn gzip_body_is_decompressed() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"data":true}"#).unwrap();
        let compressed = encoder.finish().unwrap();

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/validate_on_db");
            then.status(200)
                .header("content-encoding", "gzip")
                .body(compressed);
        });

        let body = test_client()
            .request(Method::POST, &server.url("/validate_on_db"))
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"data":true}"#);
    }

    #[tokio::test]
    async fn slow_server_hits_request_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        });

        let client = client_with(HttpClientConfig {
            transport: TransportSecurity::AllowInsecureHttp,
            request_timeout: Duration::from_millis(50),
            ..HttpClientConfig::default()
        });
        let result = client
            .request(Method::GET, &server.url("/slow"))
            .send()
            .await;

        assert!(matches!(result, Err(HttpError::Timeout(_))));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Nothing listens on port 9 (discard) in test environments.
        let result = test_client()
            .request(Method::GET, "http://127.0.0.1:9/")
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::Transport(_))));
    }

    #[tokio::test]
    async fn http_rejected_when_tls_only() {
        let client = client_with(HttpClientConfig::default());
        let result = client
            .request(Method::POST, "http://auth.internal/get_user")
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::InvalidScheme { .. })));
    }

    #[tokio::test]
    async fn relative_url_is_rejected() {
        let result = test_client().request(Method::POST, "/get_user").send().await;
        assert!(matches!(
            result,
            Err(HttpError::InvalidUri {
                kind: crate::InvalidUriKind::MissingAuthority,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn invalid_header_is_deferred_to_send() {
        let result = test_client()
            .request(Method::GET, "http://localhost/")
            .headers([("bad header", "v")])
            .send()
            .await;
        assert!(matches!(result, Err(HttpError::InvalidHeaderName(_))));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<HttpClient>();
    }
}
