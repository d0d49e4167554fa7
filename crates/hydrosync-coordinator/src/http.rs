//! Shared hyper plumbing for the node and scheduler clients.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;

pub(crate) type LegacyClient = Client<HttpConnector, Full<Bytes>>;

/// Per-request timeout for node and scheduler calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client() -> LegacyClient {
    Client::builder(TokioExecutor::new()).build_http()
}

/// Issue a body-less request and collect the response as text.
///
/// Transport failures and timeouts come back as the error string; callers
/// map them into their own error types.
pub(crate) async fn request_text(
    client: &LegacyClient,
    method: &str,
    url: &str,
) -> Result<(http::StatusCode, String), String> {
    let req = http::Request::builder()
        .method(method)
        .uri(url)
        .header("user-agent", "hydrosync/0.1")
        .body(Full::new(Bytes::new()))
        .map_err(|e| e.to_string())?;

    let resp = tokio::time::timeout(REQUEST_TIMEOUT, client.request(req))
        .await
        .map_err(|_| format!("request to {url} timed out"))?
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| e.to_string())?
        .to_bytes();
    Ok((status, String::from_utf8_lossy(&body).into_owned()))
}
