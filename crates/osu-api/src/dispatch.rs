//! Request dispatch
//!
//! Every API call funnels through `Dispatcher::dispatch`:
//! rate budget -> token validity -> transport checkout -> HTTP call ->
//! transport release -> status check -> context merge -> typed decode.
//!
//! Only the limiter wait and the credential refresh can suspend a call before
//! it reaches the network; neither holds a lock across the HTTP request.

use std::sync::Arc;

use osu_auth::CredentialHolder;
use osu_transport::{RateLimiter, TransportHandle, TransportPool};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::request::RequestSpec;

/// Shared per-client dispatch state: limiter, credential and transport.
pub struct Dispatcher {
    limiter: RateLimiter,
    credential: Arc<dyn CredentialHolder>,
    pool: TransportPool,
}

impl Dispatcher {
    pub fn new(
        limiter: RateLimiter,
        credential: Arc<dyn CredentialHolder>,
        pool: TransportPool,
    ) -> Self {
        Self {
            limiter,
            credential,
            pool,
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn credential(&self) -> &Arc<dyn CredentialHolder> {
        &self.credential
    }

    pub fn pool(&self) -> &TransportPool {
        &self.pool
    }

    /// Run `spec` and decode the response into `T`.
    pub async fn dispatch<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T> {
        let mut value = self.fetch(spec).await?;
        spec.shape.merge(&mut value, &spec.context);
        serde_json::from_value(value).map_err(|e| {
            Error::Decode(format!("{} {}: {e}", spec.method.as_str(), spec.path))
        })
    }

    /// Run `spec` and return the raw JSON body, without context merging.
    pub async fn fetch(&self, spec: &RequestSpec) -> Result<Value> {
        self.limiter.acquire().await;
        self.credential.ensure_valid(false).await?;
        let token = self
            .credential
            .access_token()
            .await
            .ok_or_else(|| Error::Auth(osu_auth::Error::NotFound("no access token held".into())))?;

        let handle = self.pool.acquire().await?;
        let outcome = self.send(&handle, spec, &token).await;
        match &outcome {
            Ok(_) => handle.mark_served(),
            Err(Error::Transport(e)) => self.report_dead_transport(&handle, e).await,
            Err(_) => {}
        }
        self.pool.release(handle);

        let (status, body) = outcome?;
        metrics::counter!("osu_api_requests_total", "status" => status.to_string()).increment(1);
        if !(200..300).contains(&status) {
            debug!(path = %spec.path, status, "upstream returned an error");
            return Err(Error::Http { status, body });
        }

        info!(
            method = spec.method.as_str(),
            path = %spec.path,
            query = ?spec.query_pairs(),
            body = ?spec.body,
            "request ok"
        );

        serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("{} is not JSON: {e}", spec.path)))
    }

    async fn send(
        &self,
        handle: &TransportHandle,
        spec: &RequestSpec,
        token: &str,
    ) -> Result<(u16, String)> {
        let url = self.pool.settings().url(&spec.path);
        let mut request = handle
            .client()
            .request(spec.method.into(), &url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .query(&spec.query_pairs());
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Heuristic: a connect failure on a pinned client is reported as a
    /// possibly dead transport. The pool only replaces clients that have
    /// served a response before, so a refused connection to an upstream that
    /// is down stays a plain transport error. Ad-hoc clients are dropped anyway.
    async fn report_dead_transport(&self, handle: &TransportHandle, err: &reqwest::Error) {
        if !err.is_connect() {
            return;
        }
        if let Some(generation) = handle.generation() {
            debug!(generation, error = %err, "pinned transport failed to connect");
            self.pool.mark_closed(generation).await;
        }
    }
}
