use anyhow::Context;
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::types::ApiVersion;

/// Thin reqwest wrapper that knows the server, the API version and the bearer token
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    version: ApiVersion,
    token: Option<String>,
}

/// Decoded JSON body plus the headers the CLI cares about
#[derive(Debug)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub pagination: Option<Value>,
    pub location: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, version: ApiVersion, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: server.trim_end_matches('/').to_string(),
            version,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Absolute URL for a path below the versioned API prefix, e.g. `/cities`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.version.prefix(), path)
    }

    /// Exchanges credentials for a token. The server answers with the raw token text.
    pub async fn authenticate(&self, user_name: &str, password: Option<&str>) -> anyhow::Result<String> {
        let url = self.url("/authentication/authenticate");
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "userName": user_name, "password": password }))
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("authentication rejected ({})", status);
        }
        Ok(text)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<ApiReply> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<ApiReply> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<ApiReply> {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<ApiReply> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .context("no token configured; run `cityinfo auth login` and pass --token or set CITYINFO_TOKEN")?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder) -> anyhow::Result<ApiReply> {
        let response = request.send().await.context("request failed")?;
        let status = response.status();

        let pagination = response
            .headers()
            .get("x-pagination")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| serde_json::from_str(v).ok());
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?;
        let body: Option<Value> = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));
            anyhow::bail!("{} {}", status.as_u16(), message);
        }

        Ok(ApiReply {
            status,
            body,
            pagination,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_includes_version_prefix() {
        let client = ApiClient::new("http://localhost:3000/", ApiVersion::V2, None);
        assert_eq!(client.url("/cities/1"), "http://localhost:3000/api/v2/cities/1");
    }

    #[test]
    fn protected_requests_need_a_token() {
        let client = ApiClient::new("http://localhost:3000", ApiVersion::V1, Some("  ".to_string()));
        assert!(client.request(Method::GET, "/cities").is_err());
    }
}
