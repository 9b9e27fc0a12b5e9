//! API client for communicating with the file-scanning REST API.
//!
//! This module provides the `ApiClient` struct for fetching file reports,
//! user profiles and comments, and for the authentication endpoints.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Comment, FileRecord, UserProfile};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// API client for the scanning service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given backend host
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer credential for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer credential (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    // ===== Authentication =====

    /// Authenticate and return the issued credential
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let url = format!("{}/auth/login", self.base_url);
        let body = LoginRequest { username, password };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send authentication request")?;

        let response = Self::check_response(response).await?;
        let auth: AuthResponse = response
            .json()
            .await
            .context("Failed to parse auth response")?;
        Ok(auth.token)
    }

    /// Create a new account
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let url = format!("{}/v1/users", self.base_url);
        let body = RegisterRequest {
            username,
            email,
            password,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send register request")?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Change the password for an existing account
    pub async fn change_password(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/v1/users/{}", self.base_url, username);
        let body = serde_json::json!({ "password": password });

        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await
            .context("Failed to send password change request")?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== File Reports =====

    /// Fetch a file report scoped to the given field subset
    pub async fn fetch_file(&self, sha256: &str, fields: &[&str]) -> Result<FileRecord> {
        let url = format!(
            "{}/v1/files/{}?fields={}",
            self.base_url,
            sha256,
            fields.join(",")
        );
        debug!(sha256, "Fetching file report");
        self.get(&url).await
    }

    /// Fetch the comments left on a file report
    pub async fn fetch_comments(&self, sha256: &str) -> Result<Vec<Comment>> {
        let url = format!("{}/v1/files/{}/comments", self.base_url, sha256);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        // Try to parse as array directly first, then as wrapped object
        if let Ok(comments) = serde_json::from_str::<Vec<Comment>>(&text) {
            return Ok(comments);
        }

        #[derive(Deserialize)]
        struct CommentsWrapper {
            #[serde(default)]
            comments: Vec<Comment>,
        }

        let wrapper: CommentsWrapper =
            serde_json::from_str(&text).context("Failed to parse comments response")?;
        Ok(wrapper.comments)
    }

    /// Mark a file as liked by the current user
    pub async fn like_file(&self, sha256: &str) -> Result<()> {
        let url = format!("{}/v1/files/{}/like", self.base_url, sha256);
        let _: serde_json::Value = self.post(&url, &serde_json::json!({})).await?;
        Ok(())
    }

    /// Remove a like from a file
    pub async fn unlike_file(&self, sha256: &str) -> Result<()> {
        let url = format!("{}/v1/files/{}/unlike", self.base_url, sha256);
        let _: serde_json::Value = self.post(&url, &serde_json::json!({})).await?;
        Ok(())
    }

    // ===== Users =====

    /// Fetch a user profile, optionally scoped to a field subset
    pub async fn fetch_user(&self, username: &str, fields: Option<&[&str]>) -> Result<UserProfile> {
        let url = match fields {
            Some(fields) => format!(
                "{}/v1/users/{}?fields={}",
                self.base_url,
                username,
                fields.join(",")
            ),
            None => format!("{}/v1/users/{}", self.base_url, username),
        };
        debug!(username, "Fetching user profile");
        self.get(&url).await
    }

    /// Fetch a user's avatar image as raw bytes
    pub async fn fetch_avatar(&self, username: &str) -> Result<Vec<u8>> {
        let url = format!("{}/v1/users/{}/avatar", self.base_url, username);

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        let bytes = response.bytes().await.context("Failed to read avatar body")?;
        Ok(bytes.to_vec())
    }
}
