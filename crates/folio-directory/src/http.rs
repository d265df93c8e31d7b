//! REST implementation of [`DirectoryService`] using `reqwest`.
//!
//! The remote contract (owned by the service, not by us):
//!
//! | operation            | request                                   |
//! |----------------------|-------------------------------------------|
//! | email_exists         | `GET {base}/users?email=<e>`              |
//! | find_by_credentials  | `GET {base}/users?email=<e>&password=<p>` |
//! | create               | `POST {base}/users` with a JSON body      |
//!
//! Both GETs answer with a JSON array of matching records. Credentials
//! travel as plain query parameters because that's what the service
//! accepts; this adapter keeps the contract as-is.

use std::time::Duration;

use reqwest::{Client, Response, Url};

use crate::{
    Credentials, DirectoryError, DirectoryService, NewUser, User,
    count_records, decode_record, decode_records,
};

/// Base URL of the hosted user directory.
pub const DEFAULT_BASE_URL: &str = "https://mock-api-1-4nsz.onrender.com";

/// Configuration for [`HttpDirectory`].
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Service root, without the `/users` suffix. A trailing slash is fine.
    pub base_url: String,

    /// Per-request timeout. `None` waits forever, which matches the
    /// service's existing clients; set one if a hung request shouldn't
    /// leave the session stuck in `Authenticating`.
    pub timeout: Option<Duration>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// A [`DirectoryService`] backed by the remote REST service.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    users_url: Url,
}

impl HttpDirectory {
    /// Builds a client for the service described by `config`.
    ///
    /// # Errors
    /// - [`DirectoryError::InvalidBaseUrl`] if `base_url` doesn't parse
    /// - [`DirectoryError::Request`] if the HTTP client can't be built
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let users_url = users_url(&config.base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(DirectoryError::Request)?;

        tracing::debug!(url = %users_url, "directory client ready");
        Ok(Self { client, users_url })
    }

    /// Returns the resolved `/users` endpoint.
    pub fn users_url(&self) -> &Url {
        &self.users_url
    }

    /// Runs a filtered `GET /users` and returns the raw body.
    async fn query(&self, params: &[(&str, &str)]) -> Result<Vec<u8>, DirectoryError> {
        let response = self
            .client
            .get(self.users_url.clone())
            .query(params)
            .send()
            .await
            .map_err(DirectoryError::Request)?;
        read_body(response).await
    }
}

impl DirectoryService for HttpDirectory {
    async fn email_exists(&self, email: &str) -> Result<bool, DirectoryError> {
        tracing::debug!(email, "checking whether email is registered");
        // Only the count matters; the records themselves may be in any shape.
        let body = self.query(&[("email", email)]).await?;
        Ok(count_records(&body)? > 0)
    }

    async fn find_by_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<Option<User>, DirectoryError> {
        tracing::debug!(email = %credentials.email, "looking up user by credentials");
        let body = self
            .query(&[
                ("email", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .await?;
        Ok(decode_records(&body)?.into_iter().next())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DirectoryError> {
        let response = self
            .client
            .post(self.users_url.clone())
            .json(new_user)
            .send()
            .await
            .map_err(DirectoryError::Request)?;
        let body = read_body(response).await?;
        let user = decode_record(&body)?;

        tracing::info!(id = %user.id, email = %user.email, "user created");
        Ok(user)
    }
}

/// Resolves `{base}/users`, tolerating a trailing slash on the base.
fn users_url(base_url: &str) -> Result<Url, DirectoryError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/users"))
        .map_err(|_| DirectoryError::InvalidBaseUrl(base_url.to_string()))
}

/// Rejects non-2xx responses, otherwise returns the raw body.
async fn read_body(response: Response) -> Result<Vec<u8>, DirectoryError> {
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "directory rejected request");
        return Err(DirectoryError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await.map_err(DirectoryError::Request)?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_url_appends_collection() {
        let url = users_url("https://example.com").unwrap();

        assert_eq!(url.as_str(), "https://example.com/users");
    }

    #[test]
    fn test_users_url_tolerates_trailing_slash() {
        let url = users_url("https://example.com/api/").unwrap();

        assert_eq!(url.as_str(), "https://example.com/api/users");
    }

    #[test]
    fn test_users_url_rejects_garbage() {
        let result = users_url("not a url");

        assert!(matches!(result, Err(DirectoryError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_default_config_uses_hosted_service_without_timeout() {
        let config = DirectoryConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
    }
}
