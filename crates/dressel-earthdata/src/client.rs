use dressel::{FetchError, FetchOutcome, ResourcePath, ResourceSource};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

/// Host of the LP DAAC data pool.
pub const DEFAULT_BASE_URL: &str = "https://e4ftl01.cr.usgs.gov";

/// Authenticated HTTPS client for the Earthdata archive.
///
/// Holds one `reqwest::Client` for the whole run, so every request reuses the
/// same connection pool and carries the bearer token.
pub struct EarthdataClient {
    client: reqwest::Client,
    base_url: String,
}

impl EarthdataClient {
    pub fn new(token: &str) -> Result<Self, FetchError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: &str, base_url: impl Into<String>) -> Result<Self, FetchError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| FetchError::Client("token contains invalid header characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static("dressel"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_owned();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, path: &ResourcePath) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send one GET and classify the status. The body is left unread.
    async fn request(
        &self,
        path: &ResourcePath,
    ) -> Result<FetchOutcome<reqwest::Response>, FetchError> {
        let url = self.resource_url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("request for {path} failed: {e}")))?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "response");

        Ok(match status {
            StatusCode::OK => FetchOutcome::Success(response),
            StatusCode::NOT_FOUND => FetchOutcome::NotFound,
            other => FetchOutcome::ProtocolError {
                status: other.as_u16(),
            },
        })
    }
}

fn body_error(path: &ResourcePath, e: reqwest::Error) -> FetchError {
    FetchError::Network(format!("failed to read body of {path}: {e}"))
}

#[async_trait::async_trait]
impl ResourceSource for EarthdataClient {
    fn label(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &ResourcePath) -> Result<FetchOutcome<Vec<u8>>, FetchError> {
        Ok(match self.request(path).await? {
            FetchOutcome::Success(response) => FetchOutcome::Success(
                response
                    .bytes()
                    .await
                    .map_err(|e| body_error(path, e))?
                    .to_vec(),
            ),
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::ProtocolError { status } => FetchOutcome::ProtocolError { status },
        })
    }

    /// Decodes with the charset from the response's `Content-Type`, falling
    /// back to UTF-8. Malformed sequences are replaced, not rejected.
    async fn fetch_text(&self, path: &ResourcePath) -> Result<FetchOutcome<String>, FetchError> {
        Ok(match self.request(path).await? {
            FetchOutcome::Success(response) => {
                FetchOutcome::Success(response.text().await.map_err(|e| body_error(path, e))?)
            }
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::ProtocolError { status } => FetchOutcome::ProtocolError { status },
        })
    }
}
