// reqwest-backed transport talking to a real origin

use super::{RawResponse, Transport};
use crate::error::FetchResult;
use tracing::debug;

pub struct HttpTransport {
    base_url: String, // e.g. "http://127.0.0.1:3000"
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coinlens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Origin requests are resolved against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> FetchResult<RawResponse> {
        let url = self.url_for(path);
        let res = self.client.get(&url).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        debug!(%url, status, bytes = body.len(), "GET completed");
        Ok(RawResponse { status, body })
    }
}
