use std::time::Duration;

use futures::TryStreamExt;
use reqwest::{header::HeaderMap, Client, Method, StatusCode, Url};
use tracing::{debug, instrument};

use crate::{ByteStream, ObjectDecoder, ResponseStream, StreamConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
    pub query_params: Vec<(String, String)>,
    pub stream: StreamConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            timeout: Duration::from_secs(30),
            query_params: Vec::new(),
            stream: StreamConfig::default(),
        }
    }
}

/// Issues a request whose response body is a JSON array and streams its
/// elements back as they arrive.
pub struct HttpConnector {
    client: Client,
    url: Url,
    config: HttpConfig,
}

impl HttpConnector {
    pub fn new(url: &str, config: HttpConfig) -> Result<Self, ConnectorError> {
        let mut url = Url::parse(url).map_err(|e| ConnectorError::Config(e.to_string()))?;

        if !config.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(config.query_params.iter());
        }

        Ok(Self {
            client: Client::new(),
            url,
            config,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send the request and return a stream over the response's array
    /// elements. A non-success status is reported before any body is
    /// scanned.
    #[instrument(skip(self, decoder), fields(url = %self.url))]
    pub async fn open<D: ObjectDecoder>(
        &self,
        decoder: D,
    ) -> Result<ResponseStream<ByteStream<'static>, D>, ConnectorError> {
        let mut request = self
            .client
            .request(self.config.method.clone(), self.url.clone())
            .headers(self.config.headers.clone())
            .timeout(self.config.timeout);

        if let Some(body) = &self.config.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Status { status, body });
        }
        debug!(%status, "streaming response body");

        let chunks: ByteStream<'static> = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
        );
        Ok(ResponseStream::with_config(
            chunks,
            decoder,
            self.config.stream.clone(),
        ))
    }
}
