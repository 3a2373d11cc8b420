use super::model::BinanceApiError;
use crate::error::DataError;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fmt, time::Duration};
use tracing::{Instrument, debug, warn};
use url::Url;

/// Binance spot REST API base url.
///
/// See docs: <https://binance-docs.github.io/apidocs/spot/en/#general-api-information>
pub const REST_BASE_URL_BINANCE_SPOT: &str = "https://api.binance.com";

/// Header carrying the API key for endpoints that require one (eg/ historical trades).
pub const HEADER_API_KEY: &str = "X-MBX-APIKEY";

/// Configuration for a [`BinanceRestClient`].
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RestClientConfig {
    /// Base url every endpoint path is joined onto.
    pub base_url: String,
    /// Optional API key, sent with [`BinanceRestClient::limit_request`] calls only.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: REST_BASE_URL_BINANCE_SPOT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for RestClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// REST client for the Binance spot public market-data API.
///
/// Every endpoint wrapper delegates to [`query`](Self::query) or
/// [`limit_request`](Self::limit_request).
#[derive(Clone)]
pub struct BinanceRestClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl fmt::Debug for BinanceRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceRestClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl BinanceRestClient {
    /// Construct a [`BinanceRestClient`] pointed at [`REST_BASE_URL_BINANCE_SPOT`].
    pub fn new() -> Result<Self, DataError> {
        Self::with_config(RestClientConfig::default())
    }

    /// Construct a [`BinanceRestClient`] with a custom base url.
    ///
    /// Useful for testing with a mock server where the url is not known at compile time.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        Self::with_config(RestClientConfig {
            base_url: base_url.into(),
            ..RestClientConfig::default()
        })
    }

    /// Construct a [`BinanceRestClient`] from a [`RestClientConfig`].
    pub fn with_config(config: RestClientConfig) -> Result<Self, DataError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let base_url = Url::parse(&config.base_url)?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a public `GET` request to `path` with optional query `params`.
    pub async fn query<Response, Params>(
        &self,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Response, DataError>
    where
        Response: DeserializeOwned,
        Params: Serialize + ?Sized,
    {
        self.send(Method::GET, path, params, false).await
    }

    /// Send a request to `path` that carries the configured API key header.
    pub async fn limit_request<Response, Params>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Response, DataError>
    where
        Response: DeserializeOwned,
        Params: Serialize + ?Sized,
    {
        self.send(method, path, params, true).await
    }

    async fn send<Response, Params>(
        &self,
        method: Method,
        path: &str,
        params: Option<&Params>,
        with_api_key: bool,
    ) -> Result<Response, DataError>
    where
        Response: DeserializeOwned,
        Params: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;
        let span = tracing::debug_span!("rest_request", %method, path);

        let mut request = self.http.request(method, url);
        if let Some(params) = params {
            request = request.query(params);
        }
        if with_api_key {
            match &self.api_key {
                Some(api_key) => request = request.header(HEADER_API_KEY, api_key),
                None => warn!(path, "request requires an API key, but none is configured"),
            }
        }

        async move {
            debug!("sending request");

            let response = request.send().await?;
            let status = response.status();
            let payload = response.bytes().await?;

            debug!(%status, bytes = payload.len(), "received response");

            parse_response(status, &payload)
        }
        .instrument(span)
        .await
    }
}

/// Parse a response body, mapping non-success payloads into [`DataError::Api`] where
/// they carry a Binance error code.
pub(crate) fn parse_response<Response>(
    status: StatusCode,
    payload: &[u8],
) -> Result<Response, DataError>
where
    Response: DeserializeOwned,
{
    if status.is_success() {
        return serde_json::from_slice(payload).map_err(DataError::from);
    }

    match serde_json::from_slice::<BinanceApiError>(payload) {
        Ok(error) => Err(DataError::Api {
            status,
            code: error.code,
            msg: error.msg,
        }),
        Err(_) => Err(DataError::Transport(format!(
            "HTTP {status}: {}",
            String::from_utf8_lossy(payload)
        ))),
    }
}
