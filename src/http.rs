use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::QueryParams;

/// Thin reqwest wrapper that knows the API's URL layout and key placement
pub(crate) struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    version: String,
    api_key: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            version: config.version.clone(),
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: Method, path: &str, params: &QueryParams) -> RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.version, path);
        self.client
            .request(method, url)
            .query(&[("api", self.api_key.as_str())])
            .query(params.to_query_params())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &QueryParams) -> Result<T> {
        log::trace!("GET {}", path);
        let response = self.request(Method::GET, path, params).send().await?;
        Self::handle_response(response).await
    }

    pub async fn post<T, B>(&self, path: &str, params: &QueryParams, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        log::trace!("POST {}", path);
        let mut request = self.request(Method::POST, path, params);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            log::debug!("API request failed with status {}: {}", status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}
