//! HTTP client for the Figma REST API.

use log::{debug, warn};
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::{ApiConfig, DEFAULT_API_BASE};
use crate::error::{FigdomError, Result};

use super::api_types::{FigmaFile, FigmaImageExport, ImageFormat};
use super::conversion::ImageUrlMap;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The two calls conversion needs from the design service.
#[allow(async_fn_in_trait)]
pub trait DesignApi {
    async fn fetch_document(&self, file_key: &str) -> Result<FigmaFile>;

    /// Render `ids` in `format`; the result maps node id to image URL.
    async fn fetch_image_urls(
        &self,
        file_key: &str,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<ImageUrlMap>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            FigmaAuth::PersonalAccessToken(token) => builder.header("X-FIGMA-TOKEN", token),
            FigmaAuth::OAuthToken(token) => builder.bearer_auth(token),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    auth: FigmaAuth,
    base_url: Url,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, DEFAULT_API_BASE, DEFAULT_TIMEOUT)
    }

    pub fn from_config(auth: FigmaAuth, api: &ApiConfig) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, &api.base_url, api.timeout())
    }

    pub fn with_base_url_and_timeout(
        auth: FigmaAuth,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.as_ref())?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FigdomError::Network)?;

        Ok(Self {
            http,
            auth,
            base_url,
        })
    }

    pub async fn fetch_file(&self, file_key: &str) -> Result<FigmaFile> {
        validate_file_key(file_key)?;
        let url = self.endpoint(&format!("/v1/files/{file_key}"))?;
        debug!("fetching document {url}");
        let req = self.authed(self.http.get(url));
        self.send_json(req).await
    }

    pub async fn export_images(
        &self,
        file_key: &str,
        node_ids: &[String],
        format: ImageFormat,
    ) -> Result<ImageUrlMap> {
        validate_file_key(file_key)?;
        if node_ids.is_empty() {
            return Ok(ImageUrlMap::new());
        }

        let mut url = self.endpoint(&format!("/v1/images/{file_key}"))?;
        url.query_pairs_mut()
            .append_pair("ids", &node_ids.join(","))
            .append_pair("format", format.as_str());
        debug!(
            "requesting {} {} image(s) for {file_key}",
            node_ids.len(),
            format.as_str()
        );

        let req = self.authed(self.http.get(url));
        let export: FigmaImageExport = self.send_json(req).await?;
        into_url_map(export)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        self.auth.apply(builder)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(FigdomError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(FigdomError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str(&body).map_err(FigdomError::Serialization);
        }

        Err(FigdomError::figma_api(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

impl DesignApi for FigmaClient {
    async fn fetch_document(&self, file_key: &str) -> Result<FigmaFile> {
        self.fetch_file(file_key).await
    }

    async fn fetch_image_urls(
        &self,
        file_key: &str,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<ImageUrlMap> {
        self.export_images(file_key, ids, format).await
    }
}

fn validate_file_key(file_key: &str) -> Result<()> {
    if file_key.trim().is_empty() {
        return Err(FigdomError::Config(
            "Figma file key is required".to_string(),
        ));
    }
    Ok(())
}

fn into_url_map(export: FigmaImageExport) -> Result<ImageUrlMap> {
    if let Some(err) = export.err.filter(|err| !err.is_empty()) {
        return Err(FigdomError::figma_api(None, err));
    }
    Ok(export
        .images
        .into_iter()
        .filter_map(|(id, url)| match url {
            Some(url) => Some((id, url)),
            None => {
                warn!("Figma could not render image for node {id}; skipping");
                None
            }
        })
        .collect())
}

fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Figma API returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| value.get("err").or_else(|| value.get("error")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Figma API, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env;

    fn built_headers(auth: FigmaAuth) -> reqwest::header::HeaderMap {
        let request = auth
            .apply(Client::new().get("https://api.figma.com/v1/files/abc"))
            .build()
            .unwrap();
        request.headers().clone()
    }

    #[test]
    fn personal_access_token_sets_expected_header() {
        let headers = built_headers(FigmaAuth::PersonalAccessToken("secret".into()));
        assert_eq!(headers.get("X-FIGMA-TOKEN").unwrap(), "secret");
    }

    #[test]
    fn oauth_token_sets_bearer_auth_header() {
        let headers = built_headers(FigmaAuth::OAuthToken("oauth_secret".into()));
        let header = headers
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert_eq!(header, "Bearer oauth_secret");
    }

    #[test]
    fn auth_from_env_prefers_figma_token() {
        let _guard = EnvGuard;
        env::set_var("FIGMA_TOKEN", "pat_token");
        env::set_var("FIGMA_OAUTH_TOKEN", "oauth_token");

        let auth = FigmaAuth::from_env().expect("auth from env");
        assert_eq!(auth, FigmaAuth::PersonalAccessToken("pat_token".into()));
    }

    #[test]
    fn endpoint_joins_versioned_paths() {
        let client = FigmaClient::with_base_url_and_timeout(
            FigmaAuth::PersonalAccessToken("t".into()),
            "https://figma.internal.example",
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        let url = client.endpoint("/v1/files/KEY").unwrap();
        assert_eq!(url.as_str(), "https://figma.internal.example/v1/files/KEY");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = FigmaClient::with_base_url_and_timeout(
            FigmaAuth::PersonalAccessToken("t".into()),
            "not a url",
            DEFAULT_TIMEOUT,
        );
        assert!(matches!(result, Err(FigdomError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn empty_file_key_is_a_config_error() {
        let client = FigmaClient::new(FigmaAuth::PersonalAccessToken("t".into())).unwrap();
        let result = client.fetch_file("  ").await;
        assert!(matches!(result, Err(FigdomError::Config(_))));
    }

    #[tokio::test]
    async fn empty_id_batch_skips_the_request() {
        let client = FigmaClient::new(FigmaAuth::PersonalAccessToken("t".into())).unwrap();
        let urls = client
            .export_images("KEY", &[], ImageFormat::Svg)
            .await
            .unwrap();
        assert!(urls.is_empty());
    }

    #[test]
    fn null_image_entries_are_skipped() {
        let export = FigmaImageExport {
            err: None,
            images: HashMap::from([
                ("1:2".to_string(), Some("https://cdn.example/a.svg".to_string())),
                ("1:3".to_string(), None),
            ]),
        };
        let urls = into_url_map(export).unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls.get("1:2"), Some("https://cdn.example/a.svg"));
    }

    #[test]
    fn export_err_field_becomes_error() {
        let export = FigmaImageExport {
            err: Some("Invalid node ids".to_string()),
            images: HashMap::new(),
        };
        assert!(matches!(
            into_url_map(export),
            Err(FigdomError::FigmaApi { status: None, .. })
        ));
    }

    #[test]
    fn error_message_prefers_body_and_reports_retry() {
        let msg = error_message(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"status":429,"err":"Rate limit exceeded"}"#,
            Some("12"),
        );
        assert_eq!(msg, "Rate limit exceeded (rate limited, retry after 12s)");

        let msg = error_message(StatusCode::NOT_FOUND, "<html>", None);
        assert_eq!(msg, "Figma API returned status 404");
    }

    struct EnvGuard;

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            env::remove_var("FIGMA_TOKEN");
            env::remove_var("FIGMA_OAUTH_TOKEN");
        }
    }
}
