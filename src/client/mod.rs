//! HTTP client collaborator for the kwai API.
//!
//! [`ApiClient`] sends JSON:API requests with the session cookies of the
//! portal and refreshes the access token once when a request returns 401.
//! [`ResourceApi`] puts the document transformer on top of any
//! [`JsonApiTransport`].

pub mod auth;
pub mod error;
pub mod query;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub use auth::RefreshGuard;
pub use error::ClientError;
pub use query::QueryParams;

use crate::config::{AppConfig, AuthConfig};
use crate::error::TransformError;
use crate::models::Resource;
use crate::transform::{into_model, DomainObject, Transformed, Transformer};
use crate::types::{Operation, Page};

/// Sends one JSON:API request and resolves to the parsed body of a 2xx response.
#[async_trait]
pub trait JsonApiTransport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    accept: String,
    auth: AuthConfig,
    refresh: Arc<RefreshGuard>,
}

impl ApiClient {
    /// A client for `base_url` with the default accept header, timeout and auth paths
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut config = AppConfig::from_env();
        config.api.base_url = base_url.to_string();
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        // Validate early so a bad base url is reported once, not on every request
        Url::parse(&config.api.base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.request_timeout_secs))
            .cookie_store(config.api.cookie_store)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            accept: config.api.accept.clone(),
            auth: config.auth.clone(),
            refresh: Arc::new(RefreshGuard::new()),
        })
    }

    /// Share a refresh guard with other clients of the same session
    pub fn with_refresh_guard(mut self, guard: Arc<RefreshGuard>) -> Self {
        self.refresh = guard;
        self
    }

    pub fn refresh_guard(&self) -> &Arc<RefreshGuard> {
        &self.refresh
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute url for an API path such as `/v1/teams`
    pub fn url(&self, path: &str, query: &QueryParams) -> Result<Url, ClientError> {
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        query.apply(&mut url);
        Ok(url)
    }

    pub async fn get(&self, path: &str, query: &QueryParams) -> Result<Value, ClientError> {
        self.execute(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.execute(Method::POST, path, &QueryParams::new(), Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.execute(Method::PATCH, path, &QueryParams::new(), Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        self.execute(Method::DELETE, path, &QueryParams::new(), None).await
    }

    /// Log in with username and password. The session cookies end up in the cookie store.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let url = self.url(&self.auth.login_path, &QueryParams::new())?;
        tracing::info!("Logging in as {} at {}", username, url);
        let response = self
            .http
            .post(url.clone())
            .header(ACCEPT, self.accept.as_str())
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        read_response(&url, response).await.map(|_| ())
    }

    /// Log out. A 401 means the session is already gone.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = self.url(&self.auth.logout_path, &QueryParams::new())?;
        match self.send(Method::POST, url, None).await {
            Ok(_) | Err(ClientError::Unauthorized { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Ask the API for a new access token, without any retry
    pub async fn refresh_access_token(&self) -> Result<(), ClientError> {
        let url = self.url(&self.auth.refresh_path, &QueryParams::new())?;
        tracing::debug!("Refreshing access token at {}", url);
        self.send(Method::POST, url, None).await.map(|_| ())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = self.url(path, query)?;
        let seen = self.refresh.generation();

        match self.send(method.clone(), url.clone(), body.as_ref()).await {
            Err(ClientError::Unauthorized { .. }) => {}
            other => return other,
        }

        match self.refresh.refresh(seen, || self.refresh_access_token()).await {
            Ok(true) => tracing::debug!("Access token refreshed"),
            Ok(false) => tracing::debug!("Access token was refreshed by another request"),
            Err(err) => tracing::warn!("Access token refresh failed: {}", err),
        }

        self.send(method, url, body.as_ref()).await
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value, ClientError> {
        let mut request = self.http.request(method.clone(), url.clone()).header(ACCEPT, self.accept.as_str());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, self.accept.as_str()).json(body);
        }
        let response = request.send().await?;
        tracing::debug!("{} {} -> {}", method, url, response.status());
        read_response(&url, response).await
    }
}

async fn read_response(url: &Url, response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    if status.is_success() {
        Ok(body)
    } else if status == StatusCode::UNAUTHORIZED {
        Err(ClientError::Unauthorized { url: url.to_string() })
    } else {
        Err(ClientError::status(status.as_u16(), url.as_str(), body))
    }
}

#[async_trait]
impl JsonApiTransport for ApiClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.execute(method, path, query, body).await
    }
}

/// Typed resource access: fetch documents and map them, save models as write payloads.
pub struct ResourceApi<C> {
    transport: C,
    transformer: Arc<Transformer>,
}

impl<C: JsonApiTransport> ResourceApi<C> {
    pub fn new(transport: C, transformer: Arc<Transformer>) -> Self {
        Self { transport, transformer }
    }

    pub fn transport(&self) -> &C {
        &self.transport
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// GET `path` and map the document with the descriptor registered as `schema`
    pub async fn fetch_document(
        &self,
        schema: &str,
        path: &str,
        query: &QueryParams,
    ) -> Result<Transformed<DomainObject>, ClientError> {
        let raw = self.transport.request(Method::GET, path, query, None).await?;
        Ok(self.transformer.transform_document(schema, raw)?)
    }

    pub async fn fetch<T: Resource>(&self, path: &str, query: &QueryParams) -> Result<Transformed<T>, ClientError> {
        let raw = self.transport.request(Method::GET, path, query, None).await?;
        Ok(self.transformer.transform::<T>(raw)?)
    }

    pub async fn fetch_one<T: Resource>(&self, path: &str) -> Result<T, ClientError> {
        Ok(self.fetch::<T>(path, &QueryParams::new()).await?.into_single()?)
    }

    pub async fn fetch_page<T: Resource>(&self, path: &str, query: &QueryParams) -> Result<Page<T>, ClientError> {
        Ok(self.fetch::<T>(path, query).await?.into_page()?)
    }

    /// POST to `collection` when the model has no id, PATCH `collection/id` otherwise.
    /// Resolves to the model the API sent back.
    pub async fn save<T: Resource>(&self, collection: &str, model: &T) -> Result<T, ClientError> {
        let payload = self.transformer.model_to_write_payload(model)?;
        let body = serde_json::to_value(&payload).map_err(|e| TransformError::payload(e.to_string()))?;

        let (method, path) = match Operation::for_id(model.id()) {
            Operation::Create => (Method::POST, collection.to_string()),
            Operation::Update => (
                Method::PATCH,
                format!("{}/{}", collection.trim_end_matches('/'), model.id().unwrap_or_default()),
            ),
        };
        tracing::debug!("Saving {} with {} {}", T::SCHEMA, method, path);

        let raw = self.transport.request(method, &path, &QueryParams::new(), Some(body)).await?;
        let saved = self.transformer.transform_document(T::SCHEMA, raw)?.into_single()?;
        Ok(into_model::<T>(&saved)?)
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError> {
        let path = format!("{}/{}", collection.trim_end_matches('/'), id);
        self.transport.request(Method::DELETE, &path, &QueryParams::new(), None).await?;
        Ok(())
    }
}
