//! [`ResourceClient`] backed by the orchestration REST API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{Backup, Cluster, API_VERSION};
use crate::client::{ClientError, ResourceClient};
use crate::config::{read_token, ApiConfig, SecureString};

const CLUSTERS: &str = "clusters";
const BACKUPS: &str = "backups";

#[derive(Clone)]
pub struct ApiResourceClient {
    http: Client,
    base_url: String,
    token: Option<SecureString>,
}

impl ApiResourceClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder().timeout(config.timeout());

        if let Some(ca_path) = &config.ca_cert_path {
            let pem = std::fs::read(ca_path)?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: read_token(&config.token_path)?,
        })
    }

    fn resource_url(&self, plural: &str, namespace: &str, name: &str) -> String {
        format!(
            "{}/apis/{}/namespaces/{}/{}/{}",
            self.base_url, API_VERSION, namespace, plural, name
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    async fn get_resource<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        plural: &str,
        namespace: &str,
        name: &str,
    ) -> Result<T, ClientError> {
        let url = self.resource_url(plural, namespace, name);
        tracing::debug!(%url, "fetching {}", kind);

        let response = self.request(Method::GET, &url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        }
        decode(response).await
    }

    /// POST a JSON document to an arbitrary API path.
    pub(crate) async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.request(Method::POST, &url).json(body).send().await?;
        check_status(response).await.map(|_| ())
    }
}

#[async_trait]
impl ResourceClient for ApiResourceClient {
    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Cluster, ClientError> {
        self.get_resource("Cluster", CLUSTERS, namespace, name).await
    }

    async fn get_backup(&self, namespace: &str, name: &str) -> Result<Backup, ClientError> {
        self.get_resource("Backup", BACKUPS, namespace, name).await
    }

    async fn update_backup_status(&self, backup: &Backup) -> Result<Backup, ClientError> {
        let url = format!(
            "{}/status",
            self.resource_url(BACKUPS, &backup.metadata.namespace, &backup.metadata.name)
        );
        let mut document = serde_json::to_value(backup)?;
        document["apiVersion"] = serde_json::Value::from(API_VERSION);
        document["kind"] = serde_json::Value::from("Backup");

        let response = self
            .request(Method::PUT, &url)
            .json(&document)
            .send()
            .await?;
        decode(response).await
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message: message.trim().to_string(),
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let body = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
