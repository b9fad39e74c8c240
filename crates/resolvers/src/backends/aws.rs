//! AWS backends: Secrets Manager, SSM Parameter Store and S3
//!
//! Credentials and the default region come from the standard provider chain.
//! Every client uses the standard retry mode with a configurable attempt
//! count; set `aws_smithy_runtime=debug` in the log filter to see retries.

use super::{ObjectStore, Parameter, ParameterStore, SecretStore, StoreScope};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use envsnag_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared SDK configuration, loaded once per region
pub struct AwsClients {
    max_attempts: u32,
    configs: Mutex<HashMap<Option<String>, SdkConfig>>,
}

impl std::fmt::Debug for AwsClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsClients")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl AwsClients {
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            configs: Mutex::new(HashMap::new()),
        }
    }

    /// SDK configuration for a region; `None` uses the provider chain default
    pub async fn config(&self, region: Option<&str>) -> SdkConfig {
        let key = region.map(str::to_string);
        let mut configs = self.configs.lock().await;
        if let Some(config) = configs.get(&key) {
            return config.clone();
        }

        debug!(region = ?region, max_attempts = self.max_attempts, "Loading AWS configuration");
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(RetryConfig::standard().with_max_attempts(self.max_attempts));
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;
        configs.insert(key, config.clone());
        config
    }
}

/// AWS Secrets Manager
#[derive(Debug)]
pub struct AwsSecretsManager {
    clients: Arc<AwsClients>,
}

impl AwsSecretsManager {
    #[must_use]
    pub fn new(clients: Arc<AwsClients>) -> Self {
        Self { clients }
    }

    async fn client(&self, scope: &StoreScope) -> aws_sdk_secretsmanager::Client {
        let config = self.clients.config(scope.region.as_deref()).await;
        aws_sdk_secretsmanager::Client::new(&config)
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManager {
    async fn list_secrets(&self, prefix: &str, scope: &StoreScope) -> Result<Vec<String>> {
        use aws_sdk_secretsmanager::error::DisplayErrorContext;
        use aws_sdk_secretsmanager::types::{Filter, FilterNameStringType};

        let client = self.client(scope).await;
        let mut request = client.list_secrets();
        if !prefix.is_empty() {
            request = request.filters(
                Filter::builder()
                    .key(FilterNameStringType::Name)
                    .values(prefix)
                    .build(),
            );
        }

        let mut names = Vec::new();
        let mut pages = request.into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                Error::backend(
                    "secretsmanager",
                    format!("listing '{prefix}': {}", DisplayErrorContext(&e)),
                )
            })?;
            names.extend(
                page.secret_list()
                    .iter()
                    .filter_map(|entry| entry.name().map(str::to_string)),
            );
        }

        debug!(prefix = %prefix, count = names.len(), "Listed secrets");
        Ok(names)
    }

    async fn get_secret(&self, name: &str, scope: &StoreScope) -> Result<String> {
        use aws_sdk_secretsmanager::error::DisplayErrorContext;

        let client = self.client(scope).await;
        let mut request = client.get_secret_value().secret_id(name);
        if let Some(stage) = &scope.version_stage {
            request = request.version_stage(stage);
        }
        if let Some(id) = &scope.version_id {
            request = request.version_id(id);
        }

        let output = request.send().await.map_err(|e| {
            if e.as_service_error()
                .is_some_and(|service| service.is_resource_not_found_exception())
            {
                Error::not_found(name)
            } else {
                Error::backend(
                    "secretsmanager",
                    format!("reading '{name}': {}", DisplayErrorContext(&e)),
                )
            }
        })?;

        if let Some(body) = output.secret_string() {
            return Ok(body.to_string());
        }
        match output.secret_binary() {
            Some(blob) => String::from_utf8(blob.as_ref().to_vec())
                .map_err(|_| Error::decode(name, "binary secret is not valid UTF-8")),
            None => Err(Error::decode(name, "secret has no value")),
        }
    }
}

/// AWS SSM Parameter Store
#[derive(Debug)]
pub struct AwsParameterStore {
    clients: Arc<AwsClients>,
}

impl AwsParameterStore {
    #[must_use]
    pub fn new(clients: Arc<AwsClients>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl ParameterStore for AwsParameterStore {
    async fn parameters_by_path(
        &self,
        path: &str,
        recursive: bool,
        scope: &StoreScope,
    ) -> Result<Vec<Parameter>> {
        use aws_sdk_ssm::error::DisplayErrorContext;

        let config = self.clients.config(scope.region.as_deref()).await;
        let client = aws_sdk_ssm::Client::new(&config);

        let mut parameters = Vec::new();
        let mut pages = client
            .get_parameters_by_path()
            .path(path)
            .recursive(recursive)
            .with_decryption(true)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                Error::backend("ssm", format!("reading '{path}': {}", DisplayErrorContext(&e)))
            })?;
            parameters.extend(page.parameters().iter().filter_map(|p| {
                Some(Parameter {
                    name: p.name()?.to_string(),
                    value: p.value().unwrap_or_default().to_string(),
                })
            }));
        }

        debug!(path = %path, recursive, count = parameters.len(), "Read parameters");
        Ok(parameters)
    }
}

/// AWS S3
#[derive(Debug)]
pub struct AwsObjectStore {
    clients: Arc<AwsClients>,
}

impl AwsObjectStore {
    #[must_use]
    pub fn new(clients: Arc<AwsClients>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl ObjectStore for AwsObjectStore {
    async fn get_object(&self, bucket: &str, key: &str, scope: &StoreScope) -> Result<Vec<u8>> {
        use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};

        let config = self.clients.config(scope.region.as_deref()).await;
        let client = aws_sdk_s3::Client::new(&config);

        let output = client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(service) if service.is_no_such_key() => {
                    Error::not_found(format!("{bucket}/{key}"))
                }
                Some(service) if service.code() == Some("NoSuchBucket") => {
                    Error::not_found(format!("bucket '{bucket}'"))
                }
                _ => Error::backend(
                    "s3",
                    format!("reading '{bucket}/{key}': {}", DisplayErrorContext(&e)),
                ),
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| Error::backend("s3", format!("reading body of '{bucket}/{key}': {e}")))?;
        Ok(body.into_bytes().to_vec())
    }
}
