//! HashiCorp Vault KV v2
//!
//! Secret names are `<mount>/<path>`. A secret's body is its KV data map
//! serialized as a JSON object.

use super::{SecretStore, StoreScope};
use async_trait::async_trait;
use envsnag_config::VaultSettings;
use envsnag_core::{Error, Result, VAULT_ADDR_VAR};
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use tracing::{debug, error};
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

const BACKEND: &str = "vault";

/// Vault KV v2 secret store. The client is built on first use.
pub struct VaultSecretStore {
    settings: VaultSettings,
    client: OnceCell<VaultClient>,
}

impl std::fmt::Debug for VaultSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretStore")
            .field("address", &self.settings.address)
            .field("namespace", &self.settings.namespace)
            .field("client", &"[VaultClient]")
            .finish()
    }
}

impl VaultSecretStore {
    #[must_use]
    pub fn new(settings: VaultSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&VaultClient> {
        self.client.get_or_try_init(|| {
            let address = self.settings.address.as_deref().ok_or_else(|| {
                Error::configuration(format!("{VAULT_ADDR_VAR} must be set to read from Vault"))
            })?;

            let mut settings_builder = VaultClientSettingsBuilder::default();
            settings_builder.address(address);
            if let Some(token) = &self.settings.token {
                settings_builder.token(token);
            }
            if let Some(namespace) = &self.settings.namespace {
                settings_builder.namespace(Some(namespace.clone()));
            }

            let settings = settings_builder.build().map_err(|e| {
                Error::configuration(format!("Invalid Vault client configuration: {e}"))
            })?;
            let client = VaultClient::new(settings)
                .map_err(|e| Error::backend(BACKEND, format!("Failed to create client: {e}")))?;

            debug!(address = %address, "Initialized Vault client");
            Ok(client)
        })
    }
}

/// Split `<mount>/<path>` into its parts
fn split_mount(name: &str) -> Result<(&str, &str)> {
    let name = name.trim_start_matches('/');
    match name.split_once('/') {
        Some((mount, path)) if !mount.is_empty() => Ok((mount, path)),
        _ => Err(Error::configuration(format!(
            "Vault locator '{name}' must be <mount>/<path>"
        ))),
    }
}

fn is_missing(err: &ClientError) -> bool {
    matches!(err, ClientError::APIError { code: 404, .. })
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn list_secrets(&self, prefix: &str, _scope: &StoreScope) -> Result<Vec<String>> {
        let (mount, root) = split_mount(prefix)?;
        let client = self.client()?;

        // Walk folders breadth first; listing only works on whole folders
        let folder = match root.rfind('/') {
            Some(i) => &root[..=i],
            None => "",
        };
        let mut names = Vec::new();
        let mut pending = VecDeque::from([folder.to_string()]);
        while let Some(folder) = pending.pop_front() {
            let children = match kv2::list(client, mount, &folder).await {
                Ok(children) => children,
                Err(e) if is_missing(&e) => continue,
                Err(e) => {
                    error!(mount = %mount, folder = %folder, error = %e, "Failed to list Vault secrets");
                    return Err(Error::backend(BACKEND, format!("listing '{mount}/{folder}': {e}")));
                }
            };
            for child in children {
                let path = format!("{folder}{child}");
                if child.ends_with('/') {
                    pending.push_back(path);
                } else {
                    names.push(format!("{mount}/{path}"));
                }
            }
        }

        debug!(prefix = %prefix, count = names.len(), "Listed Vault secrets");
        Ok(names)
    }

    async fn get_secret(&self, name: &str, _scope: &StoreScope) -> Result<String> {
        let (mount, path) = split_mount(name)?;
        let client = self.client()?;

        let data: serde_json::Value = kv2::read(client, mount, path).await.map_err(|e| {
            if is_missing(&e) {
                Error::not_found(name)
            } else {
                error!(secret = %name, error = %e, "Failed to read Vault secret");
                Error::backend(BACKEND, format!("reading '{name}': {e}"))
            }
        })?;
        Ok(data.to_string())
    }
}
