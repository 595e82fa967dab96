//! Bearer token acquisition for Microsoft Graph

use crate::config::{GraphConfig, SecretString};
use crate::domain::{ArxError, GraphError, Result};
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// OAuth scope covering the application permissions granted to the app registration
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Source of the `Authorization: Bearer` token
pub enum TokenProvider {
    /// Token supplied in configuration
    Static(SecretString),
    /// Client credentials flow against Entra ID
    ClientSecret(Arc<ClientSecretCredential>),
}

impl TokenProvider {
    /// Pick the provider for a Graph configuration
    ///
    /// A configured `access_token` wins over client credentials.
    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        if let Some(token) = &config.access_token {
            if !token.expose_secret().is_empty() {
                tracing::info!("Using configured Graph access token");
                return Ok(Self::Static(token.clone()));
            }
        }

        let tenant_id = config.tenant_id.as_deref().ok_or_else(|| {
            ArxError::Configuration(
                "graph.tenant_id is required for client credentials".to_string(),
            )
        })?;
        let client_id = config.client_id.clone().ok_or_else(|| {
            ArxError::Configuration(
                "graph.client_id is required for client credentials".to_string(),
            )
        })?;
        let client_secret = config.client_secret.as_ref().ok_or_else(|| {
            ArxError::Configuration(
                "graph.client_secret is required for client credentials".to_string(),
            )
        })?;

        let secret = azure_core::credentials::Secret::new(
            client_secret.expose_secret().as_ref().to_string(),
        );

        let credential = ClientSecretCredential::new(tenant_id, client_id, secret, None)
            .map_err(|e| {
                ArxError::Graph(GraphError::AuthenticationFailed(format!(
                    "Failed to create client secret credential: {e}"
                )))
            })?;

        tracing::info!(tenant_id = %tenant_id, "Using client credentials for Graph");

        Ok(Self::ClientSecret(credential))
    }

    /// Current bearer token
    pub async fn bearer(&self) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.expose_secret().as_ref().to_string()),
            Self::ClientSecret(credential) => {
                let token = TokenCredential::get_token(&**credential, &[GRAPH_SCOPE], None)
                    .await
                    .map_err(|e| {
                        ArxError::Graph(GraphError::AuthenticationFailed(format!(
                            "Failed to acquire Graph token: {e}"
                        )))
                    })?;
                Ok(token.token.secret().to_string())
            }
        }
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("TokenProvider::Static([REDACTED])"),
            Self::ClientSecret(_) => f.write_str("TokenProvider::ClientSecret"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[tokio::test]
    async fn test_static_token_wins() {
        let config = GraphConfig {
            access_token: Some(secret_string("abc".to_string())),
            tenant_id: Some("t".to_string()),
            ..Default::default()
        };

        let provider = TokenProvider::from_config(&config).unwrap();
        assert!(matches!(provider, TokenProvider::Static(_)));
        assert_eq!(provider.bearer().await.unwrap(), "abc");
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let result = TokenProvider::from_config(&GraphConfig::default());
        assert!(matches!(result, Err(ArxError::Configuration(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let provider = TokenProvider::Static(secret_string("very-secret".to_string()));
        assert!(!format!("{provider:?}").contains("very-secret"));
    }
}
