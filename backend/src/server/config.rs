//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use url::Url;

/// Credentials and endpoint for the completion collaborator.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Chat-completions endpoint.
    pub endpoint: Url,
    /// API key sent as a bearer credential.
    pub api_key: String,
    /// Model requested for every completion.
    pub model: String,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) completions: Option<CompletionConfig>,
    pub(crate) identity_endpoint: Option<Url>,
}

impl ServerConfig {
    /// Construct a server configuration with fixture collaborators.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            completions: None,
            identity_endpoint: None,
        }
    }

    /// Attach the completion collaborator.
    ///
    /// Without one the server falls back to the echo fixture, which is only
    /// useful for local development and tests.
    #[must_use]
    pub fn with_completions(mut self, completions: CompletionConfig) -> Self {
        self.completions = Some(completions);
        self
    }

    /// Attach the identity provider's token lookup endpoint.
    ///
    /// Without one the server accepts any non-empty bearer token as its own
    /// account id, which is only useful for local development and tests.
    #[must_use]
    pub fn with_identity_endpoint(mut self, endpoint: Url) -> Self {
        self.identity_endpoint = Some(endpoint);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
