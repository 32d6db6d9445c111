//! OpenSearch connection configuration.

/// Connection settings for an OpenSearch cluster.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// The cluster URL (e.g., "http://localhost:9200").
    pub url: String,
    /// Basic-auth username, if the cluster requires authentication.
    pub username: Option<String>,
    /// Basic-auth password, paired with `username`.
    pub password: Option<String>,
}

impl ConnectionConfig {
    /// Create a configuration for an unauthenticated cluster.
    ///
    /// # Arguments
    ///
    /// * `url` - The cluster URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Attach basic-auth credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Credentials to send, if both halves are configured.
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}
