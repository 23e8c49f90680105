//! Login credentials

use std::fmt;

/// Login endpoint and user credentials, immutable for the run
#[derive(Clone)]
pub struct Credentials {
    /// Login endpoint, e.g. `https://login.salesforce.com`
    pub endpoint_url: String,
    pub username: String,
    /// Password with the security token appended where the org requires one
    pub password: String,
}

impl Credentials {
    pub fn new(
        endpoint_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint_url", &self.endpoint_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
