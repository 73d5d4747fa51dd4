use std::{env, fmt::Debug};

pub const DEFAULT_API_KEY_ENV: &str = "AMAP_API_KEY";

/// Key-value lookup for the AMap API key.
pub trait CredentialProvider: Send + Sync + Debug {
    /// Current key, if any. Blank keys are treated as missing by the caller.
    fn api_key(&self) -> Option<String>;

    /// Where the key is expected to come from, for error messages.
    fn source(&self) -> String;
}

/// Reads the key from an environment variable on every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_ENV)
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok()
    }

    fn source(&self) -> String {
        format!("the {} environment variable", self.var)
    }
}

/// Fixed key, or a fixed absence of one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self(Some(api_key.into()))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }

    fn source(&self) -> String {
        "the configured credentials".to_string()
    }
}
