//! Launch parameters (the receiver's query string)
//!
//! The receiver is started with a launch URL or bare query string such as
//! `?server=http://host:8095&player_id=kitchen`. Resolvers only see the
//! [`LaunchParams`] trait so they can be tested without a real launch URL.

use std::collections::HashMap;

use tracing::{debug, warn};
use url::Url;

/// Read-only view over one-shot launch parameters
pub trait LaunchParams {
    /// First value for `key`, or `None` when absent or empty
    fn get(&self, key: &str) -> Option<String>;
}

/// Parsed query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse either a full launch URL (`http://host/receiver?server=...`) or
    /// a bare query string (`?server=...` or `server=...`).
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let query = match Url::parse(input) {
            Ok(url) => url.query().unwrap_or_default().to_string(),
            Err(_) => input.trim_start_matches('?').to_string(),
        };

        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            // Matches URLSearchParams.get(): the first occurrence wins
            if params.values.contains_key(key.as_ref()) {
                warn!(key = %key, "Duplicate launch parameter ignored");
                continue;
            }
            params.values.insert(key.into_owned(), value.into_owned());
        }
        debug!(count = params.values.len(), "Parsed launch parameters");
        params
    }

    /// Set or replace a parameter (used for CLI flag overrides)
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }
}

impl LaunchParams for QueryParams {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
