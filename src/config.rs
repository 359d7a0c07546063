use url::Url;

use crate::error::{Error, Result};

pub const ENV_STORE_URL: &str = "SUPABASE_URL";
pub const ENV_API_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_EMPLOYEES_TABLE: &str = "HONDUPAY_EMPLOYEES_TABLE";

pub const DEFAULT_EMPLOYEES_TABLE: &str = "employees";

/// Connection settings for the hosted data store.
#[derive(Clone)]
pub struct StoreConfig {
    /// Project URL, always ending in `/`.
    pub url: Url,
    pub api_key: String,
    pub employees_table: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("employees_table", &self.employees_table)
            .finish()
    }
}

impl StoreConfig {
    /// Creates a configuration for the project at `url`.
    pub fn new(url: &str, api_key: impl Into<String>) -> Result<Self> {
        let mut url = Url::parse(url).map_err(|e| Error::Config {
            variable: ENV_STORE_URL,
            reason: e.to_string(),
        })?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config {
                variable: ENV_API_KEY,
                reason: "the API key is empty".to_string(),
            });
        }

        Ok(Self {
            url,
            api_key,
            employees_table: DEFAULT_EMPLOYEES_TABLE.to_string(),
        })
    }

    #[must_use]
    pub fn with_employees_table(mut self, table: impl Into<String>) -> Self {
        self.employees_table = table.into();
        self
    }

    /// Reads `SUPABASE_URL`, `SUPABASE_ANON_KEY` and, optionally,
    /// `HONDUPAY_EMPLOYEES_TABLE` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |variable: &'static str| {
            lookup(variable).ok_or_else(|| Error::Config {
                variable,
                reason: "the variable is not set".to_string(),
            })
        };

        let config = Self::new(&require(ENV_STORE_URL)?, require(ENV_API_KEY)?)?;
        Ok(match lookup(ENV_EMPLOYEES_TABLE) {
            Some(table) if !table.trim().is_empty() => config.with_employees_table(table.trim()),
            _ => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_required_variables() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_STORE_URL, "https://demo.supabase.co"),
            (ENV_API_KEY, "anon-key"),
        ]))
        .unwrap();

        assert_eq!(config.url.as_str(), "https://demo.supabase.co/");
        assert_eq!(config.employees_table, DEFAULT_EMPLOYEES_TABLE);
    }

    #[test]
    fn table_override_and_path_normalisation() {
        let config = StoreConfig::from_lookup(lookup(&[
            (ENV_STORE_URL, "http://127.0.0.1:54321/project"),
            (ENV_API_KEY, "anon-key"),
            (ENV_EMPLOYEES_TABLE, "staff"),
        ]))
        .unwrap();

        assert_eq!(config.url.as_str(), "http://127.0.0.1:54321/project/");
        assert_eq!(config.employees_table, "staff");
    }

    #[test]
    fn missing_key_names_the_variable() {
        let err = StoreConfig::from_lookup(lookup(&[(ENV_STORE_URL, "https://demo.supabase.co")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config { variable: ENV_API_KEY, .. }));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = StoreConfig::new("https://demo.supabase.co", "secret-key").unwrap();
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
