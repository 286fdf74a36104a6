use std::{path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{Paginator, DEFAULT_SERVER_URL};
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "posts";
pub const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub notification_duration_ms: u64,
    pub log_filter: String,
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            page_size: 5,
            page_size_options: vec![5, 10, 20],
            notification_duration_ms: 3000,
            log_filter: "info".into(),
            offline: false,
        }
    }
}

impl Settings {
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    pub fn paginator(&self) -> anyhow::Result<Paginator> {
        Paginator::new(self.page_size, self.page_size_options.clone())
            .context("invalid page size settings")
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.paginator()?;
        if !self.offline {
            Url::parse(&self.server_url)
                .with_context(|| format!("invalid server_url '{}'", self.server_url))?;
        }
        if self.notification_duration_ms == 0 {
            bail!("notification_duration_ms must be positive");
        }
        Ok(())
    }
}

/// Defaults, then `posts.toml` (or `explicit_file`), then `APP__*` variables.
pub fn load_settings(explicit_file: Option<&Path>) -> anyhow::Result<Settings> {
    build_settings(explicit_file, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("page_size_options")
}

fn build_settings(explicit_file: Option<&Path>, env: Environment) -> anyhow::Result<Settings> {
    let file = match explicit_file {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    let settings: Settings = Config::builder()
        .add_source(file)
        .add_source(env)
        .build()
        .context("failed to read settings")?
        .try_deserialize()
        .context("failed to parse settings")?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
