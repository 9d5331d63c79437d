//! Lightweight configuration loader.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys in env vars are separated by `__` (`APP_RANKING__CAPACITY=500`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;
use std::path::Path;

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment })
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)).into())
    }

    /// Like [`Config::get`], but a missing section yields `T::default()`.
    /// A present but malformed section is still an error.
    pub fn get_or_default<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() {
            return Ok(T::default());
        }
        self.get(key)
    }
}
