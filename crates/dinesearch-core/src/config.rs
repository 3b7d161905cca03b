use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::projection::{EXCERPT_FRAGMENTS, EXCERPT_FRAGMENT_SIZE};
use crate::types::Language;

pub const ENV_PREFIX: &str = "DINESEARCH_";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Merges defaults, `config.toml`, `config.<env>.toml` from `dir` and `DINESEARCH_*` variables.
    pub fn load_from(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn settings(&self) -> crate::error::Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub index: IndexSettings,
    pub search: SearchSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub dir: String,
    pub language: Language,
    pub writer_memory_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub page_size: usize,
    pub facet_size: usize,
    /// Path the facet links point at.
    pub nav_path: String,
    pub excerpt_fragment_size: usize,
    pub excerpt_fragments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { dir: "./data/index".to_string(), language: Language::English, writer_memory_bytes: 50_000_000 }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            facet_size: crate::facet::DEFAULT_TERMS_SIZE,
            nav_path: "/search/facets".to_string(),
            excerpt_fragment_size: EXCERPT_FRAGMENT_SIZE,
            excerpt_fragments: EXCERPT_FRAGMENTS,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        let search = &self.search;
        let checks = [
            (search.page_size == 0, "search.page_size must be positive"),
            (search.facet_size == 0, "search.facet_size must be positive"),
            (search.excerpt_fragment_size == 0, "search.excerpt_fragment_size must be positive"),
            (search.excerpt_fragments == 0, "search.excerpt_fragments must be positive"),
            (self.index.dir.trim().is_empty(), "index.dir must not be blank"),
        ];
        match checks.into_iter().find(|(failed, _)| *failed) {
            Some((_, message)) => Err(Error::InvalidConfig(message.to_string())),
            None => Ok(()),
        }
    }

    /// Index directory, expanded and resolved against `base`.
    pub fn index_dir(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.index.dir)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
