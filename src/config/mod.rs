//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;
#[cfg(test)]
mod tests;

use std::{fmt, fs, io, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::content::{ContentSource, ContentSources};

pub use cli::{
    BlogsArgs, BlogsCmd, CliArgs, Command, InspirationsArgs, InspirationsCmd, Overrides,
    SearchArgs,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "insightarc";
const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_OWNER: &str = "TeazTheHano";
const DEFAULT_REPO: &str = "theInsightArcContent";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BLOG_BASE_PATH: &str = "blogs";
const DEFAULT_INSPIRATION_BASE_PATH: &str = "inspirations";
/// One minute.
const DEFAULT_CACHE_EXPIRE_HOURS: f64 = 1.0 / 60.0;
const DEFAULT_CACHE_PATH: &str = ".insightarc-cache.json";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub github: GithubSettings,
    pub sources: ContentSources,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone)]
pub struct GithubSettings {
    pub api_base: Url,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for GithubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubSettings")
            .field("api_base", &self.api_base.as_str())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to read token file {path}: {source}")]
    TokenFile { path: String, source: io::Error },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("INSIGHTARC").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides)?;

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    github: RawGithubSettings,
    blog: RawContentSettings,
    inspiration: RawContentSettings,
    cache: RawCacheSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawGithubSettings {
    api_base: Option<String>,
    owner: Option<String>,
    repo: Option<String>,
    /// `owner/name`; wins over `owner` and `repo`.
    repository: Option<String>,
    branch: Option<String>,
    token: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    base_path: Option<String>,
    cache_expire_hours: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), LoadError> {
        if let Some(path) = overrides.github_token_file.as_ref() {
            let token = fs::read_to_string(path).map_err(|source| LoadError::TokenFile {
                path: path.display().to_string(),
                source,
            })?;
            self.github.token = Some(token.trim().to_string());
        } else if let Some(token) = overrides.github_token_env.as_ref() {
            self.github.token = Some(token.clone());
        }
        if let Some(branch) = overrides.branch.as_ref() {
            self.github.branch = Some(branch.clone());
        }
        if let Some(api_base) = overrides.api_base.as_ref() {
            self.github.api_base = Some(api_base.clone());
        }
        if let Some(path) = overrides.cache_path.as_ref() {
            self.cache.path = Some(path.clone());
        }
        if overrides.no_cache {
            self.cache.enabled = Some(false);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        Ok(())
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            github,
            blog,
            inspiration,
            cache,
            logging,
        } = raw;

        let github = build_github_settings(github)?;
        let sources = ContentSources {
            blog: build_content_source(
                blog,
                DEFAULT_BLOG_BASE_PATH,
                "blog.base_path",
                "blog.cache_expire_hours",
            )?,
            inspiration: build_content_source(
                inspiration,
                DEFAULT_INSPIRATION_BASE_PATH,
                "inspiration.base_path",
                "inspiration.cache_expire_hours",
            )?,
        };
        let cache = build_cache_settings(cache)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            github,
            sources,
            cache,
            logging,
        })
    }
}

fn build_github_settings(github: RawGithubSettings) -> Result<GithubSettings, LoadError> {
    let api_base_raw = github
        .api_base
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let api_base = Url::parse(api_base_raw.trim())
        .map_err(|err| LoadError::invalid("github.api_base", format!("failed to parse: {err}")))?;
    if api_base.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "github.api_base",
            "URL must be hierarchical (e.g. https://api.github.com)",
        ));
    }

    let (owner, repo) = match non_blank(github.repository) {
        Some(repository) => match repository.split_once('/') {
            Some((owner, repo)) if !owner.trim().is_empty() && !repo.trim().is_empty() => {
                (owner.trim().to_string(), repo.trim().to_string())
            }
            _ => {
                return Err(LoadError::invalid(
                    "github.repository",
                    format!("expected `owner/name`, got `{repository}`"),
                ));
            }
        },
        None => (
            non_blank(github.owner).unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            non_blank(github.repo).unwrap_or_else(|| DEFAULT_REPO.to_string()),
        ),
    };

    let branch = non_blank(github.branch).unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let token = non_blank(github.token);

    let timeout_secs = github.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "github.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(GithubSettings {
        api_base,
        owner,
        repo,
        branch,
        token,
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn build_content_source(
    raw: RawContentSettings,
    default_base_path: &str,
    base_path_key: &'static str,
    expire_key: &'static str,
) -> Result<ContentSource, LoadError> {
    let base_path = raw
        .base_path
        .unwrap_or_else(|| default_base_path.to_string());
    if base_path.trim().trim_matches('/').is_empty() {
        return Err(LoadError::invalid(base_path_key, "path must not be empty"));
    }

    let expire_hours = raw
        .cache_expire_hours
        .unwrap_or(DEFAULT_CACHE_EXPIRE_HOURS);
    if !expire_hours.is_finite() {
        return Err(LoadError::invalid(expire_key, "must be a finite number"));
    }

    Ok(ContentSource::new(base_path.trim(), expire_hours))
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let path = cache
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_PATH));
    if path.as_os_str().is_empty() {
        return Err(LoadError::invalid("cache.path", "path must not be empty"));
    }

    Ok(CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        path,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
