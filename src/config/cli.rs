use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the insightArc binary.
#[derive(Debug, Parser)]
#[command(
    name = "insightarc",
    version,
    about = "The insightArc content client",
    long_about = None
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "INSIGHTARC_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Blog listing and posts.
    Blogs(BlogsArgs),
    /// Inspiration listing.
    Inspirations(InspirationsArgs),
    /// Search titles, authors, categories and tags of both listings.
    Search(SearchArgs),
}

#[derive(Debug, Args, Clone)]
pub struct BlogsArgs {
    #[command(subcommand)]
    pub action: BlogsCmd,
}

#[derive(Debug, Subcommand, Clone)]
pub enum BlogsCmd {
    /// List blog metadata.
    List,
    /// Fetch one post's frontmatter and Markdown body.
    Get {
        /// File name below the blog base path, with or without `.md`.
        #[arg(value_name = "FILE_NAME")]
        file_name: String,
    },
    /// Look up a listing entry by id, bypassing the cache.
    Find {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Args, Clone)]
pub struct InspirationsArgs {
    #[command(subcommand)]
    pub action: InspirationsCmd,
}

#[derive(Debug, Subcommand, Clone)]
pub enum InspirationsCmd {
    /// List inspiration metadata.
    List,
}

#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Case-insensitive substring to look for.
    #[arg(value_name = "QUERY")]
    pub query: String,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Path to a file containing the GitHub access token (takes precedence over env).
    #[arg(long = "github-token-file", env = "INSIGHTARC_GITHUB_TOKEN_FILE", value_name = "PATH")]
    pub github_token_file: Option<PathBuf>,

    /// GitHub access token from env (CLI flag hidden to keep tokens out of shell history).
    #[arg(long = "github-token-env", hide = true, env = "GITHUB_TOKEN")]
    pub github_token_env: Option<String>,

    /// Override the content repository branch.
    #[arg(long = "branch", value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Override the GitHub API base URL.
    #[arg(long = "api-base", value_name = "URL")]
    pub api_base: Option<String>,

    /// Override the cache file location.
    #[arg(long = "cache-path", value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Neither read nor write the cache.
    #[arg(long = "no-cache", action = clap::ArgAction::SetTrue)]
    pub no_cache: bool,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
