//! insightarc: command-line client for The insightArc content repository.
#![deny(clippy::all, clippy::pedantic)]

use std::{process, sync::Arc};

use insightarc::{
    application::{error::AppError, repository::ContentRepository},
    cache::{FileStore, KeyValueStore, LocalCache, MemoryStore},
    config::{self, BlogsCmd, Command, InspirationsCmd, Settings},
    infra::{error::InfraError, github::GithubGateway, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, debug, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    telemetry::init(&settings.logging)?;
    debug!(
        target = "insightarc::bootstrap",
        github = ?settings.github,
        cache_enabled = settings.cache.enabled,
        "Configuration loaded"
    );

    let repository = build_repository(&settings)?;
    let use_cache = settings.cache.enabled;

    match cli_args.command {
        Command::Blogs(cmd) => match cmd.action {
            BlogsCmd::List => print_json(&repository.list_blogs(use_cache).await?),
            BlogsCmd::Get { file_name } => {
                print_json(&repository.blog_content(&file_name, use_cache).await?)
            }
            BlogsCmd::Find { id } => match repository.find_blog(&id).await? {
                Some(item) => print_json(&item),
                None => Err(AppError::not_found(format!("blog `{id}`"))),
            },
        },
        Command::Inspirations(cmd) => match cmd.action {
            InspirationsCmd::List => print_json(&repository.list_inspirations(use_cache).await?),
        },
        Command::Search(args) => print_json(&repository.search(&args.query, use_cache).await?),
    }
}

fn build_repository(settings: &Settings) -> Result<ContentRepository, AppError> {
    let store: Arc<dyn KeyValueStore> = if settings.cache.enabled {
        Arc::new(FileStore::open(&settings.cache.path).map_err(InfraError::from)?)
    } else {
        Arc::new(MemoryStore::new())
    };
    let cache = Arc::new(LocalCache::new(store));
    let gateway = Arc::new(GithubGateway::new(&settings.github)?);

    Ok(ContentRepository::new(
        gateway,
        cache,
        settings.sources.clone(),
    ))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::unexpected(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}
