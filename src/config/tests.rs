use std::io::Write;

use super::*;

fn cli(args: &[&str]) -> CliArgs {
    CliArgs::parse_from(std::iter::once("insightarc").chain(args.iter().copied()))
}

#[test]
fn defaults_point_at_public_content_repository() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.github.api_base.as_str(), "https://api.github.com/");
    assert_eq!(settings.github.owner, "TeazTheHano");
    assert_eq!(settings.github.repo, "theInsightArcContent");
    assert_eq!(settings.github.branch, "main");
    assert!(settings.github.token.is_none());
    assert_eq!(settings.github.timeout, Duration::from_secs(30));
    assert_eq!(settings.sources.blog.base_path, "blogs");
    assert_eq!(settings.sources.inspiration.base_path, "inspirations");
    assert!((settings.sources.blog.cache_expire_hours - 1.0 / 60.0).abs() < f64::EPSILON);
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.path, PathBuf::from(".insightarc-cache.json"));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.github.branch = Some("main".to_string());
    raw.logging.level = Some("info".to_string());
    raw.cache.enabled = Some(true);

    let overrides = Overrides {
        branch: Some("drafts".to_string()),
        log_level: Some("debug".to_string()),
        no_cache: true,
        ..Default::default()
    };

    raw.apply_overrides(&overrides).expect("overrides");
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.github.branch, "drafts");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(!settings.cache.enabled);
}

#[test]
fn token_file_wins_over_env_token() {
    let mut file = tempfile::NamedTempFile::new().expect("tmp file");
    file.write_all(b"  from-file\n").expect("write token");

    let mut raw = RawSettings::default();
    raw.github.token = Some("from-config".to_string());
    let overrides = Overrides {
        github_token_file: Some(file.path().to_path_buf()),
        github_token_env: Some("from-env".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides).expect("overrides");
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.github.token.as_deref(), Some("from-file"));
}

#[test]
fn missing_token_file_is_reported() {
    let mut raw = RawSettings::default();
    let overrides = Overrides {
        github_token_file: Some(PathBuf::from("/definitely/not/here/token")),
        ..Default::default()
    };

    let err = raw.apply_overrides(&overrides).expect_err("missing file");
    assert!(matches!(err, LoadError::TokenFile { .. }));
}

#[test]
fn blank_token_is_absent() {
    let mut raw = RawSettings::default();
    raw.github.token = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.github.token.is_none());
}

#[test]
fn repository_shorthand_sets_owner_and_repo() {
    let mut raw = RawSettings::default();
    raw.github.owner = Some("ignored".to_string());
    raw.github.repository = Some("someone/notes".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.github.owner, "someone");
    assert_eq!(settings.github.repo, "notes");
}

#[test]
fn malformed_repository_is_rejected() {
    let mut raw = RawSettings::default();
    raw.github.repository = Some("no-slash".to_string());
    let err = Settings::from_raw(raw).expect_err("invalid repository");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "github.repository",
            ..
        }
    ));
}

#[test]
fn invalid_api_base_is_rejected() {
    let mut raw = RawSettings::default();
    raw.github.api_base = Some("not a url".to_string());
    let err = Settings::from_raw(raw).expect_err("invalid url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "github.api_base",
            ..
        }
    ));
}

#[test]
fn zero_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.github.timeout_seconds = Some(0);
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn non_finite_expiry_is_rejected() {
    let mut raw = RawSettings::default();
    raw.inspiration.cache_expire_hours = Some(f64::NAN);
    let err = Settings::from_raw(raw).expect_err("nan expiry");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "inspiration.cache_expire_hours",
            ..
        }
    ));
}

#[test]
fn negative_expiry_is_accepted() {
    let mut raw = RawSettings::default();
    raw.blog.cache_expire_hours = Some(-1.0);
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.sources.blog.cache_expire_hours < 0.0);
}

#[test]
fn empty_base_path_is_rejected() {
    let mut raw = RawSettings::default();
    raw.blog.base_path = Some("/".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = Overrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides).expect("overrides");
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn debug_output_redacts_token() {
    let mut raw = RawSettings::default();
    raw.github.token = Some("ghp_secret".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    let rendered = format!("{:?}", settings.github);
    assert!(!rendered.contains("ghp_secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn config_file_is_layered_under_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp config");
    writeln!(
        file,
        "[github]\nbranch = \"preview\"\nrepository = \"me/site-content\"\n\n[blog]\nbase_path = \"posts\"\ncache_expire_hours = 2.5\n"
    )
    .expect("write config");

    let path = file.path().to_string_lossy().into_owned();
    let args = cli(&["--config-file", &path, "--no-cache", "blogs", "list"]);
    let settings = load(&args).expect("settings");

    assert_eq!(settings.github.branch, "preview");
    assert_eq!(settings.github.owner, "me");
    assert_eq!(settings.github.repo, "site-content");
    assert_eq!(settings.sources.blog.base_path, "posts");
    assert!((settings.sources.blog.cache_expire_hours - 2.5).abs() < f64::EPSILON);
    assert!(!settings.cache.enabled);
}

#[test]
fn parse_blog_commands() {
    match cli(&["blogs", "get", "hello-world"]).command {
        Command::Blogs(BlogsArgs {
            action: BlogsCmd::Get { file_name },
        }) => assert_eq!(file_name, "hello-world"),
        other => panic!("wrong command parsed: {other:?}"),
    }

    match cli(&["blogs", "find", "abc123"]).command {
        Command::Blogs(BlogsArgs {
            action: BlogsCmd::Find { id },
        }) => assert_eq!(id, "abc123"),
        other => panic!("wrong command parsed: {other:?}"),
    }
}

#[test]
fn parse_search_with_overrides() {
    let args = cli(&[
        "--branch",
        "drafts",
        "--cache-path",
        "/tmp/ia-cache.json",
        "--log-json",
        "true",
        "search",
        "rust",
    ]);

    assert_eq!(args.overrides.branch.as_deref(), Some("drafts"));
    assert_eq!(
        args.overrides.cache_path.as_deref(),
        Some(std::path::Path::new("/tmp/ia-cache.json"))
    );
    assert_eq!(args.overrides.log_json, Some(true));
    match args.command {
        Command::Search(search) => assert_eq!(search.query, "rust"),
        other => panic!("wrong command parsed: {other:?}"),
    }
}

#[test]
fn parse_inspirations_list() {
    assert!(matches!(
        cli(&["inspirations", "list"]).command,
        Command::Inspirations(InspirationsArgs {
            action: InspirationsCmd::List
        })
    ));
}
