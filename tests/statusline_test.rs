mod common;

use common::{MockRunner, Sandbox, installed, status_map};
use proto_statusline::app::{DataSource, StatusLine};
use proto_statusline::config::{ConfigLoader, load_config_file};
use proto_statusline::models::ConfigMode;
use proto_statusline::proto::{ProtoError, StatusFetcher};

const CONFIG: &str = r#"{
    // plain template keeps assertions readable
    "template": "{{ tool }} {{ resolved_version }} ",
    "tools": {},
    "cache": { "ttl": 300 },
}"#;

const STATUS_JSON: &str = r#"{
    "node": { "is_installed": true, "resolved_version": "24.0.0", "config_version": "~24", "config_source": "/p/.prototools" },
    "go": { "is_installed": true, "resolved_version": "1.26.0", "product_dir": "/home/u/.proto/tools/go/1.26.0" }
}"#;

const OUTDATED_JSON: &str = r#"{
    "node": { "is_latest": false, "is_outdated": true, "newest_version": "24.3.0", "latest_version": "25.0.0" }
}"#;

fn app(sandbox: &Sandbox, runner: MockRunner, refresh: bool) -> StatusLine<MockRunner> {
    StatusLine::new(
        runner,
        ConfigLoader::new(&sandbox.config_path),
        Some(sandbox.hasher()),
        refresh,
    )
}

#[tokio::test]
async fn fetch_status_serves_cache_without_running_proto() {
    let sandbox = Sandbox::new(CONFIG);
    sandbox.seed_cache(status_map(&[("node", "24.0.0")]), ConfigMode::Upwards, 5);

    let config = load_config_file(&sandbox.config_path).unwrap();
    let runner = MockRunner::new("{}", "{}");
    let store = sandbox.store(false);
    let fetcher = StatusFetcher::new(&runner, &store);

    let status = fetcher.fetch_status(&config).await.unwrap();
    assert_eq!(status["node"], installed("24.0.0"));
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn refresh_runs_proto_and_overwrites_cache() {
    let sandbox = Sandbox::new(CONFIG);
    sandbox.seed_cache(status_map(&[("node", "22.0.0")]), ConfigMode::Upwards, 5);

    let runner = MockRunner::new(
        r#"{"node": {"is_installed": true, "resolved_version": "24.0.0"}}"#,
        "{}",
    );
    let mut app = app(&sandbox, runner, true);
    let report = app.run().await;

    assert_eq!(report.output, "node 24.0.0");
    assert_eq!(report.source, Some(DataSource::Proto));
    assert_eq!(app.runner().call_count(), 2);

    let doc = sandbox.store(false).read().unwrap();
    let entry = &doc.entries.unwrap()[&sandbox.hasher().fingerprint(ConfigMode::Upwards)];
    assert_eq!(
        entry.status_data.as_ref().unwrap()["node"],
        installed("24.0.0")
    );
}

#[tokio::test]
async fn miss_fetches_both_reports_and_caches_them() {
    let sandbox = Sandbox::new(CONFIG);
    let mut app = app(&sandbox, MockRunner::new(STATUS_JSON, OUTDATED_JSON), false);

    let report = app.run().await;
    assert_eq!(report.output, "go 1.26.0 node 24.0.0");
    assert_eq!(report.tool_count, 2);

    let mut calls = app.runner().calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            vec!["outdated".to_string(), "--json".to_string()],
            vec!["status".to_string(), "--json".to_string()],
        ]
    );

    let hit = sandbox.store(false).lookup(&load_config_file(&sandbox.config_path).unwrap());
    let hit = hit.unwrap();
    assert_eq!(hit.status_data.unwrap().len(), 2);
    assert!(hit.outdated_data.unwrap()["node"].is_outdated);
}

#[tokio::test]
async fn second_run_is_served_from_cache() {
    let sandbox = Sandbox::new(CONFIG);

    let mut first = app(&sandbox, MockRunner::new(STATUS_JSON, OUTDATED_JSON), false);
    let expected = first.render().await;

    let mut second = app(&sandbox, MockRunner::new("{}", "{}"), false);
    let report = second.run().await;
    assert_eq!(report.output, expected);
    assert_eq!(report.source, Some(DataSource::Cache));
    assert_eq!(second.runner().call_count(), 0);
}

#[tokio::test]
async fn config_mode_flags_are_passed_through() {
    let sandbox = Sandbox::new(r#"{ "config_mode": "upwards-global" }"#);
    let mut app = app(&sandbox, MockRunner::new(STATUS_JSON, "{}"), false);
    app.render().await;

    for call in app.runner().calls() {
        assert_eq!(&call[1..], ["--json", "--config-mode", "all"]);
    }
}

#[tokio::test]
async fn empty_mode_adds_no_flags() {
    let sandbox = Sandbox::new(r#"{ "config_mode": "" }"#);
    let mut app = app(&sandbox, MockRunner::new(STATUS_JSON, "{}"), false);
    app.render().await;

    let calls = app.runner().calls();
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert_eq!(call.len(), 2);
    }
}

#[tokio::test]
async fn misspelled_mode_still_renders_without_flags() {
    let sandbox = Sandbox::new(r#"{ "config_mode": "Upward", "template": "{{ tool }} " }"#);
    let mut app = app(&sandbox, MockRunner::new(STATUS_JSON, "{}"), false);

    assert_eq!(app.render().await, "go node");
    for call in app.runner().calls() {
        assert_eq!(call.len(), 2);
    }
}

#[tokio::test]
async fn unavailable_proto_renders_nothing() {
    let sandbox = Sandbox::new(CONFIG);
    let mut runner = MockRunner::new(STATUS_JSON, OUTDATED_JSON);
    runner.available = false;
    let mut app = app(&sandbox, runner, false);

    assert_eq!(app.render().await, "");
    assert_eq!(app.runner().call_count(), 0);
}

#[tokio::test]
async fn broken_config_renders_nothing() {
    let sandbox = Sandbox::new(r#"{ "tools": [ }"#);
    let mut app = app(&sandbox, MockRunner::new(STATUS_JSON, OUTDATED_JSON), false);
    assert_eq!(app.render().await, "");
    assert_eq!(app.runner().call_count(), 0);
}

#[tokio::test]
async fn status_failure_renders_nothing_and_skips_cache() {
    let sandbox = Sandbox::new(CONFIG);
    let mut runner = MockRunner::new(STATUS_JSON, OUTDATED_JSON);
    runner.status = Err(1);
    let mut app = app(&sandbox, runner, false);

    let report = app.run().await;
    assert_eq!(report.output, "");
    assert!(!sandbox.cache_path().exists());
}

#[tokio::test]
async fn malformed_status_is_an_error() {
    let sandbox = Sandbox::new(CONFIG);
    let config = load_config_file(&sandbox.config_path).unwrap();
    let runner = MockRunner::new("not json", "{}");
    let store = sandbox.store(false);

    let err = StatusFetcher::new(&runner, &store)
        .fetch_status(&config)
        .await
        .unwrap_err();
    assert!(matches!(err, ProtoError::Payload { subcommand: "status", .. }));
}

#[tokio::test]
async fn outdated_failure_degrades_to_empty() {
    let sandbox = Sandbox::new(CONFIG);
    let config = load_config_file(&sandbox.config_path).unwrap();
    let store = sandbox.store(false);

    let mut failing = MockRunner::new(STATUS_JSON, "");
    failing.outdated = Err(1);
    assert!(StatusFetcher::new(&failing, &store).fetch_outdated(&config).await.is_empty());

    let garbage = MockRunner::new(STATUS_JSON, "[1, 2");
    assert!(StatusFetcher::new(&garbage, &store).fetch_outdated(&config).await.is_empty());

    // and the segment still renders
    let mut runner = MockRunner::new(STATUS_JSON, "");
    runner.outdated = Err(1);
    let mut app = app(&sandbox, runner, false);
    assert_eq!(app.render().await, "go 1.26.0 node 24.0.0");
}

#[tokio::test]
async fn no_tools_renders_nothing() {
    let sandbox = Sandbox::new(CONFIG);
    let mut app = app(&sandbox, MockRunner::new("{}", "{}"), false);
    let report = app.run().await;
    assert_eq!(report.output, "");
    assert_eq!(report.tool_count, 0);
    // nothing worth caching
    assert!(!sandbox.cache_path().exists());
}

#[tokio::test]
async fn missing_config_is_bootstrapped() {
    let sandbox = Sandbox::new("{}");
    let config_path = sandbox.tmp.path().join("fresh").join("config.jsonc");
    let mut app = StatusLine::new(
        MockRunner::new(STATUS_JSON, OUTDATED_JSON),
        ConfigLoader::new(&config_path),
        Some(sandbox.hasher()),
        false,
    );

    let out = app.render().await;
    assert!(config_path.exists());
    assert!(out.contains("24.0.0"));
    assert!(out.contains("1.26.0"));
}
