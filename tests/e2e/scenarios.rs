use super::helpers::{TestWorkspace, MIT_TEXT, UNREACHABLE_API};
use serde_json::json;
use std::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_GO_MOD: &str = "module example.com/app\n\ngo 1.21\n\nrequire (\n  github.com/foo/bar v1.0.0\n  github.com/baz/qux v2.0.0\n)\n";

const APP_GRAPH: &str = "mod@v0 github.com/foo/bar@v1.0.0\nmod@v0 github.com/baz/qux@v2.0.0\n";

const APP_REPORT: &str = "# Direct gomod dependencies\n\
                          \n\
                          ## app\n\
                          - [github.com/baz/qux](https://github.com/baz/qux) (Apache-2.0)\n\
                          - [github.com/foo/bar](https://github.com/foo/bar) (MIT)\n\
                          \n\
                          # Consolidated go mod graph dependencies\n\
                          - [github.com/baz/qux](https://github.com/baz/qux) (Apache-2.0)\n\
                          - [github.com/foo/bar](https://github.com/foo/bar) (MIT)\n";

/// Workspace with one project: foo/bar in the module cache, baz/qux only remote
fn app_workspace() -> TestWorkspace {
    let workspace = TestWorkspace::new();
    workspace.add_project("app", APP_GO_MOD, APP_GRAPH);
    workspace.add_cached_module("github.com/foo/bar@v1.0.0", MIT_TEXT);
    workspace
}

async fn mount_repo(server: &MockServer, repo: &str, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}", repo)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_local_and_remote_licenses() {
    let server = MockServer::start().await;
    mount_repo(&server, "baz/qux", 200, json!({"license": {"spdx_id": "Apache-2.0"}})).await;
    let workspace = app_workspace();
    workspace.write_config(&server.uri());

    let output = workspace.run(&[]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), APP_REPORT);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_is_sent_as_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/baz/qux"))
        .and(query_param("access_token", "test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"license": {"spdx_id": "Apache-2.0"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let workspace = app_workspace();
    workspace.write_config(&server.uri());

    let output = workspace.run(&["report"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(Apache-2.0)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_token_is_not_sent() {
    let server = MockServer::start().await;
    mount_repo(&server, "baz/qux", 200, json!({"license": {"spdx_id": "Apache-2.0"}})).await;
    let workspace = app_workspace();
    workspace.write_config(&server.uri());

    let output = workspace.run_with_token(&["report"], "");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(Apache-2.0)"));

    let requests = server.received_requests().await.expect("request recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query_pairs().all(|(key, _)| key != "access_token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rate_limited_module_is_not_found() {
    let server = MockServer::start().await;
    mount_repo(&server, "rate/limited", 403, json!({"message": "API rate limit exceeded"})).await;
    let workspace = TestWorkspace::new();
    workspace.add_project(
        "app",
        "module example.com/app\n\nrequire (\n  github.com/foo/bar v1.0.0\n  github.com/rate/limited v1.0.0\n)\n",
        "mod@v0 github.com/foo/bar@v1.0.0\nmod@v0 github.com/rate/limited@v1.0.0\n",
    );
    workspace.add_cached_module("github.com/foo/bar@v1.0.0", MIT_TEXT);
    workspace.write_config(&server.uri());

    let output = workspace.run(&["report"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- github.com/rate/limited@v1.0.0: NOT FOUND\n"));
    assert!(!stdout.contains("rate limit exceeded"));
    assert!(!stdout.contains("[github.com/rate/limited]"));
    assert!(stdout.contains("- [github.com/foo/bar](https://github.com/foo/bar) (MIT)"));
}

#[test]
fn test_malformed_graph_line_is_skipped() {
    let workspace = TestWorkspace::new();
    workspace.add_project(
        "app",
        APP_GO_MOD,
        "mod@v0 github.com/foo/bar@v1.0.0\nmod@v0 github.com/odd/line@v1.0.0 extra\n\nmod@v0 github.com/baz/qux@v2.0.0\n",
    );
    workspace.add_cached_module("github.com/foo/bar@v1.0.0", MIT_TEXT);
    workspace.add_cached_module("github.com/baz/qux@v2.0.0", MIT_TEXT);
    workspace.write_config(UNREACHABLE_API);

    let output = workspace.run(&["report", "--format", "table"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "github.com/baz/qux MIT\ngithub.com/foo/bar MIT\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed module graph line"));
}

#[test]
fn test_projects_list_only_direct_dependencies() {
    let workspace = TestWorkspace::new();
    workspace.add_project(
        "api",
        "module example.com/api\n\nrequire (\n  github.com/foo/bar v1.0.0\n  golang.org/x/text v0.3.0 // indirect\n)\n",
        "example.com/api github.com/foo/bar@v1.0.0\ngithub.com/foo/bar@v1.0.0 golang.org/x/text@v0.3.0\n",
    );
    workspace.add_project(
        "worker",
        "module example.com/worker\n\nrequire (\n  github.com/foo/bar v1.2.0\n)\n",
        "example.com/worker github.com/foo/bar@v1.2.0\n",
    );
    workspace.add_cached_module("github.com/foo/bar@v1.0.0", MIT_TEXT);
    workspace.add_cached_module("github.com/foo/bar@v1.2.0", MIT_TEXT);
    workspace.add_cached_module(
        "golang.org/x/text@v0.3.0",
        "Redistribution and use in source and binary forms, with or without modification.\nNeither the name of Google Inc. nor the names of its contributors may be used to endorse or promote products.",
    );
    workspace.write_config(UNREACHABLE_API);

    let output = workspace.run(&[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let (direct, consolidated) = stdout
        .split_once("# Consolidated go mod graph dependencies\n")
        .expect("consolidated section");

    let api = direct.split("## api\n").nth(1).unwrap().split("## worker").next().unwrap();
    assert_eq!(api.trim(), "- [github.com/foo/bar](https://github.com/foo/bar) (MIT)");
    let worker = direct.split("## worker\n").nth(1).unwrap();
    assert_eq!(worker.trim(), "- [github.com/foo/bar](https://github.com/foo/bar) (MIT)");

    // both versions of foo/bar collapse into one line
    assert_eq!(
        consolidated,
        "- [github.com/foo/bar](https://github.com/foo/bar) (MIT)\n\
         - [golang.org/x/text](https://golang.org/x/text) (BSD-3-Clause)\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_report() {
    let server = MockServer::start().await;
    mount_repo(
        &server,
        "baz/qux",
        200,
        json!({"license": {"name": "Apache License 2.0", "spdx_id": "Apache-2.0"}}),
    )
    .await;
    let workspace = app_workspace();
    workspace.write_config(&server.uri());

    let output = workspace.run(&["report", "--format", "json"]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["projects"][0]["name"], "app");
    assert_eq!(report["projects"][0]["dependencies"].as_array().unwrap().len(), 2);
    assert_eq!(report["consolidated"][0]["module"], "github.com/baz/qux");
    assert_eq!(report["consolidated"][0]["license"], "Apache-2.0");
    assert_eq!(report["summary"]["total_modules"], 2);
    assert_eq!(report["summary"]["remote"], 1);
    assert_eq!(report["summary"]["not_found"], 0);
    assert!(report["generated_at"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_remote_flag_skips_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"license": {"spdx_id": "Apache-2.0"}})))
        .expect(0)
        .mount(&server)
        .await;
    let workspace = app_workspace();
    workspace.write_config(&server.uri());

    let output = workspace.run(&["report", "--no-remote"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Apache-2.0"));
    assert!(stdout.contains("- github.com/baz/qux@v2.0.0: NOT FOUND"));
}

#[test]
fn test_quiet_still_prints_report() {
    let workspace = app_workspace();
    workspace.add_cached_module("github.com/baz/qux@v2.0.0", MIT_TEXT);
    workspace.write_config(UNREACHABLE_API);

    let output = workspace.run(&["-q"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# Direct gomod dependencies\n"));
    assert!(stdout.contains("- [github.com/baz/qux](https://github.com/baz/qux) (MIT)\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_graph_command_failure_is_fatal() {
    let workspace = TestWorkspace::new();
    workspace.add_project("app", APP_GO_MOD, APP_GRAPH);
    fs::remove_file(workspace.dir.path().join("app/graph.txt")).unwrap();
    workspace.write_config(UNREACHABLE_API);

    let output = workspace.run(&[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read module graph of app"));
}

#[test]
fn test_init_then_validate() {
    let workspace = TestWorkspace::new();

    let init = workspace.run(&["init"]);
    assert!(init.status.success());
    assert!(workspace.dir.path().join(".gomod-license-report.toml").exists());

    let validate = workspace.run(&["config", "--validate"]);
    assert!(validate.status.success());
    assert!(String::from_utf8_lossy(&validate.stdout).contains("Configuration is valid"));
}

#[test]
fn test_config_is_read_from_projects_directory() {
    let workspace = TestWorkspace::new();
    let projects = workspace.dir.path().join("projects");
    fs::create_dir_all(&projects).unwrap();
    fs::write(projects.join(".gomod-license-report.toml"), "format = \"table\"\n").unwrap();

    let show = workspace.run(&["config", "--show", "projects"]);
    assert!(show.status.success());
    let config: serde_json::Value = serde_json::from_slice(&show.stdout).unwrap();
    assert_eq!(config["format"], "table");

    let cwd_show = workspace.run(&["config", "--show"]);
    let config: serde_json::Value = serde_json::from_slice(&cwd_show.stdout).unwrap();
    assert_eq!(config["format"], "markdown");

    fs::write(projects.join(".gomod-license-report.toml"), "format = [").unwrap();
    let validate = workspace.run(&["config", "--validate", "projects"]);
    assert!(!validate.status.success());
    assert!(String::from_utf8_lossy(&validate.stderr).contains("Configuration validation failed"));
}

#[test]
fn test_init_writes_into_projects_directory() {
    let workspace = TestWorkspace::new();
    fs::create_dir_all(workspace.dir.path().join("projects")).unwrap();

    let init = workspace.run(&["init", "projects"]);

    assert!(init.status.success());
    assert!(workspace.dir.path().join("projects/.gomod-license-report.toml").exists());
    assert!(!workspace.dir.path().join(".gomod-license-report.toml").exists());
}
