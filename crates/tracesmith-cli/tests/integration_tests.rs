use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn tracesmith() -> Command {
    Command::cargo_bin("tracesmith").expect("Failed to find tracesmith binary")
}

fn parse_stdout(stdout: &[u8]) -> Value {
    let text = String::from_utf8_lossy(stdout);
    serde_json::from_str(&text).expect("Failed to parse JSON output")
}

fn spans(batch: &Value) -> &Vec<Value> {
    batch["resourceSpans"][0]["scopeSpans"][0]["spans"]
        .as_array()
        .expect("batch carries no span array")
}

fn span_names(batch: &Value) -> Vec<&str> {
    spans(batch)
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect()
}

fn attr<'a>(span: &'a Value, key: &str) -> Option<&'a Value> {
    span["attributes"]
        .as_array()?
        .iter()
        .find(|kv| kv["key"] == key)
        .map(|kv| &kv["value"])
}

#[test]
fn parse_claude_fixture_prints_otlp_batch() {
    let output = tracesmith()
        .arg("parse")
        .arg("--provider")
        .arg("claude")
        .arg(fixture("claude_session.jsonl"))
        .output()
        .expect("Failed to run parse");

    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let batch = parse_stdout(&output.stdout);
    assert_eq!(
        span_names(&batch),
        vec!["claude.session", "claude.session.meta", "claude.tool.Bash"]
    );

    let root = &spans(&batch)[0];
    assert_eq!(root["traceId"], "3f2a9c417b8e4d059a126c3e8f504b77");
    assert_eq!(
        attr(root, "session.id").unwrap()["stringValue"],
        "3f2a9c41-7b8e-4d05-9a12-6c3e8f504b77"
    );
    assert_eq!(attr(root, "model").unwrap()["stringValue"], "claude-sonnet-4-5");
    assert_eq!(attr(root, "tokens.input").unwrap()["intValue"], 2500);
    assert_eq!(attr(root, "tokens.output").unwrap()["intValue"], 90);
    assert_eq!(attr(root, "tokens.cache_read").unwrap()["intValue"], 1700);
    assert_eq!(attr(root, "tool.calls").unwrap()["intValue"], 1);
    assert_eq!(attr(root, "tool.errors").unwrap()["intValue"], 0);
    assert_eq!(
        attr(root, "termination.reason").unwrap()["stringValue"],
        "end_turn"
    );

    let tool = &spans(&batch)[2];
    assert_eq!(tool["parentSpanId"], root["spanId"]);
    assert_eq!(attr(tool, "tool.command").unwrap()["stringValue"], "ls");
    assert_eq!(tool["status"], serde_json::json!({}));

    let resource_attrs = &batch["resourceSpans"][0]["resource"]["attributes"];
    assert_eq!(resource_attrs[0]["key"], "service.name");
    assert_eq!(resource_attrs[0]["value"]["stringValue"], "claude-code");
}

#[test]
fn parse_detects_provider_from_log_shape() {
    let output = tracesmith()
        .arg("parse")
        .arg(fixture("claude_session.jsonl"))
        .output()
        .expect("Failed to run parse");

    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let batch = parse_stdout(&output.stdout);
    assert_eq!(span_names(&batch)[0], "claude.session");
}

#[test]
fn parse_codex_fixture_prints_otlp_batch() {
    let output = tracesmith()
        .arg("parse")
        .arg("--provider")
        .arg("codex")
        .arg(fixture(
            "rollout-2024-03-01T08-00-00-0195b2c3-aa11-7def-8123-456789abcdef.jsonl",
        ))
        .output()
        .expect("Failed to run parse");

    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let batch = parse_stdout(&output.stdout);
    assert_eq!(
        span_names(&batch),
        vec!["codex.session", "codex.session.meta", "codex.tool.shell"]
    );

    let root = &spans(&batch)[0];
    assert_eq!(root["traceId"], "0195b2c3aa117def8123456789abcdef");
    assert_eq!(attr(root, "model").unwrap()["stringValue"], "gpt-5-codex");
    assert_eq!(attr(root, "git.branch").unwrap()["stringValue"], "main");
    assert_eq!(attr(root, "tokens.input").unwrap()["intValue"], 5200);
    assert_eq!(attr(root, "tokens.cache_read").unwrap()["intValue"], 1100);
    assert_eq!(attr(root, "tokens.reasoning").unwrap()["intValue"], 180);
    assert_eq!(attr(root, "thinking.blocks").unwrap()["intValue"], 1);

    let tool = &spans(&batch)[2];
    assert_eq!(tool["status"], serde_json::json!({}));
    assert_eq!(
        attr(tool, "tool.command").unwrap()["stringValue"],
        "cargo test"
    );
}

#[test]
fn parse_gemini_fixture_prints_otlp_batch() {
    let output = tracesmith()
        .arg("parse")
        .arg("--provider")
        .arg("gemini")
        .arg(fixture("session-2024-05-01T09-00-7d1f3e2a.json"))
        .output()
        .expect("Failed to run parse");

    assert!(
        output.status.success(),
        "parse failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let batch = parse_stdout(&output.stdout);
    assert_eq!(
        span_names(&batch),
        vec!["gemini.session", "gemini.session.meta", "gemini.tool.read_file"]
    );

    let root = &spans(&batch)[0];
    assert_eq!(attr(root, "model").unwrap()["stringValue"], "gemini-2.5-pro");
    assert_eq!(attr(root, "tokens.input").unwrap()["intValue"], 3200);
    assert_eq!(attr(root, "tokens.cache_read").unwrap()["intValue"], 1500);
    assert_eq!(attr(root, "tokens.reasoning").unwrap()["intValue"], 96);
    assert_eq!(attr(root, "thinking.blocks").unwrap()["intValue"], 1);
}

#[test]
fn parse_is_deterministic_across_invocations() {
    let run = || {
        let output = tracesmith()
            .arg("parse")
            .arg("--provider")
            .arg("claude")
            .arg(fixture("claude_session.jsonl"))
            .output()
            .expect("Failed to run parse");
        assert!(output.status.success());
        output.stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn parse_fails_for_a_log_without_session_id() {
    tracesmith()
        .arg("parse")
        .arg("--provider")
        .arg("claude")
        .arg(fixture("no_session_id.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse session log"));
}

#[test]
fn parse_fails_for_a_missing_file() {
    tracesmith()
        .arg("parse")
        .arg("--provider")
        .arg("claude")
        .arg("/nonexistent/session.jsonl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn run_dry_run_prints_batch_without_exporting() {
    let output = tracesmith()
        .arg("run")
        .arg("--provider")
        .arg("claude")
        .arg("--log-file")
        .arg(fixture("claude_session.jsonl"))
        .arg("--service")
        .arg("my-service")
        .arg("--dry-run")
        .output()
        .expect("Failed to run");

    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let batch = parse_stdout(&output.stdout);
    assert_eq!(span_names(&batch)[0], "claude.session");
    let resource_attrs = &batch["resourceSpans"][0]["resource"]["attributes"];
    assert_eq!(resource_attrs[0]["value"]["stringValue"], "my-service");
}

#[test]
fn run_reads_hook_payload_from_stdin() {
    let payload = format!(
        r#"{{"session_id": "3f2a9c41-7b8e-4d05-9a12-6c3e8f504b77", "transcript_path": "{}"}}"#,
        fixture("claude_session.jsonl").display()
    );

    let output = tracesmith()
        .arg("run")
        .arg("--dry-run")
        .write_stdin(payload)
        .output()
        .expect("Failed to run");

    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let batch = parse_stdout(&output.stdout);
    assert_eq!(span_names(&batch)[0], "claude.session");
}

#[test]
fn run_discovers_log_under_configured_root() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_root = temp_dir.path().join("projects");
    let project_dir = log_root.join("-home-dev-project");
    fs::create_dir_all(&project_dir).expect("Failed to create log dirs");
    fs::copy(
        fixture("claude_session.jsonl"),
        project_dir.join("3f2a9c41-7b8e-4d05-9a12-6c3e8f504b77.jsonl"),
    )
    .expect("Failed to copy fixture");

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!("[providers.claude]\nlog_root = \"{}\"\n", log_root.display()),
    )
    .expect("Failed to write config");

    let output = tracesmith()
        .arg("--config")
        .arg(&config_path)
        .arg("run")
        .arg("--provider")
        .arg("claude")
        .arg("--session-id")
        .arg("3f2a9c41-7b8e-4d05-9a12-6c3e8f504b77")
        .arg("--dry-run")
        .output()
        .expect("Failed to run");

    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let batch = parse_stdout(&output.stdout);
    assert!(span_names(&batch).contains(&"claude.tool.Bash"));
}

#[test]
fn run_with_nothing_to_read_fails() {
    let output = tracesmith()
        .arg("run")
        .write_stdin("{}")
        .output()
        .expect("Failed to run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no session log known"), "stderr: {stderr}");
}

#[test]
fn transmit_swallows_unreachable_collectors() {
    // Nothing listens on port 9; the command must still exit cleanly.
    tracesmith()
        .arg("transmit")
        .arg("--url")
        .arg("http://127.0.0.1:9/v1/traces")
        .write_stdin(r#"{"resourceSpans":[]}"#)
        .assert()
        .success();
}
