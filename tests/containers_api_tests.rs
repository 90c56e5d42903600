// Container endpoints against in-memory adapters

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::test_server;

async fn create(server: &axum_test::TestServer, body: Value) -> String {
    let response = server.post("/api/docker/containers").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    let json: Value = response.json();
    json["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_inspect_start_stats_flow() {
    let (server, _) = test_server();
    let id = create(&server, json!({ "name": "t1", "image": "alpine:latest" })).await;
    assert_eq!(id.len(), 64);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let detail: Value = server
        .get(&format!("/api/docker/containers/{}", id))
        .await
        .json();
    assert_eq!(detail["state"], "created");
    assert_eq!(detail["name"], "t1");

    let started = server
        .post(&format!("/api/docker/containers/{}/start", id))
        .await;
    started.assert_status_ok();
    started.assert_json(&json!({ "message": "container started" }));

    let stats: Value = server
        .get(&format!("/api/docker/containers/{}/stats", id))
        .await
        .json();
    assert!(stats["cpu_percent"].as_f64().unwrap() >= 0.0);
    assert!(stats["memory_limit"].as_u64().unwrap() > 0);
    for key in [
        "memory_usage",
        "memory_percent",
        "network_in",
        "network_out",
        "block_read",
        "block_write",
        "pids",
    ] {
        assert!(stats.get(key).is_some(), "missing {}", key);
    }
}

#[tokio::test]
async fn create_returns_warnings_array() {
    let (server, _) = test_server();
    let response = server
        .post("/api/docker/containers")
        .json(&json!({ "name": "w", "image": "alpine" }))
        .await;
    let json: Value = response.json();
    assert_eq!(json["warnings"], json!([]));
}

#[tokio::test]
async fn create_forwards_port_bindings_and_volumes() {
    let (server, fakes) = test_server();
    create(
        &server,
        json!({
            "name": "web",
            "image": "nginx:latest",
            "ports": [{ "host_port": "8080", "container_port": "80", "protocol": "tcp" }],
            "env": ["MODE=prod"],
            "volumes": ["web-data:/usr/share/nginx/html:ro"],
            "labels": { "app": "web" },
            "restart_policy": "unless-stopped"
        }),
    )
    .await;

    let created = fakes.containers.created.lock().unwrap();
    let spec = &created[0];
    assert_eq!(spec.ports.len(), 1);
    assert_eq!(spec.ports[0].private_port, 80);
    assert_eq!(spec.ports[0].public_port, 8080);
    assert_eq!(spec.ports[0].kind, "tcp");
    assert_eq!(spec.binds, vec!["web-data:/usr/share/nginx/html:ro"]);
    assert_eq!(spec.env, vec!["MODE=prod"]);
    assert_eq!(spec.restart_policy, "unless-stopped");
}

#[tokio::test]
async fn create_rejects_bad_port_and_missing_fields() {
    let (server, _) = test_server();
    server
        .post("/api/docker/containers")
        .json(&json!({ "image": "alpine" }))
        .await
        .assert_status_bad_request();
    server
        .post("/api/docker/containers")
        .json(&json!({
            "name": "x",
            "image": "alpine",
            "ports": [{ "container_port": "eighty" }]
        }))
        .await
        .assert_status_bad_request();
    server
        .post("/api/docker/containers")
        .json(&json!({ "name": "x", "image": "alpine", "restart_policy": "sometimes" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn create_conflict_is_500() {
    let (server, _) = test_server();
    create(&server, json!({ "name": "dup", "image": "alpine" })).await;
    let response = server
        .post("/api/docker/containers")
        .json(&json!({ "name": "dup", "image": "alpine" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().starts_with("failed to create container dup: Conflict"));
}

#[tokio::test]
async fn list_returns_names_without_slash() {
    let (server, _) = test_server();
    create(&server, json!({ "name": "one", "image": "alpine" })).await;
    create(&server, json!({ "name": "two", "image": "alpine" })).await;
    let list: Vec<Value> = server.get("/api/docker/containers").await.json();
    assert_eq!(list.len(), 2);
    for c in &list {
        assert!(!c["name"].as_str().unwrap().starts_with('/'));
        assert!(c.get("ports").is_some());
        assert!(c.get("mounts").is_some());
    }
}

#[tokio::test]
async fn inspect_unknown_is_404() {
    let (server, _) = test_server();
    let response = server.get("/api/docker/containers/missing").await;
    response.assert_status_not_found();
    response.assert_json(&json!({
        "error": "failed to inspect container missing: No such container: missing"
    }));
}

#[tokio::test]
async fn delete_is_204_then_500() {
    let (server, _) = test_server();
    let id = create(&server, json!({ "name": "gone", "image": "alpine" })).await;
    let path = format!("/api/docker/containers/{}", id);
    server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&path)
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn stop_accepts_optional_body() {
    let (server, fakes) = test_server();
    let id = create(&server, json!({ "name": "s", "image": "alpine" })).await;
    let path = format!("/api/docker/containers/{}/stop", id);

    let response = server.post(&path).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "message": "container stopped" }));

    server
        .post(&path)
        .json(&json!({ "timeout": 3 }))
        .await
        .assert_status_ok();

    server
        .post(&path)
        .json(&json!({ "timeout": -1 }))
        .await
        .assert_status_ok();

    server
        .post(&path)
        .content_type("application/json")
        .text("{\"timeout\":")
        .await
        .assert_status_bad_request();

    let stops = fakes.containers.stops.lock().unwrap();
    assert_eq!(stops.len(), 3);
    assert_eq!(stops[0].1, None);
    assert_eq!(stops[1].1, Some(3));
    assert_eq!(stops[2].1, Some(-1));
}

#[tokio::test]
async fn restart_unknown_is_500() {
    let (server, _) = test_server();
    server
        .post("/api/docker/containers/missing/restart")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn logs_binds_query() {
    let (server, fakes) = test_server();
    let id = create(&server, json!({ "name": "l", "image": "alpine" })).await;
    let response = server
        .get(&format!("/api/docker/containers/{}/logs", id))
        .add_query_param("since", "1700000000")
        .add_query_param("tail", "50")
        .add_query_param("follow", "false")
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "logs": ["starting", "ready"] }));

    let logs = fakes.containers.logs.lock().unwrap();
    let opts = &logs[0].1;
    assert_eq!(opts.since, Some(1_700_000_000));
    assert_eq!(opts.until, None);
    assert_eq!(opts.tail, "50");
    assert!(!opts.follow);
}

#[tokio::test]
async fn logs_tail_defaults_to_all() {
    let (server, fakes) = test_server();
    let id = create(&server, json!({ "name": "l2", "image": "alpine" })).await;
    server
        .get(&format!("/api/docker/containers/{}/logs", id))
        .await
        .assert_status_ok();
    assert_eq!(fakes.containers.logs.lock().unwrap()[0].1.tail, "all");
}

#[tokio::test]
async fn logs_rejects_invalid_filters() {
    let (server, _) = test_server();
    let id = create(&server, json!({ "name": "l3", "image": "alpine" })).await;
    let path = format!("/api/docker/containers/{}/logs", id);
    server
        .get(&path)
        .add_query_param("since", "someday")
        .await
        .assert_status_bad_request();
    server
        .get(&path)
        .add_query_param("tail", "many")
        .await
        .assert_status_bad_request();
    server
        .get(&path)
        .add_query_param("follow", "maybe")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn exec_returns_output_and_exit_code() {
    let (server, fakes) = test_server();
    let id = create(&server, json!({ "name": "e", "image": "alpine" })).await;
    let response = server
        .post(&format!("/api/docker/containers/{}/exec", id))
        .json(&json!({ "command": ["echo", "hi"], "attach_stdout": true, "attach_stderr": true }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "output": "echo hi\n", "exit_code": 0 }));
    let execs = fakes.containers.execs.lock().unwrap();
    assert_eq!(execs[0].1.command, vec!["echo", "hi"]);
    assert!(execs[0].1.attach_stderr);
}

#[tokio::test]
async fn exec_requires_command() {
    let (server, _) = test_server();
    server
        .post("/api/docker/containers/abc/exec")
        .json(&json!({ "command": [] }))
        .await
        .assert_status_bad_request();
}
