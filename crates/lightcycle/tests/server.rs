//! End-to-end tests: a real server on an ephemeral port, driven by a
//! tokio-tungstenite client speaking the JSON protocol.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use lightcycle::prelude::*;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Game rules with no lower bound on move spacing, so tests can play
/// without sleeping between moves.
fn relaxed_rules() -> GameConfig {
    GameConfig {
        min_move_interval: Duration::ZERO,
        ..GameConfig::default()
    }
}

/// Starts a server on a random port and returns the address.
async fn start_server(builder: LightcycleServerBuilder) -> String {
    let server = builder
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");
    let addr = server.local_addr().expect("local addr").to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

/// Sends one request and waits for its response.
async fn call(ws: &mut ClientWs, seq: u64, body: Value) -> Value {
    let frame = json!({ "seq": seq, "body": body });
    ws.send(Message::text(frame.to_string())).await.unwrap();
    next_frame(ws).await
}

async fn next_frame(ws: &mut ClientWs) -> Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("response within timeout")
        .expect("stream open")
        .expect("valid frame");
    serde_json::from_slice(&msg.into_data()).expect("response is JSON")
}

async fn start_game(ws: &mut ClientWs) -> String {
    let resp = call(ws, 1, json!({ "type": "start_game" })).await;
    assert_eq!(resp["body"]["type"], "game_started");
    resp["body"]["session_id"].as_str().unwrap().to_owned()
}

fn move_req(session_id: &str, x: i32, y: i32) -> Value {
    json!({
        "type": "move",
        "session_id": session_id,
        "position": { "x": x, "y": y },
    })
}

fn score_req(session_id: &str, x: i32, y: i32, score: i64) -> Value {
    json!({
        "type": "submit_score",
        "session_id": session_id,
        "final_position": { "x": x, "y": y },
        "score": score,
    })
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_full_game_over_websocket() {
    let addr = start_server(LightcycleServer::builder().game_config(relaxed_rules())).await;
    let mut ws = connect(&addr).await;

    let id = start_game(&mut ws).await;
    assert_eq!(id.len(), 32);

    for (i, x) in (20..25).enumerate() {
        let resp = call(&mut ws, 10 + i as u64, move_req(&id, x, 20)).await;
        assert_eq!(resp["seq"], 10 + i as u64);
        assert_eq!(
            resp["body"],
            json!({ "type": "move_recorded", "status": "recorded" })
        );
    }

    // Ran off the right edge.
    let resp = call(&mut ws, 20, score_req(&id, 40, 20, 777)).await;
    assert_eq!(
        resp["body"],
        json!({
            "type": "score_accepted",
            "message": "Score processed successfully",
            "score": 5,
            "new_high_score": false,
            "high_score": 500,
            "status": "accepted",
        })
    );

    // The session is frozen now.
    let resp = call(&mut ws, 21, move_req(&id, 25, 20)).await;
    assert_eq!(resp["body"]["code"], 409);
    assert_eq!(resp["body"]["kind"], "inactive_session");
}

#[tokio::test]
async fn test_invalid_crash_is_rejected() {
    let addr = start_server(LightcycleServer::builder().game_config(relaxed_rules())).await;
    let mut ws = connect(&addr).await;
    let id = start_game(&mut ws).await;
    for y in 1..=3 {
        call(&mut ws, 2, move_req(&id, 1, y)).await;
    }

    let resp = call(&mut ws, 3, score_req(&id, 10, 10, 3)).await;

    assert_eq!(
        resp["body"],
        json!({
            "type": "error",
            "code": 400,
            "kind": "invalid_crash",
            "message": "Invalid game over state - crash location not valid",
        })
    );
}

#[tokio::test]
async fn test_moves_too_fast_with_default_rules() {
    let addr = start_server(LightcycleServer::builder()).await;
    let mut ws = connect(&addr).await;
    let id = start_game(&mut ws).await;

    call(&mut ws, 2, move_req(&id, 1, 1)).await;
    let resp = call(&mut ws, 3, move_req(&id, 1, 2)).await;

    assert_eq!(resp["body"]["kind"], "too_fast");
    assert_eq!(resp["body"]["code"], 429);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let addr = start_server(LightcycleServer::builder()).await;
    let mut ws = connect(&addr).await;

    let resp = call(&mut ws, 7, score_req("invalid-session-id", -1, 0, 50)).await;

    assert_eq!(resp["seq"], 7);
    assert_eq!(resp["body"]["code"], 404);
    assert_eq!(resp["body"]["message"], "Invalid session ID");
}

#[tokio::test]
async fn test_malformed_json_keeps_connection_open() {
    let addr = start_server(LightcycleServer::builder()).await;
    let mut ws = connect(&addr).await;

    ws.send(Message::text("{not json")).await.unwrap();
    let resp = next_frame(&mut ws).await;
    assert_eq!(resp["seq"], 0);
    assert_eq!(resp["body"]["kind"], "malformed_input");
    assert_eq!(resp["body"]["message"], "Invalid JSON payload");

    // A well-formed envelope with an unknown type still echoes its seq.
    let resp = call(&mut ws, 42, json!({ "type": "teleport" })).await;
    assert_eq!(resp["seq"], 42);
    assert_eq!(resp["body"]["code"], 400);

    // And the connection still works.
    start_game(&mut ws).await;
}

#[tokio::test]
async fn test_binary_frames_are_accepted() {
    let addr = start_server(LightcycleServer::builder()).await;
    let mut ws = connect(&addr).await;

    let frame = json!({ "seq": 5, "body": { "type": "leaderboard" } });
    ws.send(Message::binary(frame.to_string().into_bytes()))
        .await
        .unwrap();
    let resp = next_frame(&mut ws).await;

    assert_eq!(
        resp["body"],
        json!({ "type": "leaderboard", "high_score": 500, "top_player": "ARC" })
    );
}

#[tokio::test]
async fn test_new_high_score_visible_to_other_clients() {
    let rules = GameConfig {
        seed_high_score: 2,
        ..relaxed_rules()
    };
    let addr = start_server(LightcycleServer::builder().game_config(rules)).await;
    let mut player = connect(&addr).await;
    let mut spectator = connect(&addr).await;

    let id = start_game(&mut player).await;
    for x in 0..3 {
        call(&mut player, 2, move_req(&id, x, 0)).await;
    }
    let resp = call(&mut player, 3, score_req(&id, 0, -1, 3)).await;
    assert_eq!(resp["body"]["new_high_score"], true);

    let resp = call(&mut spectator, 1, json!({ "type": "leaderboard" })).await;
    assert_eq!(resp["body"]["high_score"], 3);
    assert_eq!(resp["body"]["top_player"], "CHALLENGER");
}

#[tokio::test]
async fn test_logs_record_startup_connection_and_session() {
    let addr = start_server(LightcycleServer::builder()).await;
    let mut ws = connect(&addr).await;
    let id = start_game(&mut ws).await;

    let resp = call(&mut ws, 2, json!({ "type": "logs" })).await;
    let logs: Vec<String> = serde_json::from_value(resp["body"]["logs"].clone()).unwrap();

    assert_eq!(
        logs[0],
        format!("Light Cycle Racer server starting on {addr}")
    );
    assert!(logs.iter().any(|l| l.starts_with("Player accessed game from IP: 127.0.0.1")));
    assert!(logs.contains(&format!("New game session started: {id}")));
}

#[tokio::test]
async fn test_idle_connection_is_closed() {
    let addr = start_server(
        LightcycleServer::builder().idle_timeout(Duration::from_millis(100)),
    )
    .await;
    let mut ws = connect(&addr).await;

    let next = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("server should close the idle connection");

    match next {
        None | Some(Ok(Message::Close(_))) | Some(Err(_)) => {}
        Some(Ok(other)) => panic!("unexpected frame {other:?}"),
    }
}
