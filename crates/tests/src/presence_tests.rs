use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn connect_greets_and_answers_ping() {
    let app = TestApp::spawn().await;
    let mut ws = app.ws().await;
    assert!(!ws.connection_id.is_empty());

    ws.send("ping", Value::Null).await;
    let pong = ws.recv().await;
    assert_eq!(pong, json!({ "type": "pong" }));
}

#[tokio::test]
async fn join_roster_and_leave() {
    let app = TestApp::spawn().await;

    let (mut al, roster) = app.join("r1", "u1", "Al").await;
    assert_eq!(roster, json!([]));

    let (mut bo, roster) = app.join("r1", "u2", "Bo").await;
    assert_eq!(roster, json!([{ "id": "u1", "name": "Al", "avatar": null }]));

    let joined = al.expect("presence:join").await;
    assert_eq!(joined, json!({ "id": "u2", "name": "Bo", "avatar": null }));
    bo.assert_silent().await;

    bo.close().await;
    let left = al.expect("presence:leave").await;
    assert_eq!(left["id"], "u2");
}

#[tokio::test]
async fn rooms_are_isolated() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut cy, _) = app.join("r7", "u3", "Cy").await;

    al.send("chat:message", json!({ "text": "only r1" })).await;
    al.expect("chat:message").await;
    cy.assert_silent().await;
}

#[tokio::test]
async fn avatar_update_broadcasts_presence_update() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut bo, _) = app.join("r1", "u2", "Bo").await;
    al.expect("presence:join").await;

    bo.send("avatar:update", json!({ "avatar": { "skin": "fox" } })).await;
    let expected = json!({ "id": "u2", "name": "Bo", "avatar": { "skin": "fox" } });
    assert_eq!(al.expect("presence:update").await, expected);
    assert_eq!(bo.expect("presence:update").await, expected);

    // A later joiner sees the new avatar in the roster.
    let (_cy, roster) = app.join("r1", "u3", "Cy").await;
    assert_eq!(roster[1]["avatar"], json!({ "skin": "fox" }));
}

#[tokio::test]
async fn malformed_frames_are_dropped_without_closing() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;

    al.send_raw("{not json".to_string()).await;
    al.send("chat:message", json!({ "text": 5 })).await;
    al.send("nope:nope", json!({})).await;
    al.assert_silent().await;

    al.send("ping", Value::Null).await;
    assert_eq!(al.recv().await["type"], "pong");
}

#[tokio::test]
async fn events_before_join_are_ignored() {
    let app = TestApp::spawn().await;
    let mut ws = app.ws().await;

    ws.send("doc:update", json!({ "text": "ghost" })).await;
    ws.send("doc:requestState", Value::Null).await;
    ws.assert_silent().await;

    let (mut al, _) = app.join("r1", "u1", "Al").await;
    al.send("doc:requestState", Value::Null).await;
    assert_eq!(al.expect("doc:state").await, json!({ "text": "" }));
}
