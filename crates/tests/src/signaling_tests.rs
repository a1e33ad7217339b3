use crate::fixtures::test_app::TestApp;
use serde_json::json;

#[tokio::test]
async fn signal_reaches_only_the_addressed_peer() {
    let app = TestApp::spawn().await;
    let (mut u1, _) = app.join("r2", "u1", "One").await;
    let (mut u2, _) = app.join("r2", "u2", "Two").await;
    let (mut u3, _) = app.join("r2", "u3", "Three").await;
    u1.expect("presence:join").await;
    u1.expect("presence:join").await;
    u2.expect("presence:join").await;

    u1.send(
        "webrtc:signal",
        json!({ "to": "u2", "from": "u1", "data": { "sdp": "x" } }),
    )
    .await;

    assert_eq!(
        u2.expect("webrtc:signal").await,
        json!({ "from": "u1", "data": { "sdp": "x" } })
    );
    u1.assert_silent().await;
    u3.assert_silent().await;
}

#[tokio::test]
async fn signal_to_departed_peer_is_dropped() {
    let app = TestApp::spawn().await;
    let (mut u1, _) = app.join("r2", "u1", "One").await;
    let (u2, _) = app.join("r2", "u2", "Two").await;
    u1.expect("presence:join").await;

    u2.close().await;
    u1.expect("presence:leave").await;

    u1.send("webrtc:signal", json!({ "to": "u2", "data": { "candidate": "c" } })).await;
    u1.assert_silent().await;
}

#[tokio::test]
async fn signal_does_not_cross_rooms() {
    let app = TestApp::spawn().await;
    let (mut u1, _) = app.join("r2", "u1", "One").await;
    let (mut other, _) = app.join("r3", "u2", "Two").await;

    u1.send("webrtc:signal", json!({ "to": "u2", "data": { "sdp": "x" } })).await;
    other.assert_silent().await;
    u1.assert_silent().await;
}
