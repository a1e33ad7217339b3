use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn chat_is_echoed_to_sender_with_cid() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;

    al.send("chat:message", json!({ "text": "hello", "cid": "c1" })).await;
    let msg = al.expect("chat:message").await;
    assert_eq!(msg["userId"], "u1");
    assert_eq!(msg["name"], "Al");
    assert_eq!(msg["text"], "hello");
    assert_eq!(msg["cid"], "c1");
    assert!(msg["ts"].is_number());
}

#[tokio::test]
async fn whiteboard_keeps_append_order_until_clear() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut bo, _) = app.join("r1", "u2", "Bo").await;
    al.expect("presence:join").await;

    let mut expected = Vec::new();
    for i in 0..5 {
        if i % 2 == 0 {
            let stroke = json!({ "tool": "pen", "color": "#000", "size": 2, "points": [{ "x": i, "y": i }] });
            al.send("whiteboard:stroke", stroke.clone()).await;
            let mut action = stroke;
            action["type"] = json!("stroke");
            expected.push(action);
            assert_eq!(bo.expect("whiteboard:stroke").await["points"][0]["x"], i);
        } else {
            al.send("whiteboard:fill", json!({ "color": "#fff", "x": i, "y": 0 })).await;
            expected.push(json!({ "type": "fill", "color": "#fff", "x": i, "y": 0 }));
            bo.expect("whiteboard:fill").await;
        }
    }
    al.assert_silent().await;

    bo.send("whiteboard:requestState", Value::Null).await;
    assert_eq!(
        bo.expect("whiteboard:state").await,
        json!({ "actions": expected })
    );

    bo.send("whiteboard:clear", Value::Null).await;
    assert_eq!(al.recv().await, json!({ "type": "whiteboard:clear" }));
    assert_eq!(bo.recv().await, json!({ "type": "whiteboard:clear" }));

    al.send("whiteboard:requestState", Value::Null).await;
    assert_eq!(al.expect("whiteboard:state").await, json!({ "actions": [] }));
}

#[tokio::test]
async fn fill_without_color_is_still_appended() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;

    al.send("whiteboard:fill", json!({ "x": 1, "y": 2 })).await;
    al.send("whiteboard:requestState", Value::Null).await;
    assert_eq!(
        al.expect("whiteboard:state").await,
        json!({ "actions": [{ "type": "fill", "x": 1, "y": 2 }] })
    );
}

#[tokio::test]
async fn document_resolves_to_last_update() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut bo, _) = app.join("r1", "u2", "Bo").await;
    al.expect("presence:join").await;

    al.send("doc:update", json!({ "text": "draft one" })).await;
    assert_eq!(bo.expect("doc:update").await, json!({ "text": "draft one" }));
    bo.send("doc:update", json!({ "text": "draft two" })).await;
    assert_eq!(al.expect("doc:update").await, json!({ "text": "draft two" }));

    let (mut cy, _) = app.join("r1", "u3", "Cy").await;
    cy.send("doc:requestState", Value::Null).await;
    assert_eq!(cy.expect("doc:state").await, json!({ "text": "draft two" }));
}

#[tokio::test]
async fn media_is_shared_and_replayable() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut bo, _) = app.join("r1", "u2", "Bo").await;
    al.expect("presence:join").await;

    let items = json!([{ "name": "slide.png", "type": "image/png", "dataUrl": "data:image/png;base64,iVBO" }]);
    al.send("media:add", json!({ "items": items })).await;
    assert_eq!(bo.expect("media:add").await, json!({ "items": items }));
    al.assert_silent().await;

    bo.send("media:requestState", Value::Null).await;
    assert_eq!(bo.expect("media:state").await, json!({ "items": items }));
}

#[tokio::test]
async fn cursor_and_pose_pass_through() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut bo, _) = app.join("r1", "u2", "Bo").await;
    al.expect("presence:join").await;

    al.send("cursor:pos", json!({ "id": "u1", "x": 0.25, "y": 0.5 })).await;
    assert_eq!(
        bo.expect("cursor:pos").await,
        json!({ "id": "u1", "x": 0.25, "y": 0.5 })
    );
    al.send("avatar:pose", json!({ "id": "u1", "head": [0, 1, 0] })).await;
    assert_eq!(bo.expect("avatar:pose").await["head"], json!([0, 1, 0]));
    al.assert_silent().await;
}

#[tokio::test]
async fn concurrent_chat_is_never_lost() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;
    let (mut bo, _) = app.join("r1", "u2", "Bo").await;
    al.expect("presence:join").await;

    for i in 0..10 {
        al.send("chat:message", json!({ "text": format!("a{i}") })).await;
        bo.send("chat:message", json!({ "text": format!("b{i}") })).await;
    }
    for _ in 0..20 {
        al.expect("chat:message").await;
    }

    al.send("meeting:end", Value::Null).await;
    let ready = al.expect("transcript:ready").await;
    let file = ready["file"].as_str().unwrap();
    let path = app.transcripts_dir.path().join(file);
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved["events"].as_array().unwrap().len(), 20);
}
