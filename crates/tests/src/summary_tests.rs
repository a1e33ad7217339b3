use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn ai_summarize_works_without_joining() {
    let app = TestApp::spawn().await;
    let mut ws = app.ws().await;

    ws.send("ai:summarize", json!({ "text": "" })).await;
    assert_eq!(ws.expect("ai:summary").await, json!({ "summary": "" }));

    ws.send("ai:summarize", json!({ "text": "Budget approved for launch." }))
        .await;
    assert_eq!(
        ws.expect("ai:summary").await,
        json!({ "summary": "Budget approved for launch." })
    );
}

#[tokio::test]
async fn stt_summary_covers_spoken_segments() {
    let app = TestApp::spawn().await;
    let (mut al, _) = app.join("r1", "u1", "Al").await;

    al.send("stt:summary", Value::Null).await;
    assert_eq!(al.expect("stt:summary").await, json!({ "summary": "" }));

    for text in [
        "Release planning starts today.",
        "The release needs final testing.",
        "Lunch was great.",
    ] {
        al.send("stt:segment", json!({ "text": text })).await;
        let segment = al.expect("stt:segment").await;
        assert_eq!(segment["text"], text);
        assert_eq!(segment["userId"], "u1");
    }

    al.send("stt:requestState", Value::Null).await;
    let state = al.expect("stt:state").await;
    assert_eq!(state["segments"].as_array().unwrap().len(), 3);

    al.send("stt:summary", Value::Null).await;
    let summary = al.expect("stt:summary").await;
    let summary = summary["summary"].as_str().unwrap();
    assert!(summary.contains("release"), "{summary}");
    assert!(!summary.is_empty());
}
