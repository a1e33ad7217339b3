use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

pub struct WsClient {
    pub connection_id: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .expect("WS connect failed");
        let mut client = Self {
            connection_id: String::new(),
            stream,
        };
        let hello = client.expect("connected").await;
        client.connection_id = hello["connectionId"].as_str().unwrap().to_string();
        client
    }

    pub async fn send(&mut self, kind: &str, data: Value) {
        self.send_raw(json!({ "type": kind, "data": data }).to_string())
            .await;
    }

    pub async fn send_raw(&mut self, text: String) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("WS send failed");
    }

    /// Next JSON frame from the server, skipping control frames.
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timeout waiting for WS message")
                .expect("WS closed")
                .expect("WS error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Receives the next frame, asserts its type, and returns its `data`.
    pub async fn expect(&mut self, kind: &str) -> Value {
        let frame = self.recv().await;
        assert_eq!(frame["type"], kind, "unexpected frame {frame}");
        frame["data"].clone()
    }

    /// Asserts nothing arrives for a short while.
    pub async fn assert_silent(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(SILENCE_WINDOW, self.stream.next()).await
        {
            panic!("expected no message, got {}", text.as_str());
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
