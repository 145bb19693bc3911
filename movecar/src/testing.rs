//! In-process mock robot webhook for tests.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::Uri,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// One request received by the mock robot.
#[derive(Debug, Clone)]
pub struct Received {
    pub uri: Uri,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: Value,
    received: Arc<Mutex<Vec<Received>>>,
}

/// A robot endpoint listening on a random local port.
pub struct MockRobot {
    pub addr: std::net::SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
}

impl MockRobot {
    /// Start a robot that answers every POST with `reply`.
    pub async fn start(reply: Value) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            received: received.clone(),
        };

        let app = Router::new()
            .route("/robot/send", post(robot_send))
            .route("/robot/text", post(|| async { "<html>busy</html>" }))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received }
    }

    /// Webhook URL in DingTalk's shape, carrying an access token.
    pub fn webhook(&self) -> String {
        format!("http://{}/robot/send?access_token=tok", self.addr)
    }

    /// Endpoint that answers with a non-JSON body.
    pub fn text_webhook(&self) -> String {
        format!("http://{}/robot/text", self.addr)
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn robot_send(
    State(state): State<MockState>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.received.lock().unwrap().push(Received { uri, body });
    Json(state.reply)
}

/// A URL nothing is listening on.
pub async fn dead_webhook() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/robot/send", addr)
}
