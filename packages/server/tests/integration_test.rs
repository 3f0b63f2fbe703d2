//! Integration tests for the messaging server, driven over real WebSocket connections.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tsudoi_server::{app::build_state, config::ServerConfig, ui::Server};
use tsudoi_shared::time::SystemClock;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Helper struct to manage an in-process server on an ephemeral port
struct TestServer {
    handle: JoinHandle<std::io::Result<()>>,
    port: u16,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let port = listener.local_addr().expect("No local addr").port();
        let server = Server::new(build_state(&config, Arc::new(SystemClock)));
        let handle = tokio::spawn(server.serve(listener));
        TestServer { handle, port }
    }

    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct for a WebSocket client
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        TestClient { stream }
    }

    async fn emit(&mut self, event: &str, data: Value) {
        let frame = json!({ "event": event, "data": data }).to_string();
        self.stream
            .send(Message::text(frame))
            .await
            .expect("Failed to send");
    }

    async fn send_raw(&mut self, frame: &str) {
        self.stream
            .send(Message::text(frame.to_string()))
            .await
            .expect("Failed to send");
    }

    /// Receive the next event envelope, or None on timeout
    async fn recv_within(&mut self, timeout: Duration) -> Option<Value> {
        loop {
            let msg = tokio::time::timeout(timeout, self.stream.next())
                .await
                .ok()??
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON"));
            }
        }
    }

    /// Wait until an event with the given name arrives, skipping others
    async fn expect_event(&mut self, name: &str) -> Value {
        loop {
            let event = self
                .recv_within(RECV_TIMEOUT)
                .await
                .unwrap_or_else(|| panic!("Timed out waiting for '{name}'"));
            if event["event"] == name {
                return event["data"].clone();
            }
        }
    }

    /// Collect every event that arrives before the connection goes quiet
    async fn drain(&mut self) -> Vec<Value> {
        let mut events = Vec::new();
        while let Some(event) = self.recv_within(QUIET_PERIOD).await {
            events.push(event);
        }
        events
    }

    async fn join(&mut self, room: &str, user: &str) -> (Value, Value) {
        self.emit(
            "join_conversation",
            json!({ "conversationId": room, "userId": user, "userName": user }),
        )
        .await;
        let active = self.expect_event("active_users").await;
        let history = self.expect_event("conversation_history").await;
        (active, history)
    }

    async fn send_text(&mut self, room: &str, id: &str, sender: &str, content: &str) {
        self.emit(
            "send_message",
            json!({
                "id": id,
                "conversationId": room,
                "senderId": sender,
                "senderName": sender,
                "content": content,
            }),
        )
        .await;
    }

    async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

fn count(events: &[Value], name: &str) -> usize {
    events.iter().filter(|e| e["event"] == name).count()
}

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");

    // then (期待する結果):
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_join_replays_history_only_to_joiner() {
    // テスト項目: 参加前に送られた 5 件が参加者本人にだけリプレイされ、既存メンバーには user_joined だけが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    alice.join("r1", "alice").await;
    for i in 0..5 {
        alice
            .send_text("r1", &format!("m{i}"), "alice", &format!("message {i}"))
            .await;
        alice.expect_event("receive_message").await;
    }

    // when (操作):
    let mut bob = TestClient::connect(&server).await;
    let (active, history) = bob.join("r1", "bob").await;

    // then (期待する結果):
    assert_eq!(history["conversationId"], "r1");
    let ids: Vec<&str> = history["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m0", "m1", "m2", "m3", "m4"]);
    assert_eq!(active["users"].as_array().unwrap().len(), 2);

    let joined = alice.expect_event("user_joined").await;
    assert_eq!(joined["userId"], "bob");
    let rest = alice.drain().await;
    assert_eq!(count(&rest, "conversation_history"), 0);
}

#[tokio::test]
async fn test_send_and_edit_scenario() {
    // テスト項目: 送信・編集が Room 全体に届き、後から参加したユーザーには編集後の内容がリプレイされる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice.join("r1", "alice").await;
    bob.join("r1", "bob").await;
    alice.expect_event("user_joined").await;

    // when (操作): alice が送信
    alice.send_text("r1", "m1", "alice", "hi").await;

    // then (期待する結果): 送信者を含む両方に sent で届く
    for client in [&mut alice, &mut bob] {
        let message = client.expect_event("receive_message").await;
        assert_eq!(message["id"], "m1");
        assert_eq!(message["status"], "sent");
        assert_eq!(message["edited"], false);
    }

    // when (操作): alice が編集
    alice
        .emit(
            "edit_message",
            json!({ "messageId": "m1", "content": "hi edited", "conversationId": "r1" }),
        )
        .await;

    // then (期待する結果):
    for client in [&mut alice, &mut bob] {
        let edited = client.expect_event("message_edited").await;
        assert_eq!(edited["messageId"], "m1");
        assert_eq!(edited["content"], "hi edited");
    }
    let mut charlie = TestClient::connect(&server).await;
    let (_, history) = charlie.join("r1", "charlie").await;
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hi edited");
    assert_eq!(messages[0]["edited"], true);
}

#[tokio::test]
async fn test_disconnect_sends_exactly_one_user_left() {
    // テスト項目: leave せずに切断すると、残りのメンバーに user_left がちょうど 1 回届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice
        .emit(
            "register_user",
            json!({ "userId": "alice", "phoneNumber": "555-0100", "name": "Alice", "avatar": "" }),
        )
        .await;
    alice.expect_event("user_registered").await;
    alice.join("r1", "alice").await;
    bob.join("r1", "bob").await;
    bob.drain().await;

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    let left = bob.expect_event("user_left").await;
    assert_eq!(left["userId"], "alice");
    assert_eq!(left["conversationId"], "r1");
    let rest = bob.drain().await;
    assert_eq!(count(&rest, "user_left"), 0);

    let room: Value = reqwest::get(server.http_url("/api/rooms/r1"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    let members: Vec<&str> = room["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(members, vec!["bob"]);

    let users: Value = reqwest::get(server.http_url("/api/users"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(users[0]["id"], "alice");
    assert_eq!(users[0]["status"], "offline");
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: Room A のメッセージは Room B のメンバーにも履歴にも現れない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice.join("a", "alice").await;
    bob.join("b", "bob").await;

    // when (操作):
    alice.send_text("a", "m1", "alice", "only for a").await;
    alice.expect_event("receive_message").await;

    // then (期待する結果):
    assert_eq!(count(&bob.drain().await, "receive_message"), 0);
    let mut carol = TestClient::connect(&server).await;
    let (_, history) = carol.join("b", "carol").await;
    assert!(history["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reaction_is_live_only() {
    // テスト項目: リアクションはライブで届くが、リプレイされる履歴には含まれない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice.join("r1", "alice").await;
    bob.join("r1", "bob").await;
    alice.send_text("r1", "m1", "alice", "react to me").await;
    bob.expect_event("receive_message").await;

    // when (操作):
    bob.emit(
        "react_to_message",
        json!({
            "messageId": "m1",
            "emoji": "🎉",
            "userId": "bob",
            "userName": "bob",
            "conversationId": "r1",
        }),
    )
    .await;

    // then (期待する結果):
    let reaction = alice.expect_event("message_reaction").await;
    assert_eq!(reaction["emoji"], "🎉");
    assert!(reaction["timestamp"].is_i64());
    let mut carol = TestClient::connect(&server).await;
    let (_, history) = carol.join("r1", "carol").await;
    assert_eq!(history["messages"][0]["reactions"], json!([]));
}

#[tokio::test]
async fn test_typing_is_not_echoed_and_malformed_frames_are_ignored() {
    // テスト項目: 入力中通知は本人に返らず、壊れたフレームを送っても接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice.join("r1", "alice").await;
    bob.join("r1", "bob").await;
    alice.drain().await;

    // when (操作):
    alice.send_raw("{ this is not json").await;
    alice
        .emit("typing", json!({ "conversationId": "r1", "userId": "alice", "isTyping": true }))
        .await;

    // then (期待する結果):
    let typing = bob.expect_event("user_typing").await;
    assert_eq!(typing["userId"], "alice");
    assert_eq!(typing["isTyping"], true);
    assert_eq!(count(&alice.drain().await, "user_typing"), 0);

    alice.send_text("r1", "m1", "alice", "still here").await;
    alice.expect_event("receive_message").await;
}

#[tokio::test]
async fn test_history_limit_is_configurable() {
    // テスト項目: 履歴の上限を超えると古いものから捨てられる
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        history_limit: 3,
        ..ServerConfig::default()
    })
    .await;
    let mut alice = TestClient::connect(&server).await;
    alice.join("r1", "alice").await;

    // when (操作):
    for i in 0..5 {
        alice.send_text("r1", &format!("m{i}"), "alice", "x").await;
        alice.expect_event("receive_message").await;
    }

    // then (期待する結果):
    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(rooms[0]["message_count"], 3);
    let mut bob = TestClient::connect(&server).await;
    let (_, history) = bob.join("r1", "bob").await;
    let ids: Vec<&str> = history["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m2", "m3", "m4"]);
}

#[tokio::test]
async fn test_unknown_room_detail_is_404() {
    // テスト項目: 存在しない Room の詳細は 404 になる
    let server = TestServer::start().await;

    let response = reqwest::get(server.http_url("/api/rooms/nowhere"))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
