//! Messaging API integration tests
//!
//! Tests for sending messages over REST, conversation listing, history and
//! read acknowledgement.

#[macro_use]
mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use tapspot::backend::messaging::db;
use tapspot::shared::messaging::{
    GetConversationResponse, ListConversationsResponse, ListMessagesResponse, MarkReadResponse,
    SendMessageResponse, UnreadCountResponse, MAX_CONTENT_CHARS,
};

use common::{auth_header, create_test_user, TestApp, TestUser};

async fn send(app: &TestApp, from: &TestUser, to: i64, content: &str) -> axum_test::TestResponse {
    app.server
        .post("/api/messages")
        .add_header("Authorization", auth_header(&from.token))
        .json(&json!({ "receiver_id": to, "content": content }))
        .await
}

async fn unread(app: &TestApp, user: &TestUser) -> i64 {
    let response = app
        .server
        .get("/api/messages/unread")
        .add_header("Authorization", auth_header(&user.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<UnreadCountResponse>().unread_count
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["online_users"], 0);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/does-not-exist").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_error_body!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_requires_token() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/messages")
        .json(&json!({ "receiver_id": 2, "content": "hi" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_validation() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "").await;

    let empty = send(&app, &alice, bob.id, "").await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

    let oversized = send(&app, &alice, bob.id, &"x".repeat(MAX_CONTENT_CHARS + 1)).await;
    assert_eq!(oversized.status_code(), StatusCode::BAD_REQUEST);

    let to_self = send(&app, &alice, alice.id, "hi").await;
    assert_eq!(to_self.status_code(), StatusCode::BAD_REQUEST);

    let unknown = send(&app, &alice, 9999, "hi").await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

    // Nothing above may have touched the store
    assert_eq!(unread(&app, &bob).await, 0);
    assert!(assert_ok!(db::list_conversations(&app.state.db, alice.id).await).is_empty());
}

#[tokio::test]
async fn test_send_rejects_malformed_body_with_400() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;

    let missing_receiver = app
        .server
        .post("/api/messages")
        .add_header("Authorization", auth_header(&alice.token))
        .json(&json!({ "content": "hi" }))
        .await;
    assert_eq!(missing_receiver.status_code(), StatusCode::BAD_REQUEST);
    let body = assert_error_body!(missing_receiver, StatusCode::BAD_REQUEST);
    assert_contains!(body["error"].as_str().unwrap_or_default(), "receiver_id");

    let non_integer_receiver = app
        .server
        .post("/api/messages")
        .add_header("Authorization", auth_header(&alice.token))
        .json(&json!({ "receiver_id": "abc", "content": "hi" }))
        .await;
    assert_eq!(non_integer_receiver.status_code(), StatusCode::BAD_REQUEST);
    assert_error_body!(non_integer_receiver, StatusCode::BAD_REQUEST);

    let not_json = app
        .server
        .post("/api/messages")
        .add_header("Authorization", auth_header(&alice.token))
        .text("receiver_id=2")
        .await;
    assert_eq!(not_json.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_accepts_length_boundaries() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "").await;

    let shortest = send(&app, &alice, bob.id, "a").await;
    assert_eq!(shortest.status_code(), StatusCode::OK);

    let longest = send(&app, &alice, bob.id, &"好".repeat(MAX_CONTENT_CHARS)).await;
    assert_eq!(longest.status_code(), StatusCode::OK);

    let body: SendMessageResponse = longest.json();
    assert!(body.success);
    assert_eq!(body.message.sender_id, alice.id);
    assert_eq!(body.message.receiver_id, bob.id);
    assert!(!body.message.is_read);
    assert_eq!(unread(&app, &bob).await, 2);
}

#[tokio::test]
async fn test_offline_receiver_reads_history_later() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "Alice").await;
    let bob = create_test_user(&app.state, "bob", "").await;

    for content in ["first", "second", "third"] {
        let response = send(&app, &alice, bob.id, content).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    assert_eq!(unread(&app, &bob).await, 3);
    assert_eq!(unread(&app, &alice).await, 0);

    let list = app
        .server
        .get("/api/conversations")
        .add_header("Authorization", auth_header(&bob.token))
        .await;
    assert_eq!(list.status_code(), StatusCode::OK);
    let conversations = list.json::<ListConversationsResponse>().conversations;
    assert_eq!(conversations.len(), 1);
    let conversation = &conversations[0];
    assert_eq!(conversation.peer_id, alice.id);
    assert_eq!(conversation.peer_name, "Alice");
    assert_eq!(conversation.last_message, "third");
    assert_eq!(conversation.unread_count, 3);

    let history = app
        .server
        .get(&format!("/api/conversations/{}/messages", conversation.id))
        .add_header("Authorization", auth_header(&bob.token))
        .await;
    assert_eq!(history.status_code(), StatusCode::OK);
    let history: ListMessagesResponse = history.json();
    let contents: Vec<&str> = history.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert!(history.messages.iter().all(|m| !m.is_me && m.sender_name == "Alice"));
    assert_eq!(history.page, 1);
    assert_eq!(history.page_size, 50);

    // Reading history alone acknowledges nothing
    assert_eq!(unread(&app, &bob).await, 3);

    let read = app
        .server
        .post(&format!("/api/conversations/{}/read", conversation.id))
        .add_header("Authorization", auth_header(&bob.token))
        .await;
    assert_eq!(read.status_code(), StatusCode::OK);
    let read: MarkReadResponse = read.json();
    assert_eq!(read.conversation_id, conversation.id);
    assert_eq!(read.marked, 3);

    assert_eq!(unread(&app, &bob).await, 0);
}

#[tokio::test]
async fn test_sender_sees_own_messages_as_mine() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "").await;

    send(&app, &alice, bob.id, "ping").await;
    send(&app, &bob, alice.id, "pong").await;

    let conversation = assert_ok!(db::find_conversation(&app.state.db, alice.id, bob.id).await)
        .expect("sender conversation exists");
    assert_eq!(conversation.unread_count, 1);
    assert_eq!(conversation.last_message, "pong");

    let history: ListMessagesResponse = app
        .server
        .get(&format!("/api/conversations/{}/messages", conversation.id))
        .add_header("Authorization", auth_header(&alice.token))
        .await
        .json();
    let mine: Vec<bool> = history.messages.iter().map(|m| m.is_me).collect();
    assert_eq!(mine, vec![true, false]);
}

#[tokio::test]
async fn test_history_pagination_and_after_id() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "").await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let response: SendMessageResponse = send(&app, &alice, bob.id, &format!("m{}", i)).await.json();
        ids.push(response.message.id);
    }
    let conversation = assert_ok!(db::find_conversation(&app.state.db, bob.id, alice.id).await)
        .expect("receiver conversation exists");
    let path = format!("/api/conversations/{}/messages", conversation.id);

    let newest: ListMessagesResponse = app
        .server
        .get(&path)
        .add_query_param("page_size", 2)
        .add_header("Authorization", auth_header(&bob.token))
        .await
        .json();
    let contents: Vec<&str> = newest.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m3", "m4"]);

    let older: ListMessagesResponse = app
        .server
        .get(&path)
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .add_header("Authorization", auth_header(&bob.token))
        .await
        .json();
    let contents: Vec<&str> = older.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m1", "m2"]);

    let since: ListMessagesResponse = app
        .server
        .get(&path)
        .add_query_param("after_id", ids[2])
        .add_header("Authorization", auth_header(&bob.token))
        .await
        .json();
    let contents: Vec<&str> = since.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m3", "m4"]);
}

#[tokio::test]
async fn test_conversation_of_another_user_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "").await;
    let carol = create_test_user(&app.state, "carol", "").await;

    send(&app, &alice, bob.id, "private").await;
    let bobs = assert_ok!(db::find_conversation(&app.state.db, bob.id, alice.id).await)
        .expect("receiver conversation exists");

    // A foreign conversation id may still name a user, never the owner's history
    let history = app
        .server
        .get(&format!("/api/conversations/{}/messages", bobs.id))
        .add_header("Authorization", auth_header(&carol.token))
        .await;
    if history.status_code() == StatusCode::OK {
        let page: ListMessagesResponse = history.json();
        assert!(page.messages.iter().all(|m| m.content != "private"));
    } else {
        assert_eq!(history.status_code(), StatusCode::NOT_FOUND);
    }

    let read = app
        .server
        .post(&format!("/api/conversations/{}/read", bobs.id))
        .add_header("Authorization", auth_header(&carol.token))
        .await;
    assert_eq!(read.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(unread(&app, &bob).await, 1);
}

#[tokio::test]
async fn test_history_by_peer_user_id() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let _bob = create_test_user(&app.state, "bob", "").await;
    let _carol = create_test_user(&app.state, "carol", "").await;
    let dave = create_test_user(&app.state, "dave", "").await;

    let history_with = |id: i64| {
        app.server
            .get(&format!("/api/conversations/{}/messages", id))
            .add_header("Authorization", auth_header(&alice.token))
    };

    // No conversation rows exist yet
    let own = history_with(alice.id).await;
    assert_eq!(own.status_code(), StatusCode::BAD_REQUEST);
    let unknown = history_with(9999).await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

    let empty = history_with(dave.id).await;
    assert_eq!(empty.status_code(), StatusCode::OK);
    let empty: ListMessagesResponse = empty.json();
    assert!(empty.messages.is_empty());

    send(&app, &alice, dave.id, "hello dave").await;

    // Two conversation rows now exist, so the id still resolves to dave
    let page: ListMessagesResponse = history_with(dave.id).await.json();
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].content, "hello dave");
    assert!(page.messages[0].is_me);
}

#[tokio::test]
async fn test_get_or_create_conversation() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "Bobby").await;

    let first = app
        .server
        .get("/api/conversations/with")
        .add_query_param("user_id", bob.id)
        .add_header("Authorization", auth_header(&alice.token))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first: GetConversationResponse = first.json();
    assert_eq!(first.conversation.peer_id, bob.id);
    assert_eq!(first.conversation.peer_name, "Bobby");
    assert_eq!(first.conversation.unread_count, 0);
    assert_eq!(first.conversation.last_message, "");
    assert!(first.conversation.last_message_at.is_none());

    let second: GetConversationResponse = app
        .server
        .get("/api/conversations/with")
        .add_query_param("user_id", bob.id)
        .add_header("Authorization", auth_header(&alice.token))
        .await
        .json();
    assert_eq!(second.conversation.id, first.conversation.id);

    // Opening a conversation does not create one for the peer
    assert!(assert_ok!(db::find_conversation(&app.state.db, bob.id, alice.id).await).is_none());

    let with_self = app
        .server
        .get("/api/conversations/with")
        .add_query_param("user_id", alice.id)
        .add_header("Authorization", auth_header(&alice.token))
        .await;
    assert_eq!(with_self.status_code(), StatusCode::BAD_REQUEST);

    let unknown = app
        .server
        .get("/api/conversations/with")
        .add_query_param("user_id", 4242)
        .add_header("Authorization", auth_header(&alice.token))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_conversation_list_is_most_recent_first() {
    let app = TestApp::spawn().await;
    let alice = create_test_user(&app.state, "alice", "").await;
    let bob = create_test_user(&app.state, "bob", "").await;
    let carol = create_test_user(&app.state, "carol", "").await;

    send(&app, &alice, bob.id, "to bob").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    send(&app, &alice, carol.id, "to carol").await;

    let conversations = app
        .server
        .get("/api/conversations")
        .add_header("Authorization", auth_header(&alice.token))
        .await
        .json::<ListConversationsResponse>()
        .conversations;

    let peers: Vec<i64> = conversations.iter().map(|c| c.peer_id).collect();
    assert_eq!(peers, vec![carol.id, bob.id]);
    assert!(conversations.iter().all(|c| c.unread_count == 0));
}
