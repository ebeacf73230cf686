use std::sync::{Arc, Mutex};
use std::time::Duration;

use serial_test::serial;

use crate::client::ChatClient;
use crate::config::Settings;
use crate::query::QueryFacade;
use crate::relay::Relay;
use crate::transport::message::ServerEvent;
use crate::transport::websocket::start_websocket_server;

async fn start_relay(settings: Settings) -> (String, Arc<Mutex<Relay>>) {
    let relay = Arc::new(Mutex::new(Relay::new()));
    let port = portpicker::pick_unused_port().expect("no free ports");
    let addr = format!("127.0.0.1:{port}");

    tokio::spawn(start_websocket_server(
        addr.clone(),
        relay.clone(),
        settings,
    ));
    // Give the server a moment to start up.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (format!("ws://{addr}"), relay)
}

#[tokio::test]
#[serial]
async fn join_send_and_bootstrap_end_to_end() {
    let (url, relay) = start_relay(Settings::default()).await;

    // A joins an empty conversation and receives an empty history.
    let mut alice = ChatClient::connect(&url, "room1", "a", "Alice").await.unwrap();
    match alice.next_event().await.unwrap() {
        ServerEvent::ConversationHistory { messages } => assert!(messages.is_empty()),
        other => panic!("expected history, got {other:?}"),
    }

    let mut bob = ChatClient::connect(&url, "room1", "b", "Bob").await.unwrap();
    match bob.next_event().await.unwrap() {
        ServerEvent::ConversationHistory { messages } => assert!(messages.is_empty()),
        other => panic!("expected history, got {other:?}"),
    }

    // B sends; both members receive the same stored message.
    bob.send_message("hi", "a").await.unwrap();

    let seen_by_alice = match alice.next_event().await.unwrap() {
        ServerEvent::ReceiveMessage { message } => message,
        other => panic!("expected receive_message, got {other:?}"),
    };
    let seen_by_bob = match bob.next_event().await.unwrap() {
        ServerEvent::ReceiveMessage { message } => message,
        other => panic!("expected receive_message, got {other:?}"),
    };
    assert_eq!(seen_by_alice, seen_by_bob);
    assert_eq!(seen_by_alice.text, "hi");
    assert_eq!(seen_by_alice.sender_id, "b");
    assert!(!seen_by_alice.id.is_empty());
    assert!(seen_by_alice.timestamp > 0);

    // The bootstrap reads see exactly what was broadcast.
    let facade = QueryFacade::new(relay);
    let messages = facade.list_messages("room1");
    assert_eq!(messages, vec![seen_by_alice]);

    let conversations = facade.list_conversations("a");
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].id, "room1");
    assert_eq!(conversations[0].user.id, "b");
    assert!(!conversations[0].last_message.sent_by_me);
}

#[tokio::test]
#[serial]
async fn late_joiner_receives_full_history() {
    let (url, _relay) = start_relay(Settings::default()).await;

    let mut alice = ChatClient::connect(&url, "room1", "a", "Alice").await.unwrap();
    alice.next_event().await.unwrap(); // empty history
    alice.send_message("first", "b").await.unwrap();
    alice.send_message("second", "b").await.unwrap();
    alice.next_event().await.unwrap(); // own echoes
    alice.next_event().await.unwrap();

    let mut bob = ChatClient::connect(&url, "room1", "b", "Bob").await.unwrap();
    match bob.next_event().await.unwrap() {
        ServerEvent::ConversationHistory { messages } => {
            let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
            assert_eq!(texts, ["first", "second"]);
        }
        other => panic!("expected history, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn typing_indicator_skips_the_typist() {
    let (url, _relay) = start_relay(Settings::default()).await;

    let mut alice = ChatClient::connect(&url, "room1", "a", "Alice").await.unwrap();
    alice.next_event().await.unwrap();
    let mut bob = ChatClient::connect(&url, "room1", "b", "Bob").await.unwrap();
    bob.next_event().await.unwrap();

    alice.set_typing(true).await.unwrap();
    match bob.next_event().await.unwrap() {
        ServerEvent::UserTyping { user_id, username, is_typing } => {
            assert_eq!(user_id, "a");
            assert_eq!(username, "Alice");
            assert!(is_typing);
        }
        other => panic!("expected user_typing, got {other:?}"),
    }

    // Alice's next event is her own echo, proving the typing signal was
    // never reflected back to her.
    alice.send_message("done typing", "b").await.unwrap();
    match alice.next_event().await.unwrap() {
        ServerEvent::ReceiveMessage { message } => assert_eq!(message.text, "done typing"),
        other => panic!("expected receive_message, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn malformed_send_gets_an_error_event() {
    let (url, relay) = start_relay(Settings::default()).await;

    let mut alice = ChatClient::connect(&url, "room1", "a", "Alice").await.unwrap();
    alice.next_event().await.unwrap();

    alice.send_message("", "b").await.unwrap();
    match alice.next_event().await.unwrap() {
        ServerEvent::Error { message } => assert!(message.contains("text")),
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(relay.lock().unwrap().store().message_count(), 0);
}

#[tokio::test]
#[serial]
async fn disconnect_prunes_membership_but_keeps_messages() {
    let (url, relay) = start_relay(Settings::default()).await;

    let mut alice = ChatClient::connect(&url, "room1", "a", "Alice").await.unwrap();
    alice.next_event().await.unwrap();
    let bob = ChatClient::connect(&url, "room1", "b", "Bob").await.unwrap();

    alice.send_message("before", "b").await.unwrap();
    alice.next_event().await.unwrap(); // own echo

    bob.close().await.unwrap();
    // Let the server observe the close and clean up.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(relay.lock().unwrap().connection_count(), 1);

    alice.send_message("after", "b").await.unwrap();
    match alice.next_event().await.unwrap() {
        ServerEvent::ReceiveMessage { message } => assert_eq!(message.text, "after"),
        other => panic!("expected receive_message, got {other:?}"),
    }
    assert_eq!(relay.lock().unwrap().store().history_of("room1").len(), 2);
}

#[tokio::test]
#[serial]
async fn connections_beyond_the_cap_are_refused() {
    let mut settings = Settings::default();
    settings.relay.max_connections = 1;
    let (url, relay) = start_relay(settings).await;

    let _alice = ChatClient::connect(&url, "room1", "a", "Alice").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(relay.lock().unwrap().connection_count(), 1);

    // The second handshake may complete, but the server drops the stream
    // without registering it.
    if let Ok(mut bob) = ChatClient::connect(&url, "room1", "b", "Bob").await {
        assert!(bob.next_event().await.is_err());
    }
    assert_eq!(relay.lock().unwrap().connection_count(), 1);
}
