use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::Settings;
use crate::connection::ConnectionHandle;
use crate::relay::Relay;
use crate::relay::message::{MessageDraft, TypingEvent};
use crate::relay::registry::ConnectionId;
use crate::transport::message::ClientEvent;

/// Accepts WebSocket connections and serves them against the shared relay
/// engine until the process exits.
pub async fn start_websocket_server(addr: String, relay: Arc<Mutex<Relay>>, settings: Settings) {
    let listener = TcpListener::bind(&addr).await.expect("Can't bind");

    info!("chat relay listening on ws://{addr}");

    while let Ok((stream, _)) = listener.accept().await {
        let relay = relay.clone();
        let max_connections = settings.relay.max_connections;
        tokio::spawn(async move {
            handle_connection(stream, relay, max_connections).await;
        });
    }
}

/// Drives one client connection: registers it, forwards outbound frames
/// from the engine, decodes inbound events, and cleans up exactly once when
/// either direction ends.
async fn handle_connection(stream: TcpStream, relay: Arc<Mutex<Relay>>, max_connections: usize) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("WebSocket handshake error: {e}");
            return;
        }
    };
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let handle = ConnectionHandle::new(tx);
    let connection_id = handle.id.clone();

    {
        let mut relay = relay.lock().unwrap();
        if relay.connection_count() >= max_connections {
            warn!(%connection_id, max_connections, "refusing connection at capacity");
            return;
        }
        relay.register_connection(handle);
    }
    info!(%connection_id, "connected");

    let cleanup_called = Arc::new(AtomicBool::new(false));

    let do_cleanup = {
        let relay = relay.clone();
        let connection_id = connection_id.clone();
        let cleanup_called = cleanup_called.clone();

        move || {
            if !cleanup_called.swap(true, Ordering::SeqCst) {
                let mut relay = relay.lock().unwrap();
                relay.cleanup_connection(&connection_id);
            }
        }
    };

    {
        let connection_id = connection_id.clone();
        let do_cleanup = do_cleanup.clone();

        spawn(async move {
            while let Some(msg) = rx.recv().await {
                if let Err(e) = ws_sender.send(msg).await {
                    warn!(%connection_id, "failed to send frame: {e}");
                    break;
                }
            }

            do_cleanup();
            debug!(%connection_id, "send loop closed");
        });
    }

    while let Some(Ok(msg)) = ws_receiver.next().await {
        if let WsMessage::Text(raw) = &msg {
            dispatch_event(&relay, &connection_id, raw.as_str());
        }
    }

    info!(%connection_id, "disconnected");
    do_cleanup();
}

/// Decodes one inbound frame and drives the engine. Malformed input is
/// reported back to the offending client only, never stored or broadcast.
pub(crate) fn dispatch_event(relay: &Arc<Mutex<Relay>>, connection_id: &ConnectionId, raw: &str) {
    match serde_json::from_str::<ClientEvent>(raw) {
        Ok(ClientEvent::JoinConversation { conversation_id }) => {
            info!(%connection_id, conversation = %conversation_id, "join_conversation");
            let mut relay = relay.lock().unwrap();
            if let Err(err) = relay.join_conversation(connection_id, &conversation_id) {
                // Join racing a disconnect; by contract a silent no-op.
                debug!(%connection_id, %err, "join dropped");
            }
        }

        Ok(ClientEvent::SendMessage {
            conversation_id,
            text,
            sender_id,
            sender_name,
            receiver_id,
            timestamp,
            is_read,
        }) => {
            let draft = MessageDraft {
                conversation_id,
                text,
                sender_id,
                sender_name,
                receiver_id,
                timestamp,
                is_read,
            };
            let mut relay = relay.lock().unwrap();
            match relay.send_message(draft) {
                Ok(message) => {
                    debug!(
                        %connection_id,
                        conversation = %message.conversation_id,
                        message_id = %message.id,
                        "message relayed"
                    );
                }
                Err(err) => {
                    warn!(%connection_id, %err, "rejected send");
                    relay.report_error(connection_id, &err.to_string());
                }
            }
        }

        Ok(ClientEvent::Typing {
            conversation_id,
            user_id,
            username,
            is_typing,
        }) => {
            let mut relay = relay.lock().unwrap();
            relay.relay_typing(
                connection_id,
                TypingEvent {
                    conversation_id,
                    user_id,
                    username,
                    is_typing,
                },
            );
        }

        Err(err) => {
            warn!(
                %connection_id,
                "invalid client event: {err} | {}",
                &raw.chars().take(100).collect::<String>()
            );
            let mut relay = relay.lock().unwrap();
            relay.report_error(connection_id, "invalid event");
        }
    }
}
