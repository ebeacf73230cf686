use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tungstenite::protocol::Message as WsMessage;

use crate::transport::message::{ClientEvent, ServerEvent};
use crate::utils::error::ClientError;

/// A connected chat participant, bound to one conversation.
///
/// `connect` joins the conversation immediately, so the first event observed
/// is normally the `conversation_history` replay. Messages sent through
/// `send_message` come back via the room broadcast; callers should render
/// from that echo rather than locally, which keeps every participant on the
/// relay's ordering.
pub struct ChatClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    conversation_id: String,
    user_id: String,
    user_name: String,
}

impl ChatClient {
    /// Connects to the relay and joins `conversation_id`.
    pub async fn connect(
        url: &str,
        conversation_id: &str,
        user_id: &str,
        user_name: &str,
    ) -> Result<Self, ClientError> {
        let (stream, _) = connect_async(url).await?;
        let mut client = Self {
            stream,
            conversation_id: conversation_id.to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
        };
        let join = ClientEvent::JoinConversation {
            conversation_id: client.conversation_id.clone(),
        };
        client.emit(&join).await?;
        Ok(client)
    }

    pub async fn send_message(&mut self, text: &str, receiver_id: &str) -> Result<(), ClientError> {
        let event = ClientEvent::SendMessage {
            conversation_id: self.conversation_id.clone(),
            text: text.to_string(),
            sender_id: self.user_id.clone(),
            sender_name: self.user_name.clone(),
            receiver_id: receiver_id.to_string(),
            timestamp: Some(Utc::now().timestamp_millis()),
            is_read: false,
        };
        self.emit(&event).await
    }

    pub async fn set_typing(&mut self, is_typing: bool) -> Result<(), ClientError> {
        let event = ClientEvent::Typing {
            conversation_id: self.conversation_id.clone(),
            user_id: self.user_id.clone(),
            username: self.user_name.clone(),
            is_typing,
        };
        self.emit(&event).await
    }

    /// The next server event, skipping non-text frames.
    pub async fn next_event(&mut self) -> Result<ServerEvent, ClientError> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                WsMessage::Text(text) => return Ok(serde_json::from_str(text.as_str())?),
                WsMessage::Close(_) => return Err(ClientError::Closed),
                _ => continue,
            }
        }
        Err(ClientError::Closed)
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }

    async fn emit(&mut self, event: &ClientEvent) -> Result<(), ClientError> {
        let text = serde_json::to_string(event)?;
        self.stream.send(WsMessage::text(text)).await?;
        Ok(())
    }
}
