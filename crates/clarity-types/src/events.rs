use serde::{Deserialize, Serialize};

use crate::models::Message;

/// Events pushed over the stream gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StreamEvent {
    /// Sent once when a client connects
    Ready {},

    /// A message was appended to the store
    MessageCreate(Message),

    /// An ask just used these messages as sources, in rank order
    Pulse {
        #[serde(rename = "sourceIds")]
        source_ids: Vec<i64>,
    },
}

impl StreamEvent {
    /// Returns the channel key if this event is scoped to a specific channel.
    /// Events that return `None` are global and go to every client.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::MessageCreate(message) => Some(&message.channel),
            _ => None,
        }
    }
}

/// Commands sent FROM client TO server over the stream socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum StreamCommand {
    /// Only forward channel-scoped events for these channels.
    /// An empty list restores delivery for every channel.
    Subscribe { channels: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_uses_camel_case_source_ids() {
        let json = serde_json::to_value(StreamEvent::Pulse {
            source_ids: vec![7, 1],
        })
        .unwrap();

        assert_eq!(json["type"], "Pulse");
        assert_eq!(json["data"]["sourceIds"], serde_json::json!([7, 1]));
    }

    #[test]
    fn subscribe_command_parses() {
        let cmd: StreamCommand = serde_json::from_str(
            r#"{"type":"Subscribe","data":{"channels":["ops","general"]}}"#,
        )
        .unwrap();

        let StreamCommand::Subscribe { channels } = cmd;
        assert_eq!(channels, vec!["ops", "general"]);
    }

    #[test]
    fn only_message_events_are_channel_scoped() {
        assert_eq!(StreamEvent::Ready {}.channel(), None);
        assert_eq!(StreamEvent::Pulse { source_ids: vec![] }.channel(), None);
    }
}
