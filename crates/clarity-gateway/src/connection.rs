use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use clarity_types::events::{StreamCommand, StreamEvent};

use crate::dispatcher::Dispatcher;

/// Heartbeat interval: server sends a Ping every 15 seconds.
/// If 2 consecutive Pongs are missed (~30s), the connection is dropped.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);
const MAX_MISSED_HEARTBEATS: u8 = 2;

type Subscriptions = Arc<RwLock<HashSet<String>>>;

/// Serve one stream client until it disconnects or stops answering pings.
pub async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher) {
    let (mut sender, receiver) = socket.split();

    // Subscribe before Ready so nothing broadcast after Ready is missed
    let broadcast_rx = dispatcher.subscribe();
    let conn_id = dispatcher.register_connection().await;
    let open = dispatcher.connection_count().await;
    info!(
        %conn_id,
        open,
        "client connected to stream"
    );

    if send_event(&mut sender, &StreamEvent::Ready {}).await {
        run_connection_loop(sender, receiver, broadcast_rx, conn_id).await;
    }

    dispatcher.unregister_connection(conn_id).await;
    let open = dispatcher.connection_count().await;
    info!(
        %conn_id,
        open,
        "client disconnected from stream"
    );
}

async fn run_connection_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut receiver: SplitStream<WebSocket>,
    mut broadcast_rx: tokio::sync::broadcast::Receiver<StreamEvent>,
    conn_id: Uuid,
) {
    // Per-connection channel filter (shared between send and recv tasks).
    let subscriptions: Subscriptions = Arc::new(RwLock::new(HashSet::new()));
    let send_subscriptions = subscriptions.clone();

    let pong_received = Arc::new(AtomicBool::new(true));
    let pong_flag_send = pong_received.clone();
    let pong_flag_recv = pong_received;

    // Forward broadcasts -> client, with heartbeat
    let mut send_task = tokio::spawn(async move {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.tick().await;
        let mut missed_heartbeats: u8 = 0;

        loop {
            tokio::select! {
                result = broadcast_rx.recv() => {
                    let event = match result {
                        Ok(event) => event,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                            warn!(%conn_id, "Broadcast receiver lagged by {} messages", n);
                            continue;
                        }
                        Err(_) => break,
                    };

                    if !should_forward(&event, &send_subscriptions) {
                        continue;
                    }

                    if !send_event(&mut sender, &event).await {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    if pong_flag_send.swap(false, Ordering::Acquire) {
                        missed_heartbeats = 0;
                    } else {
                        missed_heartbeats += 1;
                        if missed_heartbeats >= MAX_MISSED_HEARTBEATS {
                            warn!(%conn_id, "Heartbeat timeout (missed {} pongs), dropping connection", missed_heartbeats);
                            break;
                        }
                    }
                    if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Read commands from client
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<StreamCommand>(&text) {
                    Ok(cmd) => handle_command(conn_id, cmd, &subscriptions),
                    Err(e) => {
                        warn!(
                            %conn_id,
                            "bad command: {} -- raw: {}",
                            e,
                            text.chars().take(200).collect::<String>()
                        );
                    }
                },
                Message::Pong(_) => {
                    pong_flag_recv.store(true, Ordering::Release);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

fn handle_command(conn_id: Uuid, cmd: StreamCommand, subscriptions: &Subscriptions) {
    match cmd {
        StreamCommand::Subscribe { channels } => {
            info!(%conn_id, "subscribing to {} channels", channels.len());
            let mut subs = subscriptions.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            *subs = channels.into_iter().collect();
        }
    }
}

/// Channel-scoped events pass when the client has no filter or has
/// subscribed to that channel. Global events always pass.
fn should_forward(event: &StreamEvent, subscriptions: &Subscriptions) -> bool {
    let Some(channel) = event.channel() else {
        return true;
    };
    let subs = subscriptions.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    subs.is_empty() || subs.contains(channel)
}

/// Serialize and send one event. Returns false once the socket is gone.
async fn send_event(sender: &mut SplitSink<WebSocket, Message>, event: &StreamEvent) -> bool {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            // An event that cannot be encoded is skipped, the socket stays up
            debug!("dropping unserializable event: {}", e);
            return true;
        }
    };
    sender.send(Message::Text(text.into())).await.is_ok()
}
