use super::{push_event, ChannelAudio, GameHost, EVENT_QUEUE_CAPACITY};
use crate::game::services::Services;
use crate::game::session::GameSession;
use crate::protocol::{self, ServerMessage};
use crate::storage::StoreScores;
use crate::AppState;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = Uuid::new_v4().to_string();

    let settings = state.store.load_settings().await;
    let high_score = state.store.high_score().await;
    let (events_tx, mut events_rx) = mpsc::channel::<String>(EVENT_QUEUE_CAPACITY);
    let services = Services {
        audio: Box::new(ChannelAudio::new(events_tx.clone(), &settings)),
        scores: Box::new(StoreScores::new(high_score, state.writer.clone())),
    };
    let session = GameSession::new(settings.clone(), services, StdRng::from_entropy());
    let host = GameHost::new(session, events_tx.clone(), state.config.frame_interval);
    state.hosts.insert(connection_id.clone(), Arc::clone(&host));
    tracing::debug!(connection_id, high_score, "game connection opened");

    if let Some(text) = protocol::encode_server_message(&ServerMessage::Ready {
        high_score,
        settings,
        asset_progress: state.assets.progress(),
    }) {
        push_event(&events_tx, text);
    }

    let outbound = Arc::clone(&host);
    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                event = events_rx.recv() => {
                    let Some(payload) = event else { return };
                    if sender.send(Message::Text(payload)).await.is_err() {
                        return;
                    }
                }
                _ = outbound.frames().wait_for_update() => {}
            }

            while let Ok(payload) = events_rx.try_recv() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
            if let Some(payload) = outbound.frames().take_latest() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => host.handle_text_message(&text).await,
            Message::Close(_) => break,
            _ => {}
        }
    }

    host.disconnect();
    state.hosts.remove(&connection_id);
    send_task.abort();
    tracing::debug!(connection_id, "game connection closed");
}
