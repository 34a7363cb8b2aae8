use crate::assets::{sound_key, MUSIC_KEY};
use crate::game::constants::DEFAULT_AI_COUNT;
use crate::game::input::{resolve_touch, InputState};
use crate::game::services::{AudioSink, SoundCue};
use crate::game::session::{GameConfig, GameSession, Phase};
use crate::game::types::Point;
use crate::protocol::{self, ClientMessage, ServerMessage};
use crate::settings::GameSettings;
use crate::shared::names::sanitize_player_name;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::time::MissedTickBehavior;

pub mod socket;

/// Sound, phase and error events queued per connection before new ones are dropped.
pub const EVENT_QUEUE_CAPACITY: usize = 256;

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Only the newest frame matters; older ones are overwritten unsent.
#[derive(Debug)]
pub struct LatestFrame {
    frame: StdMutex<Option<String>>,
    notify: Notify,
}

impl LatestFrame {
    fn new() -> Self {
        Self {
            frame: StdMutex::new(None),
            notify: Notify::new(),
        }
    }

    fn store(&self, payload: String) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
        self.notify.notify_one();
    }

    pub fn take_latest(&self) -> Option<String> {
        self.frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub async fn wait_for_update(&self) {
        self.notify.notified().await;
    }
}

/// Queues an event for the socket. A stalled client loses events rather than growing the queue.
fn push_event(events: &mpsc::Sender<String>, text: String) {
    if let Err(mpsc::error::TrySendError::Full(_)) = events.try_send(text) {
        tracing::debug!("event queue full, dropping event");
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HeldInput {
    turn_left: bool,
    turn_right: bool,
    boost: bool,
    direction: Option<Point>,
}

/// Sound cues leave as socket events so the client plays them.
#[derive(Debug)]
pub struct ChannelAudio {
    events: mpsc::Sender<String>,
    sfx_volume: f64,
    music_volume: f64,
}

impl ChannelAudio {
    pub fn new(events: mpsc::Sender<String>, settings: &GameSettings) -> Self {
        Self {
            events,
            sfx_volume: settings.sfx_volume,
            music_volume: settings.music_volume,
        }
    }

    fn send(&self, message: &ServerMessage) {
        if let Some(text) = protocol::encode_server_message(message) {
            push_event(&self.events, text);
        }
    }
}

impl AudioSink for ChannelAudio {
    fn play(&mut self, cue: SoundCue) {
        self.send(&ServerMessage::Sound {
            cue,
            asset: sound_key(cue),
            volume: self.sfx_volume,
        });
    }

    fn play_music(&mut self) {
        self.send(&ServerMessage::Music {
            asset: MUSIC_KEY,
            volume: self.music_volume,
        });
    }
}

/// Drives one connection's session: applies client messages and runs the frame loop while playing.
pub struct GameHost {
    session: Mutex<GameSession>,
    input: StdMutex<HeldInput>,
    frames: LatestFrame,
    events: mpsc::Sender<String>,
    running: AtomicBool,
    connected: AtomicBool,
    frame_interval: Duration,
}

impl GameHost {
    pub fn new(
        session: GameSession,
        events: mpsc::Sender<String>,
        frame_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            session: Mutex::new(session),
            input: StdMutex::new(HeldInput::default()),
            frames: LatestFrame::new(),
            events,
            running: AtomicBool::new(false),
            connected: AtomicBool::new(true),
            frame_interval,
        })
    }

    pub fn frames(&self) -> &LatestFrame {
        &self.frames
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn send(&self, message: &ServerMessage) {
        if let Some(text) = protocol::encode_server_message(message) {
            push_event(&self.events, text);
        }
    }

    fn publish_frame(&self, session: &GameSession) {
        if let Some(text) =
            protocol::encode_server_message(&ServerMessage::Frame(session.snapshot()))
        {
            self.frames.store(text);
        }
    }

    pub async fn handle_text_message(self: &Arc<Self>, text: &str) {
        let Some(message) = protocol::decode_client_message(text) else { return };
        self.handle_client_message(message).await;
    }

    async fn handle_client_message(self: &Arc<Self>, message: ClientMessage) {
        let now = now_millis();
        if let ClientMessage::Input {
            turn_left,
            turn_right,
            boost,
            direction,
        } = message
        {
            *self.input.lock().unwrap_or_else(PoisonError::into_inner) = HeldInput {
                turn_left,
                turn_right,
                boost,
                direction,
            };
            return;
        }

        let mut session = self.session.lock().await;
        let changed = match message {
            ClientMessage::Start {
                ai_count,
                behaviors,
                name,
            } => {
                let config = GameConfig {
                    ai_count: ai_count.unwrap_or(DEFAULT_AI_COUNT),
                    behaviors: behaviors.unwrap_or_default(),
                    player_name: sanitize_player_name(name.as_deref().unwrap_or(""), "Player"),
                };
                session.start(config, now)
            }
            ClientMessage::Pause => session.pause(),
            ClientMessage::Resume => session.resume(now),
            ClientMessage::Restart => session.restart(now),
            ClientMessage::Menu => session.return_to_menu(),
            ClientMessage::Input { .. } => false,
        };
        if !changed {
            self.send(&ServerMessage::Error {
                message: format!("not allowed while {:?}", session.phase()),
            });
            return;
        }
        let phase = session.phase();
        self.send(&ServerMessage::Phase { phase });
        self.publish_frame(&session);
        drop(session);

        if phase == Phase::Playing {
            self.ensure_loop();
        }
    }

    fn ensure_loop(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }
        let host = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(host.frame_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if !host.run_frame().await {
                    break;
                }
            }
        });
    }

    /// One scheduled frame. Returns false once the loop should stop rescheduling.
    async fn run_frame(&self) -> bool {
        let mut session = self.session.lock().await;
        if !self.connected.load(Ordering::Acquire) || session.phase() != Phase::Playing {
            self.running.store(false, Ordering::Release);
            return false;
        }

        let input = self.sample_input(session.player_heading());
        if let Some(frame) = session.tick(now_millis(), input) {
            if let Some(text) = protocol::encode_server_message(&ServerMessage::Frame(frame)) {
                self.frames.store(text);
            }
        }

        let phase = session.phase();
        if phase != Phase::Playing {
            tracing::debug!(?phase, score = session.score(), "frame loop stopped");
            self.publish_frame(&session);
            self.send(&ServerMessage::Phase { phase });
            self.running.store(false, Ordering::Release);
            return false;
        }
        true
    }

    fn sample_input(&self, heading: Option<f64>) -> InputState {
        let held = *self.input.lock().unwrap_or_else(PoisonError::into_inner);
        match (held.direction, heading) {
            (Some(direction), Some(heading)) => resolve_touch(Some(direction), heading, held.boost),
            _ => InputState {
                turn_left: held.turn_left,
                turn_right: held.turn_right,
                boost: held.boost,
            },
        }
    }
}
