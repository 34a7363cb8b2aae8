use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Collect,
    Collision,
    PowerUp,
    GameOver,
}

/// Fire-and-forget audio notifications.
pub trait AudioSink: Send {
    fn play(&mut self, cue: SoundCue);

    fn play_music(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub player_name: String,
    pub score: i64,
    pub ai_count: usize,
    pub game_time_secs: i64,
}

/// High score is read once at construction and written only on a new record.
pub trait ScoreSink: Send {
    fn high_score(&self) -> i64;

    fn record_high_score(&mut self, score: i64);

    fn record_game(&mut self, record: GameRecord);
}

pub struct Services {
    pub audio: Box<dyn AudioSink>,
    pub scores: Box<dyn ScoreSink>,
}
