use super::*;
use crate::game::ai::{AiController, BehaviorTag};
use crate::game::constants::{HEAD_RADIUS, POWER_UP_CLEARANCE, REMAINS_LIFETIME_MS};
use crate::game::math::distance;
use crate::game::food::FoodKind;
use crate::game::services::testing::{MemoryScores, RecordingAudio};
use rand::SeedableRng;

pub(crate) fn make_session(seed: u64) -> (GameSession, RecordingAudio, MemoryScores) {
    make_session_with(seed, GameSettings::default(), 0)
}

fn make_session_with(
    seed: u64,
    settings: GameSettings,
    high_score: i64,
) -> (GameSession, RecordingAudio, MemoryScores) {
    let audio = RecordingAudio::default();
    let scores = MemoryScores {
        high_score,
        ..MemoryScores::default()
    };
    let services = Services {
        audio: Box::new(audio.clone()),
        scores: Box::new(scores.clone()),
    };
    let session = GameSession::new(settings, services, StdRng::seed_from_u64(seed));
    (session, audio, scores)
}

/// A started round with nothing but the player in it and periodic spawns disabled.
fn quiet_round(session: &mut GameSession, ai_count: usize) {
    let config = GameConfig {
        ai_count,
        ..GameConfig::default()
    };
    assert!(session.start(config, 0));
    session.ais.clear();
    session.food.clear();
    session.power_ups.clear();
    session.remains.clear();
    session.bursts.clear();
    session.next_food_top_up_at = i64::MAX;
    session.next_power_up_roll_at = i64::MAX;
}

fn add_ai(session: &mut GameSession, tag: BehaviorTag, pos: Point, length: usize, speed: f64) -> u32 {
    let id = session.next_entity_id();
    session.ais.push(Snake::new(
        id,
        SnakeOptions {
            pos,
            heading: 0.0,
            base_speed: speed,
            initial_length: length,
            color: "#0f0".to_string(),
            head_color: "#fff".to_string(),
            controller: Controller::Ai(AiController::new(tag, Some(pos))),
        },
    ));
    id
}

fn boost() -> InputState {
    InputState {
        boost: true,
        ..InputState::default()
    }
}

fn player(session: &GameSession) -> &Snake {
    session.player.as_ref().expect("player alive")
}

fn player_mut(session: &mut GameSession) -> &mut Snake {
    session.player.as_mut().expect("player alive")
}

#[test]
fn start_places_player_in_the_centre_facing_up() {
    let (mut session, audio, _) = make_session(1);
    assert_eq!(session.phase(), Phase::Menu);
    assert!(session.start(GameConfig::default(), 0));

    assert_eq!(session.phase(), Phase::Playing);
    let head = player(&session).head().pos;
    assert_eq!(head, Point::new(400.0, 300.0));
    assert!((player(&session).heading + PI / 2.0).abs() < 1e-9);
    assert_eq!(player(&session).segments.len(), PLAYER_START_LENGTH);
    assert_eq!(session.ais.len(), DEFAULT_AI_COUNT);
    assert_eq!(session.food.len(), INITIAL_FOOD);
    assert_eq!(session.score(), 0);
    assert_eq!(*audio.music_requests.lock().unwrap(), 1);
}

#[test]
fn configured_behaviors_fill_slots_in_order() {
    let (mut session, _, _) = make_session(2);
    let config = GameConfig {
        ai_count: 3,
        behaviors: vec![BehaviorChoice::Hunter, BehaviorChoice::Territorial],
        player_name: "Ada".to_string(),
    };
    assert!(session.start(config, 0));
    let tags: Vec<BehaviorTag> = session
        .ais
        .iter()
        .filter_map(|snake| snake.ai().map(|ai| ai.behavior))
        .collect();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0], BehaviorTag::Hunter);
    assert_eq!(tags[1], BehaviorTag::Territorial);
    assert_eq!(session.ais[0].color, BehaviorTag::Hunter.profile().color);
}

#[test]
fn ai_count_is_clamped() {
    let (mut session, _, _) = make_session(3);
    let config = GameConfig {
        ai_count: 50,
        ..GameConfig::default()
    };
    session.start(config, 0);
    assert_eq!(session.ais.len(), MAX_AI_COUNT);
}

#[test]
fn transitions_are_rejected_from_the_wrong_phase() {
    let (mut session, _, _) = make_session(4);
    assert!(!session.pause());
    assert!(!session.resume(0));
    assert!(!session.restart(0));
    assert!(session.tick(0, InputState::default()).is_none());

    assert!(session.start(GameConfig::default(), 0));
    assert!(!session.start(GameConfig::default(), 0));
    assert!(!session.resume(0));
    assert!(!session.restart(0));
    assert!(session.pause());
    assert!(!session.pause());
    assert!(session.resume(10));
    assert!(session.return_to_menu());
    assert!(!session.return_to_menu());
    assert!(session.player.is_none());
}

#[test]
fn eating_food_scores_grows_and_replaces_it() {
    let (mut session, audio, _) = make_session(5);
    quiet_round(&mut session, 1);
    let food_id = session.next_entity_id();
    session
        .food
        .push(Food::new(food_id, Point::new(400.0, 200.0), FoodKind::Regular));

    let mut now = 0;
    for _ in 0..100 {
        now += 16;
        assert!(session.tick(now, boost()).is_some());
        if session.score() > 0 {
            break;
        }
    }

    assert_eq!(session.score(), 10);
    assert_eq!(session.food.len(), 1);
    assert_ne!(session.food[0].id, food_id);
    assert!(session.bursts.iter().any(|burst| !burst.particles.is_empty()));
    assert_eq!(player(&session).target_length, PLAYER_START_LENGTH + 1);
    assert!(audio.cues.lock().unwrap().contains(&SoundCue::Collect));

    session.tick(now + 16, boost());
    assert_eq!(player(&session).segments.len(), PLAYER_START_LENGTH + 1);
}

#[test]
fn high_score_is_written_only_on_a_new_record() {
    let (mut session, _, scores) = make_session_with(6, GameSettings::default(), 50);
    quiet_round(&mut session, 1);
    assert_eq!(session.high_score(), 50);

    session.award_food(1);
    assert_eq!(session.score(), 10);
    for _ in 0..4 {
        session.award_food(1);
    }
    assert_eq!(session.score(), 50);
    assert!(scores.writes.lock().unwrap().is_empty());

    session.award_food(1);
    assert_eq!(session.high_score(), 60);
    session.award_food(1);
    assert_eq!(*scores.writes.lock().unwrap(), vec![60, 70]);
}

#[test]
fn ai_running_into_another_ai_leaves_remains_and_respawns() {
    let (mut session, audio, _) = make_session(7);
    quiet_round(&mut session, 2);
    let hunter = add_ai(&mut session, BehaviorTag::Hunter, Point::new(100.0, 100.0), 3, 2.0);
    let wall = add_ai(&mut session, BehaviorTag::Passive, Point::new(300.0, 500.0), 5, 0.0);
    session.ais[0].grow(2);
    let contact = session.ais[1].segments[2].pos;
    session.ais[0].segments[0].pos = contact;

    session.resolve_collisions(1000);

    assert_eq!(session.ais.len(), 1);
    assert_eq!(session.ais[0].id, wall);
    assert_ne!(session.ais[0].id, hunter);
    assert_eq!(session.remains.len(), 1);
    assert_eq!(session.remains[0].pos, contact);
    assert_eq!(session.remains[0].score_value, 20);
    assert_eq!(session.score(), 0);
    assert!(audio.cues.lock().unwrap().contains(&SoundCue::Collision));

    session.tick(5999, InputState::default());
    assert_eq!(session.ais.len(), 1);

    session.tick(6000, InputState::default());
    assert_eq!(session.ais.len(), 2);
    let spawned = session.ais.last().expect("respawned");
    let origin = *spawned.history.back().expect("history");
    let inset = crate::game::constants::AI_EDGE_INSET;
    assert!(
        origin.x == inset
            || origin.x == session.arena.width - inset
            || origin.y == inset
            || origin.y == session.arena.height - inset
    );
}

#[test]
fn ai_dying_on_the_player_awards_the_kill_bonus() {
    let (mut session, _, _) = make_session(8);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Aggressive, Point::new(100.0, 100.0), 3, 2.0);
    let body = player(&session).segments[3].pos;
    session.ais[0].segments[0].pos = body;
    player_mut(&mut session).segments[0].pos = Point::new(400.0, 250.0);

    session.resolve_collisions(500);

    assert!(session.ais.is_empty());
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.score(), 50);
    assert_eq!(session.remains.len(), 1);
    assert_eq!(session.deferred.len(), 1);
}

#[test]
fn player_touching_an_ai_body_ends_the_round() {
    let (mut session, audio, scores) = make_session(9);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Survivor, Point::new(300.0, 500.0), 5, 0.0);
    session.award_food(3);
    session.deferred.schedule(0, 100, DeferredAction::RespawnAi);
    let body = session.ais[0].segments[2].pos;
    player_mut(&mut session).segments[0].pos = body;

    session.resolve_collisions(1000);

    assert_eq!(session.phase(), Phase::GameOver);
    assert!(session.player.is_none());
    assert_eq!(session.deferred.len(), 0);
    assert!(audio.cues.lock().unwrap().contains(&SoundCue::GameOver));
    let games = scores.games.lock().unwrap().clone();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].score, 30);
    assert_eq!(games[0].ai_count, 1);
    assert!(session.tick(2000, InputState::default()).is_none());

    assert!(session.restart(3000));
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.score(), 0);
    assert!(session.player.is_some());
}

#[test]
fn invulnerable_player_survives_until_the_effect_lapses() {
    let (mut session, _, _) = make_session(10);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Survivor, Point::new(300.0, 500.0), 5, 0.0);
    let shield = PowerUp::new(99, Point::new(0.0, 0.0), PowerUpKind::Invulnerability);
    player_mut(&mut session).collect_power_up(&shield, 0);
    let body = session.ais[0].segments[2].pos;
    player_mut(&mut session).segments[0].pos = body;

    session.resolve_collisions(100);
    assert_eq!(session.phase(), Phase::Playing);

    session.clock_ms = shield.duration_ms;
    let clock = session.clock_ms;
    player_mut(&mut session).expire_power_ups(clock);
    session.resolve_collisions(200);
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn ghost_ai_is_not_destroyed_by_body_contact() {
    let (mut session, _, _) = make_session(11);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Hunter, Point::new(100.0, 100.0), 3, 2.0);
    let ghost = PowerUp::new(98, Point::new(0.0, 0.0), PowerUpKind::Ghost);
    session.ais[0].collect_power_up(&ghost, 0);
    let body = player(&session).segments[3].pos;
    session.ais[0].segments[0].pos = body;

    session.resolve_collisions(100);

    assert_eq!(session.ais.len(), 1);
    assert_eq!(session.score(), 0);
}

#[test]
fn pause_drops_pending_respawns_and_resume_rearms_them() {
    let (mut session, _, _) = make_session(12);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Collector, Point::new(100.0, 500.0), 3, 2.0);
    session.destroy_ai(0, false, 1000);
    assert_eq!(session.deferred.len(), 1);

    assert!(session.pause());
    assert_eq!(session.deferred.len(), 0);
    assert!(session.tick(100_000, InputState::default()).is_none());
    assert!(session.ais.is_empty());

    assert!(session.resume(100_000));
    assert_eq!(session.deferred.len(), 1);
    session.tick(104_999, InputState::default());
    assert!(session.ais.is_empty());
    session.tick(105_000, InputState::default());
    assert_eq!(session.ais.len(), 1);
}

#[test]
fn stale_respawn_does_not_fire_after_restart() {
    let (mut session, _, _) = make_session(13);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Collector, Point::new(100.0, 500.0), 3, 2.0);
    session.destroy_ai(0, false, 0);
    assert!(session.return_to_menu());
    assert!(session.start(GameConfig { ai_count: 1, ..GameConfig::default() }, 1000));
    assert_eq!(session.ais.len(), 1);

    session.tick(6000, InputState::default());
    assert_eq!(session.ais.len(), 1);
}

#[test]
fn play_clock_freezes_power_ups_while_paused() {
    let (mut session, _, _) = make_session(14);
    quiet_round(&mut session, 1);
    let speed = PowerUp::new(97, Point::new(0.0, 0.0), PowerUpKind::Speed);
    player_mut(&mut session).collect_power_up(&speed, 0);

    session.tick(16, InputState::default());
    assert!(session.pause());
    assert!(session.resume(60_000));
    session.tick(60_016, InputState::default());

    assert_eq!(session.clock_ms, 32);
    assert_eq!(
        player(&session).power_up_remaining_ms(PowerUpKind::Speed, session.clock_ms),
        Some(speed.duration_ms - 32)
    );
}

#[test]
fn collecting_a_power_up_shows_in_the_hud() {
    let (mut session, audio, _) = make_session(15);
    quiet_round(&mut session, 1);
    let head = player(&session).head().pos;
    session
        .power_ups
        .push(PowerUp::new(50, head, PowerUpKind::Invulnerability));

    session.resolve_collisions(0);
    session.refresh_hud();

    assert!(session.power_ups.is_empty());
    assert!(player(&session).invulnerable);
    assert_eq!(session.hud.active_power_ups.len(), 1);
    assert_eq!(session.hud.active_power_ups[0].seconds_left, 7);
    assert!(audio.cues.lock().unwrap().contains(&SoundCue::PowerUp));
}

#[test]
fn player_eats_remains_for_proportional_growth() {
    let (mut session, _, _) = make_session(16);
    quiet_round(&mut session, 1);
    let head = player(&session).head().pos;
    session
        .remains
        .push(Remains::new(60, head, "#f00".to_string(), 45, 0));

    session.resolve_collisions(0);

    assert!(session.remains.is_empty());
    assert_eq!(session.score(), 45);
    assert_eq!(player(&session).target_length, PLAYER_START_LENGTH + 3);
}

#[test]
fn ai_snakes_leave_remains_alone() {
    let (mut session, _, _) = make_session(17);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Collector, Point::new(100.0, 100.0), 3, 2.0);
    session
        .remains
        .push(Remains::new(61, Point::new(100.0, 100.0), "#f00".to_string(), 45, 0));

    session.resolve_collisions(0);
    assert_eq!(session.remains.len(), 1);
}

#[test]
fn remains_expire_on_the_play_clock() {
    let (mut session, _, _) = make_session(18);
    quiet_round(&mut session, 1);
    session
        .remains
        .push(Remains::new(62, Point::new(50.0, 50.0), "#f00".to_string(), 10, 0));

    session.clock_ms = REMAINS_LIFETIME_MS - 1;
    session.prune();
    assert_eq!(session.remains.len(), 1);

    session.clock_ms = REMAINS_LIFETIME_MS;
    session.prune();
    assert!(session.remains.is_empty());
}

#[test]
fn ai_eating_food_grows_its_score() {
    let (mut session, _, _) = make_session(19);
    quiet_round(&mut session, 1);
    add_ai(&mut session, BehaviorTag::Collector, Point::new(100.0, 100.0), 3, 2.0);
    session
        .food
        .push(Food::new(70, Point::new(100.0 + HEAD_RADIUS, 100.0), FoodKind::Special));

    session.resolve_collisions(0);

    assert_eq!(session.ais[0].score(), 30);
    assert_eq!(session.score(), 0);
    assert_eq!(session.food.len(), 1);
    assert_ne!(session.food[0].id, 70);
}

#[test]
fn disabled_effects_and_sound_stay_quiet() {
    let settings = GameSettings {
        sound_enabled: false,
        particle_effects: false,
        ..GameSettings::default()
    };
    let (mut session, audio, _) = make_session_with(20, settings, 0);
    quiet_round(&mut session, 1);
    let head = player(&session).head().pos;
    session.food.push(Food::new(71, head, FoodKind::Regular));

    session.resolve_collisions(0);

    assert_eq!(session.score(), 10);
    assert!(session.bursts.is_empty());
    assert!(audio.cues.lock().unwrap().is_empty());
    assert_eq!(*audio.music_requests.lock().unwrap(), 0);
}

#[test]
fn minimum_food_is_restored_every_frame() {
    let (mut session, _, _) = make_session(21);
    quiet_round(&mut session, 1);
    assert!(session.food.is_empty());
    session.tick(16, InputState::default());
    assert_eq!(session.food.len(), MIN_FOOD);

    session.next_food_top_up_at = session.clock_ms;
    session.tick(32, InputState::default());
    assert_eq!(session.food.len(), MIN_FOOD + 1);
    assert!(session.next_food_top_up_at >= session.clock_ms + FOOD_TOP_UP_MIN_MS);
}

#[test]
fn snapshot_serializes_for_the_render_sink() {
    let (mut session, _, _) = make_session(22);
    session.start(GameConfig::default(), 0);
    let frame = session.tick(16, InputState::default()).expect("frame");
    let value = serde_json::to_value(&frame).expect("json");
    assert_eq!(value["phase"], "playing");
    assert_eq!(value["width"], 800.0);
    assert_eq!(value["snakes"][0]["isPlayer"], true);
    assert!(value["hud"]["highScore"].is_number());
    assert!(value["powerUps"].is_array());

    session.pause();
    let paused = serde_json::to_value(session.snapshot()).expect("json");
    assert_eq!(paused["phase"], "paused");
}

#[test]
fn power_up_rolls_are_rescheduled_every_interval() {
    let (mut session, _, _) = make_session(30);
    quiet_round(&mut session, 1);
    session.clock_ms = 12_000;
    session.next_power_up_roll_at = session.clock_ms;
    session.replenish();
    assert_eq!(
        session.next_power_up_roll_at,
        12_000 + POWER_UP_ROLL_INTERVAL_MS
    );

    let before = session.power_ups.len();
    session.clock_ms = 12_000 + POWER_UP_ROLL_INTERVAL_MS - 1;
    session.replenish();
    assert_eq!(session.power_ups.len(), before);
    assert_eq!(
        session.next_power_up_roll_at,
        12_000 + POWER_UP_ROLL_INTERVAL_MS
    );
}

#[test]
fn power_up_rolls_fill_up_to_the_cap() {
    let (mut session, _, _) = make_session(31);
    quiet_round(&mut session, 1);
    for _ in 0..200 {
        session.clock_ms += POWER_UP_ROLL_INTERVAL_MS;
        session.next_power_up_roll_at = session.clock_ms;
        session.replenish();
        assert!(session.power_ups.len() <= POWER_UP_MAX_COUNT);
    }
    assert_eq!(session.power_ups.len(), POWER_UP_MAX_COUNT);
    let head = player(&session).head().pos;
    for power_up in &session.power_ups {
        assert!(distance(head, power_up.pos) > POWER_UP_CLEARANCE);
    }
}

#[test]
fn no_power_up_spawns_at_the_cap() {
    let (mut session, _, _) = make_session(32);
    quiet_round(&mut session, 1);
    for (index, kind) in PowerUpKind::ALL.into_iter().enumerate() {
        let pos = Point::new(100.0 + 100.0 * index as f64, 100.0);
        session.power_ups.push(PowerUp::new(900 + index as u32, pos, kind));
    }
    assert_eq!(session.power_ups.len(), POWER_UP_MAX_COUNT);
    for _ in 0..50 {
        session.clock_ms += POWER_UP_ROLL_INTERVAL_MS;
        session.next_power_up_roll_at = session.clock_ms;
        session.replenish();
        assert_eq!(session.power_ups.len(), POWER_UP_MAX_COUNT);
        assert_eq!(
            session.next_power_up_roll_at,
            session.clock_ms + POWER_UP_ROLL_INTERVAL_MS
        );
    }
}
