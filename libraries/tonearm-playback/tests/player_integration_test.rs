//! Integration tests for the player orchestrator
//!
//! Each test drives the player the way a host page would: intents, media
//! events, fade timer ticks and audio/display callbacks.

mod common;

use common::{player, player_with, settle, start_playing};
use tonearm_audio::FrequencyRenderer;
use tonearm_playback::{
    FadeSettings, LyricsOutcome, MediaEvent, PlayerConfig, PlayerEvent, TransitionState,
    NOT_FOUND_TEXT,
};

// ===== Helpers =====

#[derive(Default)]
struct CountingRenderer {
    draws: usize,
    clears: usize,
    last: Vec<u8>,
}

impl FrequencyRenderer for CountingRenderer {
    fn draw(&mut self, bins: &[u8]) {
        self.draws += 1;
        self.last = bins.to_vec();
    }

    fn clear(&mut self) {
        self.clears += 1;
    }
}

fn tone(frames: usize, sample_rate: f32, freq: f32) -> Vec<f32> {
    let mut buffer = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let s = (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin() * 0.5;
        buffer.push(s);
        buffer.push(s);
    }
    buffer
}

// ===== Sequencing Scenarios =====

#[test]
fn test_next_wraps_through_catalog() {
    let mut player = player(3);

    player.next().unwrap();
    settle(&mut player);
    player.next().unwrap();
    settle(&mut player);
    assert_eq!(player.session().current_index(), 2);

    player.next().unwrap();
    settle(&mut player);
    assert_eq!(player.session().current_index(), 0);
}

#[test]
fn test_queue_takes_priority_over_order() {
    let mut player = player(3);
    start_playing(&mut player, 20.0);
    player.enqueue(2).unwrap();

    player.next().unwrap();
    settle(&mut player);

    assert_eq!(player.session().current_index(), 2);
    assert!(player.queue().is_empty());
    assert!(player.session().is_playing());
}

#[test]
fn test_enqueue_twice_keeps_one_entry() {
    let mut player = player(3);
    start_playing(&mut player, 5.0);

    assert!(player.enqueue(1).unwrap());
    assert!(!player.enqueue(1).unwrap());
    assert!(!player.enqueue(0).unwrap(), "current track is never queued");
    assert_eq!(player.queue().as_slice(), &[1]);
}

#[test]
fn test_previous_then_next_returns() {
    let mut player = player(4);
    player.select(2).unwrap();
    settle(&mut player);

    player.previous().unwrap();
    settle(&mut player);
    assert_eq!(player.session().current_index(), 1);

    player.next().unwrap();
    settle(&mut player);
    assert_eq!(player.session().current_index(), 2);
}

#[test]
fn test_shuffle_order_visits_every_track() {
    let mut player = player(6).with_shuffle_seed(17);
    player.toggle_shuffle();
    let order = player.shuffle_order().unwrap().to_vec();
    let start = order.iter().position(|&i| i == 0).unwrap();

    let mut visited = vec![0];
    for _ in 0..5 {
        player.next().unwrap();
        settle(&mut player);
        visited.push(player.session().current_index());
    }

    let expected: Vec<usize> = (0..6).map(|k| order[(start + k) % 6]).collect();
    assert_eq!(visited, expected);
    visited.sort_unstable();
    assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_natural_end_advances_or_loops() {
    let mut player = player(2);
    start_playing(&mut player, 180.0);

    player.handle_media_event(MediaEvent::Ended).unwrap();
    settle(&mut player);
    assert_eq!(player.session().current_index(), 1);

    player.toggle_loop();
    player.handle_media_event(MediaEvent::Ended).unwrap();
    assert_eq!(player.session().current_index(), 1);
    assert_eq!(player.transport().position, 0.0);
    assert!(player.session().is_playing());
}

// ===== Transition Scenarios =====

#[test]
fn test_fade_restores_target_volume() {
    let mut player = player(3);
    player.set_volume(0.7);
    start_playing(&mut player, 42.0);

    player.next().unwrap();
    assert!(matches!(player.transition_state(), TransitionState::FadingOut { .. }));
    settle(&mut player);

    assert_eq!(player.transport().volume, 0.7);
    assert!(player.session().is_playing());

    let history = &player.transport().volume_history;
    assert!(history.contains(&0.0), "fade should reach silence before the swap");
}

#[test]
fn test_request_mid_flight_is_ignored() {
    let mut player = player(4);
    start_playing(&mut player, 42.0);

    player.next().unwrap();
    player.tick();
    player.select(3).unwrap();
    assert_eq!(player.session().current_index(), 0);

    settle(&mut player);
    assert_eq!(player.session().current_index(), 1);
}

#[test]
fn test_transition_event_sequence() {
    let mut player = player(2);
    start_playing(&mut player, 10.0);
    player.drain_events();

    player.next().unwrap();
    settle(&mut player);
    let events = player.drain_events();

    let started = events
        .iter()
        .position(|e| matches!(e, PlayerEvent::TransitionStarted { from: 0, to: 1 }))
        .unwrap();
    let changed = events
        .iter()
        .position(|e| matches!(e, PlayerEvent::TrackChanged { index: 1, previous: Some(0), .. }))
        .unwrap();
    let completed = events
        .iter()
        .position(|e| matches!(e, PlayerEvent::TransitionCompleted { index: 1 }))
        .unwrap();
    assert!(started < changed && changed < completed);
    assert!(events.iter().any(|e| matches!(e, PlayerEvent::LyricsRequested(_))));
}

#[test]
fn test_autoplay_refusal_after_swap() {
    let mut player = player(2);
    player.transport_mut().refuse_play = true;

    player.next().unwrap();
    settle(&mut player);

    assert!(!player.is_busy());
    assert!(!player.session().is_playing());
    assert_eq!(player.session().current_index(), 1);
    assert_eq!(player.transport().volume, 1.0);
    assert!(player
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::PlaybackStartFailed { .. })));
}

#[test]
fn test_single_step_fade() {
    let config = PlayerConfig {
        fade: FadeSettings {
            duration_ms: 100,
            steps: 1,
        },
        ..PlayerConfig::default()
    };
    let mut player = player_with(2, config);
    start_playing(&mut player, 3.0);

    player.next().unwrap();
    player.tick();
    assert!(matches!(player.transition_state(), TransitionState::Swapping { .. }));
    settle(&mut player);
    assert_eq!(player.transport().volume, 1.0);
}

// ===== Audio and Visualizer =====

#[test]
fn test_audio_path_with_bass_boost() {
    let mut player = player(1);
    player.apply_preset("Bass Boost").unwrap();
    assert!(player.attach_audio(44100).unwrap());
    assert!(!player.attach_audio(48000).unwrap());

    let mut buffer = tone(44100, 44100.0, 40.0);
    player.process_audio(&mut buffer);
    let tail_peak = buffer[buffer.len() / 2..]
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(tail_peak > 0.6, "bass should be boosted, peak {tail_peak}");
}

#[test]
fn test_visualizer_follows_playback() {
    let mut player = player(2);
    let mut renderer = CountingRenderer::default();

    assert!(!player.render_frame(&mut renderer), "nothing before attach");
    player.attach_audio(44100).unwrap();

    player.play_pause();
    let mut buffer = tone(2048, 44100.0, 1000.0);
    player.process_audio(&mut buffer);
    assert!(player.render_frame(&mut renderer));
    assert_eq!(renderer.last.len(), 128);
    assert!(renderer.last.iter().any(|&b| b > 0));

    player.play_pause();
    assert!(!player.render_frame(&mut renderer));
    assert_eq!(renderer.clears, 1);

    player.play_pause();
    player.set_visualizer_visible(false);
    assert!(!player.render_frame(&mut renderer));
    assert_eq!(renderer.draws, 1);
}

// ===== Lyrics, Theme, Reset =====

#[test]
fn test_lyrics_follow_current_track() {
    let mut player = player(2);
    let first = player.lyrics().current_ticket().unwrap();

    player.next().unwrap();
    settle(&mut player);
    let second = player.lyrics().current_ticket().unwrap();
    assert_eq!(second.track, 1);

    assert!(!player.resolve_lyrics(first, LyricsOutcome::Found("stale".into())));
    assert!(player.resolve_lyrics(second, LyricsOutcome::Found("  \n\n".into())));
    assert_eq!(player.lyrics_text(), NOT_FOUND_TEXT);
}

#[test]
fn test_theme_round_trips_through_store() {
    let mut player = player(1);
    let toggled = player.toggle_theme().unwrap();
    assert_eq!(player.theme(), toggled);
    assert!(player
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::ThemeChanged { theme } if *theme == toggled)));
}

#[test]
fn test_reset_ignored_while_busy() {
    let mut player = player(3);
    start_playing(&mut player, 9.0);
    player.toggle_loop();
    player.next().unwrap();

    player.reset().unwrap();
    assert!(player.session().is_looping());

    settle(&mut player);
    player.reset().unwrap();
    assert!(!player.session().is_looping());
    assert_eq!(player.session().current_index(), 0);
    assert_eq!(player.transport().loaded.last().map(String::as_str), Some("track-0.mp3"));
}
