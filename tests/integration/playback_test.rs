//! Integration tests for the player engine driven by a manual clock

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use castplay::clock::{ManualTime, Media, TimeSource};
use castplay::terminal::CaptureTerminal;
use castplay::{Player, PlayerOptions, Session, TransportState};

use super::helpers::{fixtures_dir, ms, Positions};

type TestPlayer = Player<CaptureTerminal, Positions>;

fn sample() -> Session {
    Session::load(fixtures_dir().join("sample.cast")).expect("Should load sample.cast")
}

fn free_player() -> (ManualTime, TestPlayer) {
    let time = ManualTime::new();
    let player = Player::with_free_clock(
        sample(),
        CaptureTerminal::new(),
        Positions::default(),
        Rc::new(time.clone()),
        PlayerOptions::default(),
    )
    .expect("Should create player");
    (time, player)
}

/// Step wall time in `step` increments, dispatching timers, until `until`.
fn run(time: &ManualTime, player: &mut TestPlayer, step: Duration, until: Duration) {
    player.fire_due().unwrap();
    while time.now() < until {
        time.advance(step);
        player.fire_due().unwrap();
    }
}

#[test]
fn plays_recording_to_the_end() {
    let (time, mut player) = free_player();
    assert_eq!(player.terminal().geometry, Some((100, 30)));
    assert_eq!(player.display().max, Some(ms(1750)));

    player.toggle().unwrap();
    run(&time, &mut player, ms(10), ms(2000));

    let session = sample();
    assert_eq!(player.state(), TransportState::Ended);
    assert_eq!(
        player.terminal().screen(),
        session.prefix_output(session.len()).as_slice()
    );
    assert_eq!(player.display().last(), Some(ms(1750)));
    assert_eq!(player.next_deadline(), None);
}

#[test]
fn screen_matches_prefix_while_playing() {
    let (time, mut player) = free_player();
    let session = sample();
    player.toggle().unwrap();

    for checkpoint in [ms(100), ms(600), ms(800), ms(1500)] {
        run(&time, &mut player, ms(10), checkpoint);
        let expected = session.prefix_output(session.count_at(checkpoint));
        assert_eq!(
            player.terminal().screen(),
            expected.as_slice(),
            "at {:?}",
            checkpoint
        );
    }
}

#[test]
fn pause_holds_output_and_resume_continues() {
    let (time, mut player) = free_player();
    player.toggle().unwrap();
    run(&time, &mut player, ms(10), ms(600));
    player.toggle().unwrap();
    assert_eq!(player.state(), TransportState::Paused);

    // Time passing while paused writes nothing
    let writes = player.terminal().writes;
    time.advance(ms(5000));
    player.fire_due().unwrap();
    assert_eq!(player.terminal().writes, writes);
    assert_eq!(player.next_deadline(), None);

    // The remaining 150ms to the next event are honoured on resume
    player.toggle().unwrap();
    assert_eq!(player.pending_tick(), Some(ms(150)));
    time.advance(ms(150));
    player.fire_due().unwrap();
    assert_eq!(player.terminal().screen_text(), "$ echo hi\r\nhi\r\n");
}

#[test]
fn seeks_back_and_forth() {
    let (_time, mut player) = free_player();

    player.seek(ms(1000)).unwrap();
    assert_eq!(player.terminal().screen_text(), "$ echo hi\r\nhi\r\n");
    assert_eq!(player.terminal().clears, 0);

    player.seek(ms(600)).unwrap();
    assert_eq!(player.terminal().screen_text(), "$ echo hi\r\n");
    assert_eq!(player.terminal().clears, 1);
    assert_eq!(player.state(), TransportState::Paused);
    assert_eq!(player.display().last(), Some(ms(600)));

    // Seeking past the end is clamped to the duration
    player.seek(ms(60_000)).unwrap();
    assert_eq!(player.position(), ms(1750));
    assert_eq!(player.terminal().screen_text(), "$ echo hi\r\nhi\r\n$ exit\r\n");
}

#[test]
fn toggle_after_end_restarts() {
    let (time, mut player) = free_player();
    player.toggle().unwrap();
    run(&time, &mut player, ms(50), ms(2000));
    assert_eq!(player.state(), TransportState::Ended);

    player.toggle().unwrap();
    assert_eq!(player.state(), TransportState::Playing);
    assert_eq!(player.position(), Duration::ZERO);
    assert!(player.display().values.contains(&Duration::ZERO));

    player.fire_due().unwrap();
    assert_eq!(player.terminal().screen_text(), "$ ");
}

#[test]
fn slide_gesture_pauses_once_and_seeks_on_release() {
    let (time, mut player) = free_player();
    player.toggle().unwrap();
    run(&time, &mut player, ms(10), ms(300));

    player.on_slide(ms(900)).unwrap();
    assert_eq!(player.state(), TransportState::Paused);
    player.on_slide(ms(1100)).unwrap();
    player.on_slide_end(ms(1100)).unwrap();

    assert_eq!(player.position(), ms(1100));
    assert_eq!(player.terminal().screen_text(), "$ echo hi\r\nhi\r\n");
}

#[derive(Debug, Default)]
struct Track {
    playing: bool,
    position: f64,
    duration: Option<f64>,
}

/// Narration track whose position the test moves by hand.
#[derive(Debug, Clone, Default)]
struct SharedTrack(Rc<RefCell<Track>>);

impl Media for SharedTrack {
    fn play(&mut self) {
        self.0.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn current_time(&self) -> f64 {
        self.0.borrow().position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.0.borrow_mut().position = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.0.borrow().duration
    }
}

#[test]
fn narration_track_drives_playback() {
    let time = ManualTime::new();
    let track = SharedTrack::default();
    let mut player = Player::with_media(
        sample(),
        CaptureTerminal::new(),
        Positions::default(),
        Rc::new(time.clone()),
        track.clone(),
        PlayerOptions::default(),
    )
    .unwrap();

    // Not startable until the track can play through
    player.toggle().unwrap();
    assert_eq!(player.state(), TransportState::Paused);

    track.0.borrow_mut().duration = Some(3.0);
    player.on_duration_change().unwrap();
    player.on_can_play_through();
    assert_eq!(player.max_seek(), ms(3000));
    assert_eq!(player.display().max, Some(ms(3000)));

    player.toggle().unwrap();
    assert!(track.0.borrow().playing);
    player.fire_due().unwrap();
    assert_eq!(player.terminal().screen_text(), "$ ");

    // The track ran ahead of wall time: the overdue event follows at once
    // and the next delay is measured from the track position
    track.0.borrow_mut().position = 1.0;
    time.advance(ms(500));
    player.fire_due().unwrap();
    assert_eq!(player.terminal().screen_text(), "$ echo hi\r\nhi\r\n");
    assert_eq!(player.pending_tick(), Some(ms(750)));

    player.on_media_ended().unwrap();
    assert_eq!(player.state(), TransportState::Ended);
    assert_eq!(player.display().last(), Some(ms(3000)));
    assert!(!track.0.borrow().playing);
}

#[test]
fn empty_session_ends_immediately() {
    let time = ManualTime::new();
    let mut player = Player::with_free_clock(
        Session::empty(ms(500)),
        CaptureTerminal::new(),
        Positions::default(),
        Rc::new(time),
        PlayerOptions::default(),
    )
    .unwrap();

    player.toggle().unwrap();
    assert_eq!(player.state(), TransportState::Ended);
    assert!(player.terminal().screen().is_empty());
}
