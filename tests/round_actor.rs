use std::sync::Once;
use std::time::Duration;

use noggin::config::RoundSettings;
use noggin::error::{domain_error::DomainError, Error};
use noggin::round::actor::{RoundActor, RoundWideEvent};
use noggin::round::actor_client::RoundStateReceiver;
use noggin::round::{Cue, RoundState};
use tokio::time;

static INIT_LOGGER: Once = Once::new();

fn init_logger() {
    INIT_LOGGER.call_once(|| std_logger::Config::logfmt().init());
}

fn words() -> Vec<String> {
    vec!["A", "B", "C"]
        .iter()
        .map(|word| word.to_string())
        .collect()
}

fn settings(total: u64, tick: u64, panic: u64) -> RoundSettings {
    RoundSettings {
        total_seconds: total,
        tick_interval_seconds: tick,
        panic_threshold_seconds: panic,
    }
}

async fn next_state(rx: &mut RoundStateReceiver) -> RoundState {
    match rx.next().await.expect("Round actor closed unexpectedly.") {
        RoundWideEvent::RoundState { state } => state,
    }
}

#[tokio::test(start_paused = true)]
async fn marking_and_skipping_walks_the_deck_and_tracks_the_score() {
    init_logger();
    let client = RoundActor::spawn(words(), &RoundSettings::default()).unwrap();
    let mut rx = client.subscribe().await.unwrap();

    let initial = next_state(&mut rx).await;
    assert!(words().contains(&initial.current_item));
    assert_eq!(initial.score, 0);
    assert_eq!(initial.remaining_seconds, 60);
    assert!(!initial.finished);
    assert_eq!(initial.pending_cue, None);

    let mut seen = vec![initial.current_item];
    for expected_score in 1..=3 {
        client.mark_correct().await.unwrap();
        let state = next_state(&mut rx).await;
        assert_eq!(state.score, expected_score);
        assert_eq!(state.pending_cue, Some(Cue::Correct));
        seen.push(state.current_item);
    }
    // The first three items shown are a full pass over the source list.
    let mut first_pass: Vec<String> = seen[0..3].to_vec();
    first_pass.sort();
    assert_eq!(first_pass, words());

    // The pass is exhausted, a skip draws from the reshuffled deck and is silent.
    client.skip().await.unwrap();
    let state = next_state(&mut rx).await;
    assert_eq!(state.score, 2);
    assert!(words().contains(&state.current_item));
    assert_eq!(state.pending_cue, Some(Cue::Correct));

    client.acknowledge_cue().await.unwrap();
    let state = next_state(&mut rx).await;
    assert_eq!(state.pending_cue, None);
}

#[tokio::test(start_paused = true)]
async fn countdown_reports_panic_ticks_and_expires() {
    init_logger();
    let client = RoundActor::spawn(words(), &settings(5, 1, 2)).unwrap();
    let mut rx = client.subscribe().await.unwrap();
    let initial = next_state(&mut rx).await;
    assert_eq!(initial.remaining_seconds, 5);

    // With the clock paused, awaiting the broadcast drives the ticker.
    let mut seen = Vec::new();
    for _ in 0..5 {
        let state = next_state(&mut rx).await;
        seen.push((state.remaining_seconds, state.pending_cue, state.finished));
    }

    assert_eq!(
        seen,
        vec![
            (4, None, false),
            (3, None, false),
            (2, Some(Cue::Panic), false),
            (1, Some(Cue::Panic), false),
            (0, Some(Cue::Expired), true),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn operations_after_expiry_are_rejected_and_the_finish_is_acknowledgeable() {
    init_logger();
    let client = RoundActor::spawn(words(), &settings(1, 1, 0)).unwrap();
    let mut rx = client.subscribe().await.unwrap();
    let _ = next_state(&mut rx).await;

    let expired = next_state(&mut rx).await;
    assert!(expired.finished);
    assert_eq!(expired.remaining_seconds, 0);
    assert_eq!(expired.pending_cue, Some(Cue::Expired));

    let result = client.mark_correct().await;
    assert_eq!(
        result,
        Err(Error::Domain(DomainError::RoundAlreadyFinished))
    );
    let state = next_state(&mut rx).await;
    assert_eq!(state.score, 0);

    client.acknowledge_finish().await.unwrap();
    let state = next_state(&mut rx).await;
    assert!(!state.finished);

    // Acknowledging again is a no-op.
    client.acknowledge_finish().await.unwrap();
    let state = next_state(&mut rx).await;
    assert!(!state.finished);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_countdown_and_is_idempotent() {
    init_logger();
    let client = RoundActor::spawn(words(), &RoundSettings::default()).unwrap();
    let mut rx = client.subscribe().await.unwrap();
    let initial = next_state(&mut rx).await;
    assert_eq!(initial.remaining_seconds, 60);

    client.cancel().await.unwrap();

    let last = next_state(&mut rx).await;
    assert_eq!(last.remaining_seconds, 60);
    assert!(!last.finished);

    // The actor is gone: no tick is ever delivered, the broadcast just closes.
    time::advance(Duration::from_secs(120)).await;
    assert!(rx.next().await.is_err());

    // Cancelling a torn-down round is still fine.
    client.cancel().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_every_client_stops_the_actor() {
    init_logger();
    let client = RoundActor::spawn(words(), &RoundSettings::default()).unwrap();
    let mut rx = client.subscribe().await.unwrap();
    let _ = next_state(&mut rx).await;

    drop(client);

    assert!(rx.next().await.is_err());
}

#[tokio::test]
async fn round_with_an_empty_word_list_fails_to_start() {
    init_logger();
    let result = RoundActor::spawn(Vec::default(), &RoundSettings::default());

    assert!(matches!(
        result,
        Err(Error::Domain(DomainError::EmptyWordList))
    ));
}
