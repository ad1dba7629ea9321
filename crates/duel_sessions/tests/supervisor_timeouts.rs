//! Supervisor tests on tokio's paused clock.

use duel_games::{GameKind, SearchConfig};
use duel_sessions::{
    Action, ActionError, ArenaConfig, Mode, Phase, PlayerId, SessionRegistry, SupervisorError,
    SupervisorHandle, spawn,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

fn start() -> (SupervisorHandle, JoinHandle<SessionRegistry>) {
    let config = ArenaConfig::default()
        .with_rng_seed(3)
        .with_search(SearchConfig::default().with_blunder_rate(0.0));
    spawn(SessionRegistry::new(&config))
}

#[tokio::test(start_paused = true)]
async fn test_lobby_expires_on_the_clock() {
    let (handle, _task) = start();
    let id = handle
        .create(GameKind::TicTacToe, "ana".into(), Mode::VsPlayer)
        .await
        .unwrap();

    sleep(Duration::from_secs(59)).await;
    assert_eq!(handle.snapshot(id).await.unwrap().phase, Phase::LobbyWaiting);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(
        handle.submit(id, "ana".into(), Action::Move(0)).await,
        Err(SupervisorError::Action(ActionError::SessionExpiredOrUnknown(id)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_join_replaces_lobby_deadline() {
    let (handle, _task) = start();
    let id = handle
        .create(GameKind::ConnectFour, "ana".into(), Mode::VsPlayer)
        .await
        .unwrap();
    sleep(Duration::from_secs(30)).await;
    handle.submit(id, "bo".into(), Action::Join).await.unwrap();

    sleep(Duration::from_secs(60)).await;
    assert_eq!(handle.snapshot(id).await.unwrap().phase, Phase::Active);

    sleep(Duration::from_secs(241)).await;
    assert!(matches!(
        handle.snapshot(id).await,
        Err(SupervisorError::Action(ActionError::SessionExpiredOrUnknown(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_handles_share_one_registry() {
    let (handle, task) = start();
    let other = handle.clone();
    let id = handle
        .create(GameKind::TicTacToe, "ana".into(), Mode::VsAi)
        .await
        .unwrap();

    let report = other
        .submit(id, PlayerId::new("ana"), Action::Move(4))
        .await
        .unwrap();
    assert!(report.ai_move.is_some());

    handle.shutdown().await.unwrap();
    let registry = task.await.unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(
        other.create(GameKind::TicTacToe, "bo".into(), Mode::VsAi).await,
        Err(SupervisorError::Closed)
    );
}
