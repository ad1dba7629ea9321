//! Registry-level lifecycle tests driven with explicit instants.

use duel_games::{GameKind, Hand, Mark, SearchConfig};
use duel_sessions::{
    Action, ActionError, ArenaConfig, GuardViolation, Mode, Outcome, OutcomeRecorder, Participant,
    Phase, PlayerId, RoundOutcome, Seat, SessionId, SessionObserver, SessionRegistry,
    SessionSnapshot, TableView, TerminalNotice, TerminalReason, TimeoutOutcome,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Default)]
struct Log {
    snapshots: Arc<Mutex<Vec<SessionSnapshot>>>,
    notices: Arc<Mutex<Vec<TerminalNotice>>>,
    outcomes: Arc<Mutex<Vec<(Participant, GameKind, Outcome, bool)>>>,
}

impl SessionObserver for Log {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }

    fn on_terminal(&mut self, notice: &TerminalNotice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

impl OutcomeRecorder for Log {
    fn record_outcome(
        &mut self,
        participant: &Participant,
        kind: GameKind,
        outcome: Outcome,
        vs_ai: bool,
    ) {
        self.outcomes
            .lock()
            .unwrap()
            .push((participant.clone(), kind, outcome, vs_ai));
    }
}

impl Log {
    fn reasons(&self) -> Vec<TerminalReason> {
        self.notices.lock().unwrap().iter().map(|n| n.reason).collect()
    }
}

fn setup() -> (SessionRegistry, Log, Instant) {
    let log = Log::default();
    let config = ArenaConfig::default()
        .with_rng_seed(11)
        .with_search(SearchConfig::default().with_blunder_rate(0.0));
    let registry = SessionRegistry::new(&config)
        .with_observer(log.clone())
        .with_recorder(log.clone());
    (registry, log, Instant::now())
}

fn ana() -> PlayerId {
    PlayerId::new("ana")
}

fn bo() -> PlayerId {
    PlayerId::new("bo")
}

fn joined(reg: &mut SessionRegistry, kind: GameKind, now: Instant) -> SessionId {
    let id = reg.create(kind, ana(), Mode::VsPlayer, now).unwrap();
    reg.submit(id, &bo(), Action::Join, now).unwrap();
    id
}

fn play(reg: &mut SessionRegistry, id: SessionId, moves: &[usize], now: Instant) -> Option<RoundOutcome> {
    let mut last = None;
    for (i, &pos) in moves.iter().enumerate() {
        let actor = if i % 2 == 0 { ana() } else { bo() };
        last = reg.submit(id, &actor, Action::Move(pos), now).unwrap().resolution;
    }
    last
}

const ANA_WINS: [usize; 5] = [0, 3, 1, 4, 2];
const DRAW: [usize; 9] = [0, 1, 2, 4, 3, 5, 7, 6, 8];

#[test]
fn test_lobby_timeout_makes_session_unknown() {
    let (mut reg, log, now) = setup();
    let id = reg.create(GameKind::TicTacToe, ana(), Mode::VsPlayer, now).unwrap();

    assert!(reg.expire_due(now + Duration::from_secs(59)).is_empty());
    assert_eq!(reg.expire_due(now + Duration::from_secs(60)), vec![id]);

    assert_eq!(
        reg.submit(id, &ana(), Action::Move(0), now + Duration::from_secs(61)),
        Err(ActionError::SessionExpiredOrUnknown(id))
    );
    assert_eq!(log.reasons(), vec![TerminalReason::TimedOut(Phase::LobbyWaiting)]);
    assert!(reg.is_empty());
}

#[test]
fn test_timeout_emits_final_snapshot() {
    let (mut reg, log, now) = setup();
    let id = reg.create(GameKind::TicTacToe, ana(), Mode::VsPlayer, now).unwrap();
    assert_eq!(log.snapshots.lock().unwrap().len(), 1);

    reg.expire_due(now + Duration::from_secs(60));
    let snapshots = log.snapshots.lock().unwrap().clone();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1].id, id);
    assert_eq!(snapshots[1].phase, Phase::Terminal);
}

#[test]
fn test_self_join_rejected() {
    let (mut reg, _log, now) = setup();
    let id = reg.create(GameKind::TicTacToe, ana(), Mode::VsPlayer, now).unwrap();
    assert_eq!(
        reg.submit(id, &ana(), Action::Join, now),
        Err(ActionError::Guard(GuardViolation::CannotJoinSelf))
    );
    assert_eq!(*reg.get(id).unwrap().phase(), Phase::LobbyWaiting);
}

#[test]
fn test_only_creator_cancels_lobby() {
    let (mut reg, log, now) = setup();
    let id = reg.create(GameKind::ConnectFour, ana(), Mode::VsPlayer, now).unwrap();
    assert_eq!(
        reg.submit(id, &bo(), Action::Cancel, now),
        Err(ActionError::Guard(GuardViolation::OnlyCreatorMayCancel))
    );
    let report = reg.submit(id, &ana(), Action::Cancel, now).unwrap();
    assert_eq!(report.snapshot.phase, Phase::Terminal);
    assert_eq!(log.reasons(), vec![TerminalReason::Cancelled]);
    assert!(reg.get(id).is_err());
}

#[test]
fn test_rejected_moves_leave_state_unchanged() {
    let (mut reg, log, now) = setup();
    let id = joined(&mut reg, GameKind::TicTacToe, now);
    reg.submit(id, &ana(), Action::Move(4), now).unwrap();
    let before = reg.snapshot(id).unwrap();
    let emitted = log.snapshots.lock().unwrap().len();

    assert_eq!(
        reg.submit(id, &ana(), Action::Move(0), now),
        Err(ActionError::Guard(GuardViolation::NotYourTurn))
    );
    assert!(matches!(
        reg.submit(id, &bo(), Action::Move(4), now),
        Err(ActionError::Guard(GuardViolation::IllegalPlacement(_)))
    ));
    assert_eq!(
        reg.submit(id, &bo(), Action::RematchVote, now),
        Err(ActionError::Guard(GuardViolation::WrongPhase {
            phase: Phase::Active
        }))
    );

    assert_eq!(reg.snapshot(id).unwrap(), before);
    assert_eq!(log.snapshots.lock().unwrap().len(), emitted);
}

#[test]
fn test_one_snapshot_per_accepted_action() {
    let (mut reg, log, now) = setup();
    let id = joined(&mut reg, GameKind::ConnectFour, now);
    reg.submit(id, &ana(), Action::Move(3), now).unwrap();
    assert_eq!(log.snapshots.lock().unwrap().len(), 3);
}

#[test]
fn test_draw_after_win_resets_streaks() {
    let (mut reg, log, now) = setup();
    let id = joined(&mut reg, GameKind::TicTacToe, now);
    assert_eq!(play(&mut reg, id, &ANA_WINS, now), Some(RoundOutcome::Won(Seat::A)));
    assert_eq!(*reg.get(id).unwrap().ledger().a().streak(), 1);

    reg.submit(id, &ana(), Action::RematchVote, now).unwrap();
    let id = reg.submit(id, &bo(), Action::RematchVote, now).unwrap().id;

    assert_eq!(play(&mut reg, id, &DRAW, now), Some(RoundOutcome::Drawn));
    let session = reg.get(id).unwrap();
    let ledger = session.ledger();
    assert_eq!(*ledger.draws(), 1);
    assert_eq!(*ledger.a().streak(), 0);
    assert_eq!(*ledger.b().streak(), 0);
    assert_eq!(*ledger.a().best_streak(), 1);
    assert_eq!(*session.phase(), Phase::RematchPending);
    assert_eq!(ledger.games_played(), 2);

    assert_eq!(
        log.reasons(),
        vec![TerminalReason::Won(Seat::A), TerminalReason::Drawn]
    );
}

#[test]
fn test_single_vote_keeps_rematch_pending() {
    let (mut reg, _log, now) = setup();
    for voter in [ana(), bo()] {
        let id = joined(&mut reg, GameKind::TicTacToe, now);
        play(&mut reg, id, &DRAW, now);

        let report = reg.submit(id, &voter, Action::RematchVote, now).unwrap();
        assert_eq!(report.id, id);
        assert_eq!(report.snapshot.phase, Phase::RematchPending);
        assert_eq!(*report.snapshot.consent.a(), voter == ana());
        assert_eq!(*report.snapshot.consent.b(), voter == bo());
    }

    let id = joined(&mut reg, GameKind::TicTacToe, now);
    play(&mut reg, id, &DRAW, now);
    assert_eq!(
        reg.submit(id, &PlayerId::new("cy"), Action::RematchVote, now),
        Err(ActionError::Guard(GuardViolation::NotParticipant))
    );
}

#[test]
fn test_rematch_moves_session_to_new_id() {
    let (mut reg, _log, now) = setup();
    let id = joined(&mut reg, GameKind::TicTacToe, now);
    play(&mut reg, id, &ANA_WINS, now);

    reg.submit(id, &ana(), Action::RematchVote, now).unwrap();
    let report = reg.submit(id, &bo(), Action::RematchVote, now).unwrap();
    let fresh = report.id;

    assert_ne!(fresh, id);
    assert_eq!(report.snapshot.phase, Phase::Active);
    assert_eq!(report.snapshot.round, 2);
    assert_eq!(*report.snapshot.ledger.a().wins(), 1);
    assert_eq!(report.snapshot.turn_owner, Some(Participant::Player(ana())));
    assert_eq!(
        reg.submit(id, &ana(), Action::Move(0), now),
        Err(ActionError::SessionExpiredOrUnknown(id))
    );
    assert_eq!(reg.ids(), vec![fresh]);
}

#[test]
fn test_ai_replies_and_records_both_participants() {
    let (mut reg, log, now) = setup();
    let id = reg.create(GameKind::TicTacToe, ana(), Mode::VsAi, now).unwrap();

    let report = reg.submit(id, &ana(), Action::Move(4), now).unwrap();
    let reply = report.ai_move.unwrap();
    assert!([0, 2, 6, 8].contains(&reply));
    assert_eq!(report.snapshot.board().unwrap().count(Mark::O), 1);
    assert_eq!(report.snapshot.turn_owner, Some(Participant::Player(ana())));

    // Play out the round with the lowest free cell each turn.
    let mut resolution = report.resolution;
    while resolution.is_none() {
        let pos = reg.snapshot(id).unwrap().board().unwrap().legal_moves()[0];
        resolution = reg.submit(id, &ana(), Action::Move(pos), now).unwrap().resolution;
    }
    assert_ne!(resolution, Some(RoundOutcome::Won(Seat::A)));

    let outcomes = log.outcomes.lock().unwrap().clone();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].0, Participant::Player(ana()));
    assert_eq!(outcomes[1].0, Participant::Ai);
    assert!(outcomes.iter().all(|(_, kind, _, vs_ai)| *kind == GameKind::TicTacToe && *vs_ai));
}

#[test]
fn test_ai_rematch_needs_only_creator() {
    let (mut reg, _log, now) = setup();
    let id = reg.create(GameKind::TicTacToe, ana(), Mode::VsAi, now).unwrap();
    let mut current = None;
    while current.is_none() {
        let pos = reg.snapshot(id).unwrap().board().unwrap().legal_moves()[0];
        current = reg
            .submit(id, &ana(), Action::Move(pos), now)
            .unwrap()
            .resolution;
    }
    let report = reg.submit(id, &ana(), Action::RematchVote, now).unwrap();
    assert_eq!(report.snapshot.phase, Phase::Active);
    assert_ne!(report.id, id);
}

#[test]
fn test_stale_ticket_is_ignored() {
    let (mut reg, _log, now) = setup();
    let id = reg.create(GameKind::TicTacToe, ana(), Mode::VsPlayer, now).unwrap();
    let lobby = reg.get(id).unwrap().ticket();
    reg.submit(id, &bo(), Action::Join, now).unwrap();

    assert_eq!(
        reg.fire_timeout(id, lobby, now + Duration::from_secs(61)),
        TimeoutOutcome::Stale
    );
    assert_eq!(*reg.get(id).unwrap().phase(), Phase::Active);
}

#[test]
fn test_moves_do_not_rearm_active_deadline() {
    let (mut reg, log, now) = setup();
    let id = joined(&mut reg, GameKind::ConnectFour, now);
    reg.submit(id, &ana(), Action::Move(3), now + Duration::from_secs(200))
        .unwrap();

    assert_eq!(reg.expire_due(now + Duration::from_secs(300)), vec![id]);
    assert_eq!(log.reasons(), vec![TerminalReason::TimedOut(Phase::Active)]);
}

#[test]
fn test_rematch_window_times_out() {
    let (mut reg, log, now) = setup();
    let id = joined(&mut reg, GameKind::TicTacToe, now);
    let later = now + Duration::from_secs(10);
    play(&mut reg, id, &ANA_WINS, later);
    reg.submit(id, &bo(), Action::RematchVote, later).unwrap();

    assert!(reg.expire_due(later + Duration::from_secs(119)).is_empty());
    assert_eq!(reg.expire_due(later + Duration::from_secs(120)), vec![id]);
    assert_eq!(
        log.reasons().last(),
        Some(&TerminalReason::TimedOut(Phase::RematchPending))
    );
}

#[test]
fn test_rock_paper_scissors_against_player() {
    let (mut reg, log, now) = setup();
    let id = joined(&mut reg, GameKind::RockPaperScissors, now);

    let report = reg.submit(id, &ana(), Action::Throw(Hand::Rock), now).unwrap();
    assert_eq!(report.resolution, None);
    assert_eq!(
        report.snapshot.table,
        TableView::Throws {
            a_ready: true,
            b_ready: false,
            revealed: None
        }
    );
    assert_eq!(report.snapshot.turn_owner, None);
    assert_eq!(
        reg.submit(id, &ana(), Action::Throw(Hand::Paper), now),
        Err(ActionError::Guard(GuardViolation::AlreadyThrown))
    );

    let report = reg.submit(id, &bo(), Action::Throw(Hand::Paper), now).unwrap();
    assert_eq!(report.resolution, Some(RoundOutcome::Won(Seat::B)));
    assert_eq!(report.snapshot.phase, Phase::RematchPending);
    assert_eq!(*report.snapshot.ledger.b().streak(), 1);

    let outcomes = log.outcomes.lock().unwrap().clone();
    assert_eq!(
        outcomes,
        vec![
            (Participant::Player(ana()), GameKind::RockPaperScissors, Outcome::Loss, false),
            (Participant::Player(bo()), GameKind::RockPaperScissors, Outcome::Win, false),
        ]
    );

    reg.submit(id, &ana(), Action::RematchVote, now).unwrap();
    let report = reg.submit(id, &bo(), Action::RematchVote, now).unwrap();
    assert_ne!(report.id, id);
    assert_eq!(report.snapshot.round, 2);
    assert_eq!(
        report.snapshot.table,
        TableView::Throws {
            a_ready: false,
            b_ready: false,
            revealed: None
        }
    );
}

#[test]
fn test_rock_paper_scissors_against_ai() {
    let (mut reg, log, now) = setup();
    let mut id = reg
        .create(GameKind::RockPaperScissors, ana(), Mode::VsAi, now)
        .unwrap();
    let mut ledger_games = 0;
    for round in 1..=5 {
        let report = reg.submit(id, &ana(), Action::Throw(Hand::Rock), now).unwrap();
        let ai = report.ai_throw.unwrap();
        let TableView::Throws { revealed, .. } = report.snapshot.table else {
            panic!("expected throws view");
        };
        assert_eq!(revealed, Some((Hand::Rock, ai)));
        let expected = match ai {
            Hand::Rock => RoundOutcome::Drawn,
            Hand::Paper => RoundOutcome::Won(Seat::B),
            Hand::Scissors => RoundOutcome::Won(Seat::A),
        };
        assert_eq!(report.resolution, Some(expected));
        ledger_games = report.snapshot.ledger.games_played();
        assert_eq!(ledger_games, round);
        id = reg.submit(id, &ana(), Action::RematchVote, now).unwrap().id;
    }
    assert_eq!(ledger_games, 5);
    assert_eq!(log.outcomes.lock().unwrap().len(), 10);
    assert!(
        log.outcomes
            .lock()
            .unwrap()
            .iter()
            .all(|(_, kind, _, vs_ai)| *kind == GameKind::RockPaperScissors && *vs_ai)
    );
}

#[test]
fn test_rock_paper_scissors_rejects_board_moves() {
    let (mut reg, _log, now) = setup();
    let id = reg
        .create(GameKind::RockPaperScissors, ana(), Mode::VsAi, now)
        .unwrap();
    assert_eq!(
        reg.submit(id, &ana(), Action::Move(0), now),
        Err(ActionError::Guard(GuardViolation::WrongGame {
            kind: GameKind::RockPaperScissors
        }))
    );
}

#[test]
fn test_kinds_without_rules_are_refused() {
    let (mut reg, _log, now) = setup();
    for kind in [GameKind::Hangman, GameKind::Blackjack] {
        assert!(reg.create(kind, ana(), Mode::VsPlayer, now).is_err());
    }
    assert!(reg.is_empty());
}
