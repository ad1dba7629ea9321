//! Async front end for a [`SessionRegistry`].
//!
//! One task owns the registry. Commands arrive over an mpsc channel and are
//! handled one at a time, and between commands the task sleeps until the
//! earliest phase deadline.

use crate::events::SessionSnapshot;
use crate::ids::{Mode, PlayerId, SessionId};
use crate::registry::{ActionReport, SessionRegistry};
use crate::session::{Action, ActionError, CreateError};
use derive_more::{Display, Error, From};
use duel_games::GameKind;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument};

const COMMAND_BUFFER: usize = 64;

/// Failure of a request sent through a [`SupervisorHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum SupervisorError {
    /// The supervisor task has stopped.
    #[display("Supervisor is not running")]
    #[from(ignore)]
    Closed,
    /// Session creation was refused.
    #[display("{}", _0)]
    Create(CreateError),
    /// The action was refused.
    #[display("{}", _0)]
    Action(ActionError),
}

enum Command {
    Create {
        kind: GameKind,
        creator: PlayerId,
        mode: Mode,
        reply: oneshot::Sender<Result<SessionId, CreateError>>,
    },
    Submit {
        id: SessionId,
        actor: PlayerId,
        action: Action,
        reply: oneshot::Sender<Result<ActionReport, ActionError>>,
    },
    Snapshot {
        id: SessionId,
        reply: oneshot::Sender<Result<SessionSnapshot, ActionError>>,
    },
    Shutdown,
}

/// Cloneable handle to a running supervisor.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<Command>,
}

/// Spawns the supervisor task for `registry`.
///
/// The join handle yields the registry back after [`SupervisorHandle::shutdown`]
/// or once every handle is dropped.
pub fn spawn(registry: SessionRegistry) -> (SupervisorHandle, JoinHandle<SessionRegistry>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(registry, rx));
    (SupervisorHandle { tx }, task)
}

async fn run(mut registry: SessionRegistry, mut rx: mpsc::Receiver<Command>) -> SessionRegistry {
    info!("Supervisor started");
    loop {
        let deadline = registry.next_deadline().map(|(at, _, _)| at);
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Shutdown) | None => break,
                Some(command) => handle(&mut registry, command),
            },
            _ = sleep_or_forever(deadline) => {
                let fired = registry.expire_due(Instant::now());
                debug!(count = fired.len(), "Deadlines fired");
            }
        }
    }
    info!(live = registry.len(), "Supervisor stopped");
    registry
}

async fn sleep_or_forever(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn handle(registry: &mut SessionRegistry, command: Command) {
    let now = Instant::now();
    // A dropped reply receiver means the caller stopped waiting.
    match command {
        Command::Create {
            kind,
            creator,
            mode,
            reply,
        } => {
            let _ = reply.send(registry.create(kind, creator, mode, now));
        }
        Command::Submit {
            id,
            actor,
            action,
            reply,
        } => {
            let _ = reply.send(registry.submit(id, &actor, action, now));
        }
        Command::Snapshot { id, reply } => {
            let _ = reply.send(registry.snapshot(id));
        }
        Command::Shutdown => {}
    }
}

impl SupervisorHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SupervisorError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| SupervisorError::Closed)?;
        rx.await.map_err(|_| SupervisorError::Closed)
    }

    /// Opens a session.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        kind: GameKind,
        creator: PlayerId,
        mode: Mode,
    ) -> Result<SessionId, SupervisorError> {
        let result = self
            .request(|reply| Command::Create {
                kind,
                creator,
                mode,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Submits an action.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        id: SessionId,
        actor: PlayerId,
        action: Action,
    ) -> Result<ActionReport, SupervisorError> {
        let result = self
            .request(|reply| Command::Submit {
                id,
                actor,
                action,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Fetches a snapshot of one session.
    pub async fn snapshot(&self, id: SessionId) -> Result<SessionSnapshot, SupervisorError> {
        let result = self.request(|reply| Command::Snapshot { id, reply }).await?;
        Ok(result?)
    }

    /// Asks the supervisor to stop.
    pub async fn shutdown(&self) -> Result<(), SupervisorError> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| SupervisorError::Closed)
    }
}
