//! Async driver for the [`Arbiter`].
//!
//! One task owns the arbiter and handles commands and transitions strictly in
//! arrival order. Permission requests and cooldown timers run as separate
//! tasks that each post exactly one [`Transition`] back when they finish.
//! Neither is ever cancelled; if the arbiter is gone by then, the transition
//! is discarded.

use shakeball_detect::{request_motion_permission, MotionPlatformRef};
use shakeball_input::{InputEvent, ListenerRegistry};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::arbiter::{Arbiter, Effect, Snapshot, Transition};
use crate::error::ArbiterError;

enum Command {
    Input(InputEvent),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to a running arbiter task.
pub struct ArbiterHandle {
    commands: mpsc::UnboundedSender<Command>,
    registry: ListenerRegistry,
    snapshot: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl ArbiterHandle {
    /// Start the arbiter and spawn its task on the current runtime.
    ///
    /// Listeners are attached before this returns, so events dispatched
    /// right away are not lost.
    pub fn spawn(mut arbiter: Arbiter) -> Self {
        let effects = arbiter.start();
        let registry = arbiter.registry().clone();
        let (snapshot_tx, snapshot) = watch::channel(arbiter.snapshot());
        let (commands, commands_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(arbiter, effects, commands_rx, snapshot_tx));

        Self {
            commands,
            registry,
            snapshot,
            task,
        }
    }

    /// Forward a raw input event.
    ///
    /// Returns `Ok(false)` if nothing is listening for this kind of event;
    /// such events are dropped here.
    pub fn dispatch(&self, event: InputEvent) -> Result<bool, ArbiterError> {
        if !self.registry.accepts(&event) {
            tracing::trace!(event = event.label(), "no listener attached, dropping event");
            return Ok(false);
        }
        self.commands
            .send(Command::Input(event))
            .map_err(|_| ArbiterError::Closed)?;
        Ok(true)
    }

    /// Wait until every event dispatched so far has been handled.
    pub async fn flush(&self) -> Result<(), ArbiterError> {
        let (done, wait) = oneshot::channel();
        self.commands
            .send(Command::Flush(done))
            .map_err(|_| ArbiterError::Closed)?;
        wait.await.map_err(|_| ArbiterError::Closed)
    }

    /// Current presentation state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.clone()
    }

    /// Registry deciding which events [`ArbiterHandle::dispatch`] forwards.
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Stop the arbiter and release its listeners.
    pub async fn shutdown(self) -> Result<(), ArbiterError> {
        // The task may already be gone; joining reports why.
        let _ = self.commands.send(Command::Shutdown);
        self.task
            .await
            .map_err(|e| ArbiterError::TaskFailed(e.to_string()))
    }
}

async fn run(
    mut arbiter: Arbiter,
    initial: Vec<Effect>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshot: watch::Sender<Snapshot>,
) {
    let platform = arbiter.platform();
    let (transitions_tx, mut transitions) = mpsc::unbounded_channel();
    execute(initial, &platform, &transitions_tx);

    tracing::debug!(?arbiter, "arbiter running");

    loop {
        let effects = tokio::select! {
            biased;
            Some(transition) = transitions.recv() => {
                tracing::debug!(?transition, "transition");
                arbiter.handle_transition(transition)
            }
            command = commands.recv() => match command {
                Some(Command::Input(event)) => arbiter.handle_input(event),
                Some(Command::Flush(done)) => {
                    let _ = done.send(());
                    continue;
                }
                Some(Command::Shutdown) | None => break,
            },
        };

        execute(effects, &platform, &transitions_tx);
        snapshot.send_if_modified(|current| {
            let next = arbiter.snapshot();
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    arbiter.teardown();
    snapshot.send_replace(arbiter.snapshot());
}

fn execute(
    effects: Vec<Effect>,
    platform: &MotionPlatformRef,
    transitions: &mpsc::UnboundedSender<Transition>,
) {
    for effect in effects {
        let transitions = transitions.clone();
        match effect {
            Effect::RequestPermission => {
                let platform = Arc::clone(platform);
                tokio::spawn(async move {
                    // Run the request in its own task so a panic in the
                    // platform code still resolves to a denial.
                    let request = tokio::spawn(async move {
                        request_motion_permission(platform.as_ref()).await
                    });
                    let transition = match request.await {
                        Ok(Ok(())) => Transition::PermissionGranted,
                        Ok(Err(e)) => Transition::PermissionDenied {
                            reason: e.to_string(),
                        },
                        Err(e) => Transition::PermissionDenied {
                            reason: format!("permission request aborted: {}", e),
                        },
                    };
                    let _ = transitions.send(transition);
                });
            }
            Effect::StartCooldown(duration) => {
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    let _ = transitions.send(Transition::CooldownElapsed);
                });
            }
        }
    }
}
