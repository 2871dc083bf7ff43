//! Lobby actor: a Tokio task that owns a [`LobbyController`].
//!
//! Snapshots, connection changes, chat lines and intents may come from
//! different tasks. They all go through one bounded channel and are
//! applied in arrival order, one at a time. Views are published on a
//! `watch` channel after every event that may have changed them.

use skirmish_command::CommandSink;
use skirmish_model::{LocalIdentity, SessionSnapshot};
use skirmish_policy::LobbyView;
use tokio::sync::{mpsc, oneshot, watch};

use crate::{
    ChatLine, ConnectionState, Intent, LobbyController, LobbyError, MapRepository,
    SettingsStore, SyncState,
};

/// Events delivered to the lobby actor.
enum LobbyEvent {
    Snapshot {
        snapshot: SessionSnapshot,
        identity: LocalIdentity,
    },
    Connection(ConnectionState),
    Chat(ChatLine),
    Intent {
        intent: Intent,
        reply: oneshot::Sender<Result<(), LobbyError>>,
    },
    View {
        reply: oneshot::Sender<Option<LobbyView>>,
    },
    State {
        reply: oneshot::Sender<SyncState>,
    },
    Close,
}

/// Handle to a running lobby actor.
///
/// Cheap to clone. Once [`close`](Self::close) has been processed, every
/// call on every clone fails with [`LobbyError::Unavailable`].
#[derive(Clone)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyEvent>,
    views: watch::Receiver<Option<LobbyView>>,
}

impl LobbyHandle {
    async fn send(&self, event: LobbyEvent) -> Result<(), LobbyError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| LobbyError::Unavailable)
    }

    /// Queues a snapshot from the transport. Waits only when the queue is
    /// full.
    pub async fn push_snapshot(
        &self,
        snapshot: SessionSnapshot,
        identity: LocalIdentity,
    ) -> Result<(), LobbyError> {
        self.send(LobbyEvent::Snapshot { snapshot, identity }).await
    }

    pub async fn connection_changed(&self, state: ConnectionState) -> Result<(), LobbyError> {
        self.send(LobbyEvent::Connection(state)).await
    }

    pub async fn push_chat(&self, line: ChatLine) -> Result<(), LobbyError> {
        self.send(LobbyEvent::Chat(line)).await
    }

    /// Issues an intent and waits for the local verdict. The server's
    /// answer arrives later as a snapshot.
    pub async fn issue(&self, intent: Intent) -> Result<(), LobbyError> {
        let (reply, rx) = oneshot::channel();
        self.send(LobbyEvent::Intent { intent, reply }).await?;
        rx.await.map_err(|_| LobbyError::Unavailable)?
    }

    /// The view after every event queued before this call.
    pub async fn view(&self) -> Result<Option<LobbyView>, LobbyError> {
        let (reply, rx) = oneshot::channel();
        self.send(LobbyEvent::View { reply }).await?;
        rx.await.map_err(|_| LobbyError::Unavailable)
    }

    pub async fn sync_state(&self) -> Result<SyncState, LobbyError> {
        let (reply, rx) = oneshot::channel();
        self.send(LobbyEvent::State { reply }).await?;
        rx.await.map_err(|_| LobbyError::Unavailable)
    }

    /// A receiver that sees every published view.
    pub fn subscribe(&self) -> watch::Receiver<Option<LobbyView>> {
        self.views.clone()
    }

    /// Tears the lobby down. Events queued behind this one are dropped
    /// and their callers get [`LobbyError::Unavailable`].
    pub async fn close(&self) -> Result<(), LobbyError> {
        self.send(LobbyEvent::Close).await
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

struct LobbyActor<M: MapRepository, S: CommandSink, T: SettingsStore> {
    controller: LobbyController<M, S, T>,
    receiver: mpsc::Receiver<LobbyEvent>,
    views: watch::Sender<Option<LobbyView>>,
}

impl<M: MapRepository, S: CommandSink, T: SettingsStore> LobbyActor<M, S, T> {
    async fn run(mut self) {
        tracing::info!("lobby actor started");

        while let Some(event) = self.receiver.recv().await {
            match event {
                LobbyEvent::Snapshot { snapshot, identity } => {
                    // Failures are logged by the reconciler; the last good
                    // view stays published.
                    if self.controller.apply_snapshot(snapshot, identity).is_ok() {
                        self.publish();
                    }
                }
                LobbyEvent::Connection(state) => {
                    self.controller.on_connection_state(state);
                }
                LobbyEvent::Chat(line) => self.controller.on_chat_line(line),
                LobbyEvent::Intent { intent, reply } => {
                    let result = self.controller.issue(intent);
                    if result.is_ok() {
                        self.publish();
                    }
                    let _ = reply.send(result);
                }
                LobbyEvent::View { reply } => {
                    let _ = reply.send(self.controller.view().cloned());
                }
                LobbyEvent::State { reply } => {
                    let _ = reply.send(self.controller.reconciler().state());
                }
                LobbyEvent::Close => {
                    tracing::info!("lobby closing");
                    break;
                }
            }
        }

        self.receiver.close();
        tracing::info!("lobby actor stopped");
    }

    fn publish(&self) {
        let view = self.controller.view().cloned();
        self.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

/// Spawns `controller` as a lobby actor and returns a handle to it.
///
/// The queue holds `channel_size` events from the controller's config;
/// producers wait when it is full.
pub fn spawn_lobby<M, S, T>(controller: LobbyController<M, S, T>) -> LobbyHandle
where
    M: MapRepository,
    S: CommandSink,
    T: SettingsStore,
{
    let (tx, rx) = mpsc::channel(controller.config().channel_size.max(1));
    let (views_tx, views_rx) = watch::channel(controller.view().cloned());

    let actor = LobbyActor {
        controller,
        receiver: rx,
        views: views_tx,
    };
    tokio::spawn(actor.run());

    LobbyHandle {
        sender: tx,
        views: views_rx,
    }
}
