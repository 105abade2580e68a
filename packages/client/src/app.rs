//! Client application state.
//!
//! `ClientApp` owns every piece of client state and is driven by one event
//! loop: server events, terminal commands and signal expiries each go through
//! one method that returns what to send and what to show.

use std::sync::Arc;

use cursors_server::{
    domain::LOCAL_CLIENT_ID,
    infrastructure::dto::websocket::{
        ChatMessagePayload, ClientEvent, ContextualPingPayload, FocusBlurPayload, GestureKind,
        GesturePayload, PingPayload, ServerEvent,
    },
};
use cursors_shared::time::Clock;
use tokio::sync::mpsc;

use crate::{
    command::Command,
    domain::{
        ClientBounds, ClientStateStore, DisplayPosition, EphemeralSignalManager, Expiry,
        GestureRecognizer, LocalClientState, SignalKind, SignalOwner, SignalPayload, reconcile,
    },
};

/// Something the terminal should show.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Initialized {
        id: String,
        name: String,
        color: String,
        others: usize,
    },
    Joined {
        id: String,
        name: String,
    },
    Left {
        id: String,
        name: Option<String>,
    },
    Chat {
        from: String,
        msg: String,
    },
    Ping {
        from: String,
        index: u8,
    },
    ContextualPing {
        from: String,
        kind: String,
    },
    Gesture {
        from: String,
        gestures: Vec<GestureKind>,
    },
    CursorMoved {
        name: String,
        position: DisplayPosition,
    },
    FocusChanged {
        name: String,
        active: bool,
    },
    Expired {
        from: String,
        kind: SignalKind,
    },
    MenuChanged(bool),
    Roster(Vec<RosterEntry>),
    /// A local move was not transmitted.
    MoveSuppressed {
        menu_open: bool,
    },
    Scrolled(f64),
}

/// One line of the `/who` listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub color: String,
    pub position: DisplayPosition,
    pub cursor_visible: bool,
}

/// Result of handling a terminal command.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub outbound: Vec<ClientEvent>,
    pub notices: Vec<Notice>,
}

impl Outcome {
    fn send(event: ClientEvent) -> Self {
        Self {
            outbound: vec![event],
            notices: Vec::new(),
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            outbound: Vec::new(),
            notices: vec![notice],
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }
}

pub struct ClientApp {
    local: LocalClientState,
    store: ClientStateStore,
    signals: EphemeralSignalManager,
    gestures: GestureRecognizer,
    clock: Arc<dyn Clock>,
}

impl ClientApp {
    /// Build the app and the receiver its signal timers post expiries to.
    pub fn new(bounds: ClientBounds, clock: Arc<dyn Clock>) -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (signals, expiry_rx) = EphemeralSignalManager::new();
        let app = Self {
            local: LocalClientState::new(bounds),
            store: ClientStateStore::new(),
            signals,
            gestures: GestureRecognizer::new(),
            clock,
        };
        (app, expiry_rx)
    }

    pub fn local(&self) -> &LocalClientState {
        &self.local
    }

    pub fn store(&self) -> &ClientStateStore {
        &self.store
    }

    pub fn signals(&self) -> &EphemeralSignalManager {
        &self.signals
    }

    fn owner_for(id: &str) -> SignalOwner {
        if id == LOCAL_CLIENT_ID {
            SignalOwner::Local
        } else {
            SignalOwner::Remote(id.to_string())
        }
    }

    fn display_name(&self, owner: &SignalOwner) -> String {
        match owner {
            SignalOwner::Local => "you".to_string(),
            SignalOwner::Remote(id) => self
                .store
                .view(id)
                .map_or_else(|| id.clone(), |view| view.name.clone()),
        }
    }

    /// Signals from departed clients are dropped; unknown ids are accepted.
    fn accepts_signal_from(&self, owner: &SignalOwner) -> bool {
        match owner {
            SignalOwner::Local => true,
            SignalOwner::Remote(id) => !self.store.is_absent(id),
        }
    }

    pub fn apply_server_event(&mut self, event: ServerEvent) -> Vec<Notice> {
        match event {
            ServerEvent::InitializeLocalClient(init) => {
                // A reconnect starts over with a fresh roster.
                self.signals.clear();
                self.gestures.reset();
                self.store.initialize(&init.id, init.clients);
                self.local.id = Some(init.id.clone());
                self.local.name = Some(init.name.clone());
                self.local.color = Some(init.color.clone());
                tracing::info!("Initialized as {} ({})", init.name, init.id);

                vec![Notice::Initialized {
                    id: init.id,
                    name: init.name,
                    color: init.color,
                    others: self.store.present_count(),
                }]
            }
            ServerEvent::ClientJoined(identity) => {
                let notice = Notice::Joined {
                    id: identity.id.clone(),
                    name: identity.name.clone(),
                };
                self.store.client_joined(identity);
                vec![notice]
            }
            ServerEvent::ClientLeft(id) => {
                let previous = self.store.client_left(&id);
                self.signals.remove_owner(&SignalOwner::Remote(id.clone()));
                vec![Notice::Left {
                    id,
                    name: previous.map(|view| view.name),
                }]
            }
            ServerEvent::CursorMove(update) => {
                if !self.store.apply_cursor_move(&update, &self.local.bounds) {
                    tracing::debug!("Dropped cursor move for departed client {}", update.id);
                    return Vec::new();
                }
                self.store
                    .view(&update.id)
                    .map(|view| Notice::CursorMoved {
                        name: view.name.clone(),
                        position: reconcile(view, &self.local.bounds),
                    })
                    .into_iter()
                    .collect()
            }
            ServerEvent::FocusBlur(relayed) => {
                if !self.store.apply_focus_blur(&relayed.id, relayed.payload.active) {
                    return Vec::new();
                }
                vec![Notice::FocusChanged {
                    name: self.display_name(&SignalOwner::Remote(relayed.id)),
                    active: relayed.payload.active,
                }]
            }
            ServerEvent::ChatMessage(relayed) => {
                if !self.store.apply_chat(&relayed.id, &relayed.payload.msg) {
                    return Vec::new();
                }
                let owner = SignalOwner::Remote(relayed.id);
                self.signals.show(
                    owner.clone(),
                    SignalKind::Chat,
                    SignalPayload::Chat(relayed.payload.msg.clone()),
                );
                vec![Notice::Chat {
                    from: self.display_name(&owner),
                    msg: relayed.payload.msg,
                }]
            }
            ServerEvent::Ping(relayed) => {
                let owner = Self::owner_for(&relayed.id);
                if !self.accepts_signal_from(&owner) {
                    return Vec::new();
                }
                let index = relayed.payload.index;
                self.signals
                    .show(owner.clone(), SignalKind::Ping, SignalPayload::Ping(index));
                vec![Notice::Ping {
                    from: self.display_name(&owner),
                    index,
                }]
            }
            ServerEvent::ContextualPing(relayed) => {
                let owner = Self::owner_for(&relayed.id);
                if !self.accepts_signal_from(&owner) {
                    return Vec::new();
                }
                let kind = relayed.payload.kind;
                self.signals.show(
                    owner.clone(),
                    SignalKind::ContextualPing,
                    SignalPayload::ContextualPing(kind.clone()),
                );
                vec![Notice::ContextualPing {
                    from: self.display_name(&owner),
                    kind,
                }]
            }
            ServerEvent::Gesture(relayed) => {
                let owner = Self::owner_for(&relayed.id);
                let gesture = relayed.payload.gesture;
                let accepted = match &owner {
                    SignalOwner::Local => true,
                    SignalOwner::Remote(id) => self.store.apply_gesture(id, gesture),
                };
                if !accepted {
                    return Vec::new();
                }
                let signal = self.signals.show(
                    owner.clone(),
                    SignalKind::Gesture,
                    SignalPayload::Gestures(vec![gesture]),
                );
                let gestures = match signal.payload {
                    SignalPayload::Gestures(batch) => batch,
                    _ => vec![gesture],
                };
                vec![Notice::Gesture {
                    from: self.display_name(&owner),
                    gestures,
                }]
            }
        }
    }

    pub fn handle_command(&mut self, command: Command) -> Outcome {
        let now = self.clock.now_millis();

        match command {
            Command::Chat(msg) => {
                if msg.is_empty() {
                    return Outcome::default();
                }
                self.signals.show(
                    SignalOwner::Local,
                    SignalKind::ChatEcho,
                    SignalPayload::Chat(msg.clone()),
                );
                Outcome::send(ClientEvent::ChatMessage(ChatMessagePayload { msg: msg.clone() }))
                    .with_notice(Notice::Chat {
                        from: self.display_name(&SignalOwner::Local),
                        msg,
                    })
            }
            Command::Move { x, y } => match self.local.try_move(x, y, now) {
                Some(payload) => Outcome::send(ClientEvent::CursorMove(payload)),
                None => Outcome::notice(Notice::MoveSuppressed {
                    menu_open: self.local.prevent_update,
                }),
            },
            Command::Down { button, ctrl } => {
                if self.local.pointer_down(button, ctrl) {
                    Outcome::notice(Notice::MenuChanged(true))
                } else {
                    Outcome::default()
                }
            }
            Command::Up => {
                let was_open = self.local.prevent_update;
                self.local.pointer_up();
                if was_open {
                    Outcome::notice(Notice::MenuChanged(false))
                } else {
                    Outcome::default()
                }
            }
            Command::Zone(zone) => {
                match self.gestures.enter_zone(zone, now, self.local.pointer.down) {
                    // Shown when the server echoes it back.
                    Some(gesture) => Outcome::send(ClientEvent::Gesture(GesturePayload { gesture })),
                    None => Outcome::default(),
                }
            }
            Command::Ping(index) => Outcome::send(ClientEvent::Ping(PingPayload {
                index,
                x: self.local.x,
                y: self.local.y,
            })),
            Command::Context(kind) => {
                self.signals.show(
                    SignalOwner::Local,
                    SignalKind::ContextualPing,
                    SignalPayload::ContextualPing(kind.clone()),
                );
                Outcome::send(ClientEvent::ContextualPing(ContextualPingPayload {
                    kind: kind.clone(),
                }))
                .with_notice(Notice::ContextualPing {
                    from: self.display_name(&SignalOwner::Local),
                    kind,
                })
            }
            Command::Focus => Outcome::send(ClientEvent::FocusBlur(FocusBlurPayload { active: true })),
            Command::Blur => Outcome::send(ClientEvent::FocusBlur(FocusBlurPayload { active: false })),
            Command::Menu(open) => {
                self.local.set_menu_open(open);
                Outcome::notice(Notice::MenuChanged(open))
            }
            Command::Scroll(offset) => {
                self.local.set_scroll_offset(offset);
                Outcome::notice(Notice::Scrolled(offset))
            }
            Command::Who => Outcome::notice(Notice::Roster(self.roster())),
        }
    }

    pub fn apply_expiry(&mut self, expiry: &Expiry) -> Option<Notice> {
        let signal = self.signals.expire(expiry)?;
        Some(Notice::Expired {
            from: self.display_name(&signal.owner),
            kind: signal.kind,
        })
    }

    fn roster(&self) -> Vec<RosterEntry> {
        self.store
            .present()
            .map(|(id, view)| RosterEntry {
                id: id.to_string(),
                name: view.name.clone(),
                color: view.color.clone(),
                position: reconcile(view, &self.local.bounds),
                cursor_visible: view.cursor_visible,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cursors_server::infrastructure::dto::websocket::{
        CursorMoveBroadcast, CursorMovePayload, IdentityDto, InitializeLocalClientPayload,
        Relayed,
    };
    use cursors_shared::time::ManualClock;

    use super::*;
    use crate::domain::{Presence, TriggerZone};

    fn identity(id: &str, name: &str) -> IdentityDto {
        IdentityDto {
            id: id.to_string(),
            name: name.to_string(),
            color: "#ff0000".to_string(),
        }
    }

    fn app_with_clock() -> (ClientApp, mpsc::UnboundedReceiver<Expiry>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let (app, rx) = ClientApp::new(ClientBounds::new(1280.0, 800.0), clock.clone());
        (app, rx, clock)
    }

    fn initialize(app: &mut ClientApp, roster: Vec<IdentityDto>) -> Vec<Notice> {
        app.apply_server_event(ServerEvent::InitializeLocalClient(
            InitializeLocalClientPayload {
                id: "me".to_string(),
                name: "Quiet Otter".to_string(),
                color: "#00ff00".to_string(),
                clients: roster,
            },
        ))
    }

    fn cursor_move(id: &str, x: f64, y: f64) -> ServerEvent {
        ServerEvent::CursorMove(CursorMoveBroadcast {
            id: id.to_string(),
            name: "Bold Fox".to_string(),
            payload: CursorMovePayload {
                x,
                y,
                pointer: Default::default(),
                client_bounds: Some(ClientBounds::new(1280.0, 800.0).into()),
            },
        })
    }

    #[tokio::test]
    async fn test_initialize_sets_local_identity_and_roster() {
        // テスト項目: initialize_local_client で自分の ID とロスターが設定される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();

        // when (操作):
        let notices = initialize(&mut app, vec![identity("a", "Bold Fox"), identity("b", "Calm Owl")]);

        // then (期待する結果):
        assert_eq!(app.local().id.as_deref(), Some("me"));
        assert_eq!(app.store().present_count(), 2);
        assert_eq!(
            notices,
            vec![Notice::Initialized {
                id: "me".to_string(),
                name: "Quiet Otter".to_string(),
                color: "#00ff00".to_string(),
                others: 2,
            }]
        );
    }

    #[tokio::test]
    async fn test_cursor_move_updates_store() {
        // テスト項目: cursor_move を受信するとストアの座標が更新される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();
        initialize(&mut app, vec![identity("a", "Bold Fox")]);

        // when (操作):
        let notices = app.apply_server_event(cursor_move("a", 10.0, 20.0));

        // then (期待する結果):
        let view = app.store().view("a").unwrap();
        assert_eq!((view.x, view.y), (10.0, 20.0));
        assert!(matches!(notices.as_slice(), [Notice::CursorMoved { name, .. }] if name == "Bold Fox"));
    }

    #[tokio::test]
    async fn test_left_client_is_absent_and_late_updates_dropped() {
        // テスト項目: 退出したクライアントは absent になり、遅れて届いた更新は無視される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();
        initialize(&mut app, vec![identity("a", "Bold Fox")]);
        app.apply_server_event(ServerEvent::ChatMessage(Relayed {
            id: "a".to_string(),
            payload: ChatMessagePayload {
                msg: "hi".to_string(),
            },
        }));

        // when (操作):
        let left = app.apply_server_event(ServerEvent::ClientLeft("a".to_string()));
        let late = app.apply_server_event(cursor_move("a", 1.0, 1.0));

        // then (期待する結果):
        assert_eq!(
            left,
            vec![Notice::Left {
                id: "a".to_string(),
                name: Some("Bold Fox".to_string()),
            }]
        );
        assert!(late.is_empty());
        assert_eq!(app.store().get("a"), Some(&Presence::Absent));
        assert_eq!(app.signals().visible_count(), 0);
    }

    #[tokio::test]
    async fn test_local_client_echo_maps_to_local_owner() {
        // テスト項目: LOCAL_CLIENT 宛ての ping は自分のシグナルとして表示される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();
        initialize(&mut app, vec![]);

        // when (操作):
        let notices = app.apply_server_event(ServerEvent::Ping(Relayed {
            id: LOCAL_CLIENT_ID.to_string(),
            payload: PingPayload {
                index: 1,
                x: 0.0,
                y: 0.0,
            },
        }));

        // then (期待する結果):
        assert_eq!(
            notices,
            vec![Notice::Ping {
                from: "you".to_string(),
                index: 1,
            }]
        );
        assert!(app.signals().is_visible(&SignalOwner::Local, SignalKind::Ping));
        assert_eq!(app.store().present_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_gestures_accumulate() {
        // テスト項目: 同じクライアントのジェスチャーは期限内なら累積される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();
        initialize(&mut app, vec![identity("a", "Bold Fox")]);
        let gesture = |g| {
            ServerEvent::Gesture(Relayed {
                id: "a".to_string(),
                payload: GesturePayload { gesture: g },
            })
        };

        // when (操作):
        app.apply_server_event(gesture(GestureKind::Circle));
        let notices = app.apply_server_event(gesture(GestureKind::Vertical));

        // then (期待する結果):
        assert_eq!(
            notices,
            vec![Notice::Gesture {
                from: "Bold Fox".to_string(),
                gestures: vec![GestureKind::Circle, GestureKind::Vertical],
            }]
        );
        assert_eq!(
            app.store().view("a").unwrap().last_gesture_token,
            Some(GestureKind::Vertical)
        );
    }

    #[tokio::test]
    async fn test_move_commands_are_throttled() {
        // テスト項目: 25ms 以内の連続移動は送信されない
        // given (前提条件):
        let (mut app, _rx, clock) = app_with_clock();

        // when (操作):
        let first = app.handle_command(Command::Move { x: 1.0, y: 2.0 });
        clock.advance(10);
        let second = app.handle_command(Command::Move { x: 3.0, y: 4.0 });
        clock.advance(20);
        let third = app.handle_command(Command::Move { x: 5.0, y: 6.0 });

        // then (期待する結果):
        assert_eq!(first.outbound.len(), 1);
        assert!(second.outbound.is_empty());
        assert_eq!(second.notices, vec![Notice::MoveSuppressed { menu_open: false }]);
        assert_eq!(third.outbound.len(), 1);
        assert_eq!((app.local().x, app.local().y), (5.0, 6.0));
    }

    #[tokio::test]
    async fn test_menu_blocks_moves_until_pointer_up() {
        // テスト項目: 中ボタンでメニューが開いている間は移動が送信されない
        // given (前提条件):
        let (mut app, _rx, clock) = app_with_clock();

        // when (操作):
        let down = app.handle_command(Command::Down {
            button: 1,
            ctrl: false,
        });
        let blocked = app.handle_command(Command::Move { x: 1.0, y: 1.0 });
        let up = app.handle_command(Command::Up);
        clock.advance(100);
        let sent = app.handle_command(Command::Move { x: 1.0, y: 1.0 });

        // then (期待する結果):
        assert_eq!(down.notices, vec![Notice::MenuChanged(true)]);
        assert_eq!(blocked.notices, vec![Notice::MoveSuppressed { menu_open: true }]);
        assert_eq!(up.notices, vec![Notice::MenuChanged(false)]);
        assert_eq!(sent.outbound.len(), 1);
    }

    #[tokio::test]
    async fn test_zone_sequence_sends_circle_once() {
        // テスト項目: 上右下左を 2 周すると circle が 1 回だけ送信される
        // given (前提条件):
        let (mut app, _rx, clock) = app_with_clock();
        let zones = [
            TriggerZone::Top,
            TriggerZone::Right,
            TriggerZone::Bottom,
            TriggerZone::Left,
        ];

        // when (操作):
        let mut outbound = Vec::new();
        for zone in zones.iter().chain(zones.iter()) {
            clock.advance(50);
            outbound.extend(app.handle_command(Command::Zone(*zone)).outbound);
        }

        // then (期待する結果):
        assert_eq!(
            outbound,
            vec![ClientEvent::Gesture(GesturePayload {
                gesture: GestureKind::Circle
            })]
        );
    }

    #[tokio::test]
    async fn test_chat_command_sends_and_echoes() {
        // テスト項目: チャット送信でイベントが作られ、自分の吹き出しが表示される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();

        // when (操作):
        let outcome = app.handle_command(Command::Chat("hello".to_string()));

        // then (期待する結果):
        assert_eq!(
            outcome.outbound,
            vec![ClientEvent::ChatMessage(ChatMessagePayload {
                msg: "hello".to_string()
            })]
        );
        assert!(app.signals().is_visible(&SignalOwner::Local, SignalKind::ChatEcho));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_hides_chat_bubble() {
        // テスト項目: TTL 経過後に期限切れ通知が届き、吹き出しが消える
        // given (前提条件):
        let (mut app, mut rx, _clock) = app_with_clock();
        initialize(&mut app, vec![identity("a", "Bold Fox")]);
        app.apply_server_event(ServerEvent::ChatMessage(Relayed {
            id: "a".to_string(),
            payload: ChatMessagePayload {
                msg: "hi".to_string(),
            },
        }));

        // when (操作):
        tokio::time::sleep(Duration::from_millis(3001)).await;
        let expiry = rx.recv().await.unwrap();
        let notice = app.apply_expiry(&expiry);

        // then (期待する結果):
        assert_eq!(
            notice,
            Some(Notice::Expired {
                from: "Bold Fox".to_string(),
                kind: SignalKind::Chat,
            })
        );
        assert!(!app.signals().is_visible(&SignalOwner::Remote("a".to_string()), SignalKind::Chat));
    }

    #[tokio::test]
    async fn test_who_lists_present_clients() {
        // テスト項目: /who で接続中のクライアントが一覧される
        // given (前提条件):
        let (mut app, _rx, _clock) = app_with_clock();
        initialize(&mut app, vec![identity("a", "Bold Fox"), identity("b", "Calm Owl")]);
        app.apply_server_event(ServerEvent::ClientLeft("b".to_string()));

        // when (操作):
        let outcome = app.handle_command(Command::Who);

        // then (期待する結果):
        match outcome.notices.as_slice() {
            [Notice::Roster(entries)] => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].name, "Bold Fox");
            }
            other => panic!("unexpected notices: {other:?}"),
        }
    }
}
