//! Self-expiring indicators: chat bubbles, pings, contextual pings and
//! gesture tokens.
//!
//! Each (owner, kind) pair is a slot that is either idle or visible. Showing a
//! signal arms a tokio timer that posts an [`Expiry`] back over an mpsc channel
//! once the kind's TTL has elapsed; the owning loop feeds that expiry to
//! [`EphemeralSignalManager::expire`]. Re-showing restarts the timer, and every
//! arm bumps a generation counter so an expiry that raced an abort is ignored.

use std::{collections::HashMap, time::Duration};

use cursors_server::infrastructure::dto::websocket::GestureKind;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep},
};

pub const CHAT_TTL: Duration = Duration::from_millis(3000);
pub const PING_TTL: Duration = Duration::from_millis(1500);
pub const CONTEXTUAL_PING_TTL: Duration = Duration::from_millis(5000);
pub const GESTURE_TTL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SignalOwner {
    Local,
    Remote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// Inbound chat bubble.
    Chat,
    /// The local client's own message, shown after sending.
    ChatEcho,
    Ping,
    ContextualPing,
    Gesture,
}

impl SignalKind {
    pub fn ttl(self) -> Duration {
        match self {
            SignalKind::Chat | SignalKind::ChatEcho => CHAT_TTL,
            SignalKind::Ping => PING_TTL,
            SignalKind::ContextualPing => CONTEXTUAL_PING_TTL,
            SignalKind::Gesture => GESTURE_TTL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalPayload {
    Chat(String),
    Ping(u8),
    ContextualPing(String),
    /// Every gesture token shown in the current batch.
    Gestures(Vec<GestureKind>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EphemeralSignal {
    pub owner: SignalOwner,
    pub kind: SignalKind,
    pub payload: SignalPayload,
    pub created_at: Instant,
}

/// Posted by a slot timer when its TTL elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry {
    pub owner: SignalOwner,
    pub kind: SignalKind,
    pub generation: u64,
}

#[derive(Debug)]
enum Slot {
    Idle,
    Visible {
        signal: EphemeralSignal,
        generation: u64,
        timer: JoinHandle<()>,
    },
}

#[derive(Debug)]
pub struct EphemeralSignalManager {
    slots: HashMap<(SignalOwner, SignalKind), Slot>,
    next_generation: u64,
    expiry_tx: mpsc::UnboundedSender<Expiry>,
}

impl EphemeralSignalManager {
    /// Create a manager and the receiver its timers post expiries to.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Expiry>) {
        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let manager = Self {
            slots: HashMap::new(),
            next_generation: 0,
            expiry_tx,
        };
        (manager, expiry_rx)
    }

    /// Make a signal visible, restarting its timer.
    ///
    /// Gesture tokens accumulate into the visible batch; every other kind
    /// replaces the previous payload.
    pub fn show(
        &mut self,
        owner: SignalOwner,
        kind: SignalKind,
        payload: SignalPayload,
    ) -> EphemeralSignal {
        let key = (owner.clone(), kind);
        let previous = self.slots.remove(&key).unwrap_or(Slot::Idle);

        let payload = match (previous, payload) {
            (
                Slot::Visible {
                    signal:
                        EphemeralSignal {
                            payload: SignalPayload::Gestures(mut batch),
                            ..
                        },
                    timer,
                    ..
                },
                SignalPayload::Gestures(tokens),
            ) => {
                timer.abort();
                batch.extend(tokens);
                SignalPayload::Gestures(batch)
            }
            (Slot::Visible { timer, .. }, payload) => {
                timer.abort();
                payload
            }
            (Slot::Idle, payload) => payload,
        };

        let generation = self.next_generation;
        self.next_generation += 1;

        let expiry = Expiry {
            owner: owner.clone(),
            kind,
            generation,
        };
        let expiry_tx = self.expiry_tx.clone();
        let ttl = kind.ttl();
        let timer = tokio::spawn(async move {
            sleep(ttl).await;
            // The receiver is gone only when the owning loop has stopped.
            let _ = expiry_tx.send(expiry);
        });

        let signal = EphemeralSignal {
            owner,
            kind,
            payload,
            created_at: Instant::now(),
        };
        self.slots.insert(
            key,
            Slot::Visible {
                signal: signal.clone(),
                generation,
                timer,
            },
        );
        signal
    }

    /// Return the slot to idle if `expiry` belongs to its current timer.
    pub fn expire(&mut self, expiry: &Expiry) -> Option<EphemeralSignal> {
        let key = (expiry.owner.clone(), expiry.kind);
        match self.slots.get(&key) {
            Some(Slot::Visible { generation, .. }) if *generation == expiry.generation => {}
            _ => return None,
        }

        match self.slots.insert(key, Slot::Idle) {
            Some(Slot::Visible { signal, .. }) => Some(signal),
            _ => None,
        }
    }

    /// Cancel every pending timer of `owner`, e.g. when a remote client leaves.
    pub fn remove_owner(&mut self, owner: &SignalOwner) {
        self.slots.retain(|(slot_owner, _), slot| {
            if slot_owner != owner {
                return true;
            }
            if let Slot::Visible { timer, .. } = slot {
                timer.abort();
            }
            false
        });
    }

    /// Cancel everything, e.g. on reconnect.
    pub fn clear(&mut self) {
        for slot in self.slots.values() {
            if let Slot::Visible { timer, .. } = slot {
                timer.abort();
            }
        }
        self.slots.clear();
    }

    pub fn visible(&self, owner: &SignalOwner, kind: SignalKind) -> Option<&EphemeralSignal> {
        match self.slots.get(&(owner.clone(), kind)) {
            Some(Slot::Visible { signal, .. }) => Some(signal),
            _ => None,
        }
    }

    pub fn is_visible(&self, owner: &SignalOwner, kind: SignalKind) -> bool {
        self.visible(owner, kind).is_some()
    }

    pub fn visible_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Visible { .. }))
            .count()
    }
}

impl Drop for EphemeralSignalManager {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(id: &str) -> SignalOwner {
        SignalOwner::Remote(id.to_string())
    }

    fn chat(msg: &str) -> SignalPayload {
        SignalPayload::Chat(msg.to_string())
    }

    /// Wait for the next expiry, returning it with the elapsed (paused) time.
    async fn next_expiry(
        rx: &mut mpsc::UnboundedReceiver<Expiry>,
        since: Instant,
    ) -> (Expiry, Duration) {
        let expiry = rx.recv().await.unwrap();
        (expiry, since.elapsed())
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_kind_stays_visible_for_its_ttl() {
        // テスト項目: 各シグナルは TTL の間だけ表示される
        // given (前提条件):
        let (mut manager, mut rx) = EphemeralSignalManager::new();
        let cases = [
            (SignalKind::Chat, chat("hi"), CHAT_TTL),
            (SignalKind::ChatEcho, chat("hi"), CHAT_TTL),
            (SignalKind::Ping, SignalPayload::Ping(1), PING_TTL),
            (
                SignalKind::ContextualPing,
                SignalPayload::ContextualPing("TEXT_ERROR".to_string()),
                CONTEXTUAL_PING_TTL,
            ),
            (
                SignalKind::Gesture,
                SignalPayload::Gestures(vec![GestureKind::Circle]),
                GESTURE_TTL,
            ),
        ];

        for (kind, payload, ttl) in cases {
            // when (操作):
            let start = Instant::now();
            manager.show(remote("a"), kind, payload);
            let (expiry, elapsed) = next_expiry(&mut rx, start).await;

            // then (期待する結果):
            assert_eq!(expiry.kind, kind);
            assert!(elapsed >= ttl && elapsed < ttl + Duration::from_millis(5));
            assert!(manager.is_visible(&remote("a"), kind));
            assert!(manager.expire(&expiry).is_some());
            assert!(!manager.is_visible(&remote("a"), kind));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_signal_restarts_timer_with_new_payload() {
        // テスト項目: 表示中に新しいシグナルが来るとペイロードが置き換わりタイマーが再開する
        // given (前提条件):
        let (mut manager, mut rx) = EphemeralSignalManager::new();
        manager.show(remote("a"), SignalKind::Chat, chat("first"));
        sleep(Duration::from_millis(2000)).await;

        // when (操作):
        let restarted_at = Instant::now();
        manager.show(remote("a"), SignalKind::Chat, chat("second"));
        let (expiry, elapsed) = next_expiry(&mut rx, restarted_at).await;

        // then (期待する結果):
        assert!(elapsed >= CHAT_TTL);
        assert_eq!(
            manager.visible(&remote("a"), SignalKind::Chat).unwrap().payload,
            chat("second")
        );
        assert!(manager.expire(&expiry).is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gesture_tokens_accumulate_within_batch() {
        // テスト項目: バッチ有効中のジェスチャートークンは追加されていく
        // given (前提条件):
        let (mut manager, _rx) = EphemeralSignalManager::new();
        manager.show(
            SignalOwner::Local,
            SignalKind::Gesture,
            SignalPayload::Gestures(vec![GestureKind::Vertical]),
        );

        // when (操作):
        let signal = manager.show(
            SignalOwner::Local,
            SignalKind::Gesture,
            SignalPayload::Gestures(vec![GestureKind::Circle]),
        );

        // then (期待する結果):
        assert_eq!(
            signal.payload,
            SignalPayload::Gestures(vec![GestureKind::Vertical, GestureKind::Circle])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gesture_batch_starts_fresh_after_expiry() {
        // テスト項目: バッチが期限切れになった後のジェスチャーは新しいバッチになる
        // given (前提条件):
        let (mut manager, mut rx) = EphemeralSignalManager::new();
        manager.show(
            SignalOwner::Local,
            SignalKind::Gesture,
            SignalPayload::Gestures(vec![GestureKind::Vertical]),
        );
        let expiry = rx.recv().await.unwrap();
        manager.expire(&expiry);

        // when (操作):
        let signal = manager.show(
            SignalOwner::Local,
            SignalKind::Gesture,
            SignalPayload::Gestures(vec![GestureKind::Horizontal]),
        );

        // then (期待する結果):
        assert_eq!(
            signal.payload,
            SignalPayload::Gestures(vec![GestureKind::Horizontal])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_expiry_is_ignored() {
        // テスト項目: 古い世代の期限切れ通知は無視される
        // given (前提条件):
        let (mut manager, _rx) = EphemeralSignalManager::new();
        manager.show(remote("a"), SignalKind::Ping, SignalPayload::Ping(1));
        manager.show(remote("a"), SignalKind::Ping, SignalPayload::Ping(2));
        let stale = Expiry {
            owner: remote("a"),
            kind: SignalKind::Ping,
            generation: 0,
        };

        // when (操作):
        let expired = manager.expire(&stale);

        // then (期待する結果):
        assert!(expired.is_none());
        assert!(manager.is_visible(&remote("a"), SignalKind::Ping));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_independent_per_owner_and_kind() {
        // テスト項目: スロットはクライアントごと・種類ごとに独立している
        // given (前提条件):
        let (mut manager, mut rx) = EphemeralSignalManager::new();
        manager.show(remote("a"), SignalKind::Ping, SignalPayload::Ping(1));
        manager.show(remote("a"), SignalKind::Chat, chat("hi"));
        manager.show(remote("b"), SignalKind::Ping, SignalPayload::Ping(3));

        // when (操作):
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        manager.expire(&first);
        manager.expire(&second);

        // then (期待する結果): ping の 2 件が先に期限切れになり、チャットは残る
        assert_eq!(first.kind, SignalKind::Ping);
        assert_eq!(second.kind, SignalKind::Ping);
        assert_eq!(manager.visible_count(), 1);
        assert!(manager.is_visible(&remote("a"), SignalKind::Chat));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_owner_cancels_pending_timers() {
        // テスト項目: クライアント削除で保留中のタイマーがキャンセルされる
        // given (前提条件):
        let (mut manager, mut rx) = EphemeralSignalManager::new();
        manager.show(remote("a"), SignalKind::Chat, chat("bye"));
        manager.show(remote("b"), SignalKind::Ping, SignalPayload::Ping(2));

        // when (操作):
        manager.remove_owner(&remote("a"));
        sleep(CONTEXTUAL_PING_TTL).await;

        // then (期待する結果): b の ping だけが期限切れを通知する
        let expiry = rx.recv().await.unwrap();
        assert_eq!(expiry.owner, remote("b"));
        assert!(rx.try_recv().is_err());
        assert!(!manager.is_visible(&remote("a"), SignalKind::Chat));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_everything() {
        // テスト項目: clear で全てのシグナルとタイマーが破棄される
        // given (前提条件):
        let (mut manager, mut rx) = EphemeralSignalManager::new();
        manager.show(SignalOwner::Local, SignalKind::ChatEcho, chat("me"));
        manager.show(remote("a"), SignalKind::Gesture, SignalPayload::Gestures(vec![]));

        // when (操作):
        manager.clear();
        sleep(CONTEXTUAL_PING_TTL).await;

        // then (期待する結果):
        assert_eq!(manager.visible_count(), 0);
        assert!(rx.try_recv().is_err());
    }
}
