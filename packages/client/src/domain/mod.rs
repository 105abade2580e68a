//! Pure client-side state machines.
//!
//! Nothing here touches the network or the terminal; time is passed in
//! explicitly (epoch milliseconds) except for the signal manager, which owns
//! tokio timers.

pub mod gesture;
pub mod rate_limit;
pub mod reconcile;
pub mod reconnect;
pub mod signal;
pub mod store;
pub mod view;

pub use gesture::{GestureRecognizer, TriggerZone};
pub use rate_limit::OutboundRateLimiter;
pub use reconcile::{DisplayPosition, reconcile};
pub use signal::{EphemeralSignal, EphemeralSignalManager, Expiry, SignalKind, SignalOwner, SignalPayload};
pub use store::ClientStateStore;
pub use view::{ClientBounds, LocalClientState, PointerState, Presence, RemoteClientView};
