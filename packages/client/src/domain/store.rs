//! Client-side mirror of the server registry.

use std::collections::{BTreeMap, VecDeque};

use cursors_server::infrastructure::dto::websocket::{
    CursorMoveBroadcast, GestureKind, IdentityDto,
};

use super::{
    reconcile::adjust_x,
    view::{ClientBounds, DEFAULT_COLOR, Presence, RemoteClientView},
};

/// Departed ids remembered as [`Presence::Absent`] before the oldest is
/// forgotten.
pub const MAX_ABSENT_ENTRIES: usize = 1024;

/// Remote participants keyed by id.
///
/// Departed ids stay in the map as [`Presence::Absent`]; ids are never reused,
/// so any update arriving for an absent id is stale and dropped. At most
/// `absent_limit` such entries are kept, oldest departure evicted first.
#[derive(Debug, Clone)]
pub struct ClientStateStore {
    clients: BTreeMap<String, Presence>,
    departed: VecDeque<String>,
    absent_limit: usize,
}

impl Default for ClientStateStore {
    fn default() -> Self {
        Self::with_absent_limit(MAX_ABSENT_ENTRIES)
    }
}

impl ClientStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_absent_limit(absent_limit: usize) -> Self {
        Self {
            clients: BTreeMap::new(),
            departed: VecDeque::new(),
            absent_limit,
        }
    }

    /// Replace everything with a fresh roster, skipping `local_id`.
    pub fn initialize(&mut self, local_id: &str, roster: Vec<IdentityDto>) {
        self.clients = roster
            .into_iter()
            .filter(|identity| identity.id != local_id)
            .map(|identity| {
                (
                    identity.id,
                    Presence::Present(RemoteClientView::new(identity.name, identity.color)),
                )
            })
            .collect();
        self.departed.clear();
    }

    /// Insert a newly joined client. A repeated join keeps transient state and
    /// refreshes name and color.
    pub fn client_joined(&mut self, identity: IdentityDto) {
        match self.clients.get_mut(&identity.id) {
            Some(Presence::Present(view)) => {
                view.name = identity.name;
                view.color = identity.color;
            }
            Some(Presence::Absent) => {
                self.departed.retain(|id| *id != identity.id);
                self.clients.insert(
                    identity.id,
                    Presence::Present(RemoteClientView::new(identity.name, identity.color)),
                );
            }
            None => {
                self.clients.insert(
                    identity.id,
                    Presence::Present(RemoteClientView::new(identity.name, identity.color)),
                );
            }
        }
    }

    /// Mark `id` absent. Returns the view it had, if it was present.
    pub fn client_left(&mut self, id: &str) -> Option<RemoteClientView> {
        let previous = self.clients.insert(id.to_string(), Presence::Absent);
        if !matches!(previous, Some(Presence::Absent)) {
            self.departed.push_back(id.to_string());
            self.evict_departed();
        }

        match previous {
            Some(Presence::Present(view)) => Some(view),
            _ => None,
        }
    }

    fn evict_departed(&mut self) {
        while self.departed.len() > self.absent_limit {
            let Some(oldest) = self.departed.pop_front() else {
                break;
            };
            self.clients.remove(&oldest);
        }
    }

    /// Number of departed ids currently remembered.
    pub fn absent_count(&self) -> usize {
        self.clients.values().filter(|p| p.is_absent()).count()
    }

    /// View to update for `id`, inserting a default one for unknown ids.
    /// `None` if the id is absent.
    fn entry_for_update(&mut self, id: &str, name: Option<&str>) -> Option<&mut RemoteClientView> {
        let presence = self.clients.entry(id.to_string()).or_insert_with(|| {
            Presence::Present(RemoteClientView::new(name.unwrap_or(id), DEFAULT_COLOR))
        });
        match presence {
            Presence::Present(view) => Some(view),
            Presence::Absent => None,
        }
    }

    /// Overwrite position, pointer and bounds. x is translated into the local
    /// viewport on the way in.
    pub fn apply_cursor_move(&mut self, update: &CursorMoveBroadcast, local: &ClientBounds) -> bool {
        let Some(view) = self.entry_for_update(&update.id, Some(&update.name)) else {
            return false;
        };

        let bounds = update
            .payload
            .client_bounds
            .map(ClientBounds::from)
            .unwrap_or(view.client_bounds);
        view.x = adjust_x(update.payload.x, local.width, bounds.width);
        view.y = update.payload.y;
        view.pointer = update.payload.pointer.into();
        view.client_bounds = bounds;
        true
    }

    pub fn apply_focus_blur(&mut self, id: &str, active: bool) -> bool {
        let Some(view) = self.entry_for_update(id, None) else {
            return false;
        };
        view.cursor_visible = active;
        true
    }

    pub fn apply_chat(&mut self, id: &str, msg: &str) -> bool {
        let Some(view) = self.entry_for_update(id, None) else {
            return false;
        };
        view.last_message = Some(msg.to_string());
        true
    }

    pub fn apply_gesture(&mut self, id: &str, gesture: GestureKind) -> bool {
        let Some(view) = self.entry_for_update(id, None) else {
            return false;
        };
        view.last_gesture_token = Some(gesture);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Presence> {
        self.clients.get(id)
    }

    pub fn view(&self, id: &str) -> Option<&RemoteClientView> {
        self.clients.get(id).and_then(Presence::as_present)
    }

    pub fn is_absent(&self, id: &str) -> bool {
        self.clients.get(id).is_some_and(Presence::is_absent)
    }

    /// Connected remote clients, ordered by id.
    pub fn present(&self) -> impl Iterator<Item = (&str, &RemoteClientView)> {
        self.clients
            .iter()
            .filter_map(|(id, presence)| presence.as_present().map(|view| (id.as_str(), view)))
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }
}
