//! Notice formatting for the terminal.

use cursors_server::infrastructure::dto::websocket::GestureKind;

use crate::{
    app::{Notice, RosterEntry},
    domain::{DisplayPosition, SignalKind},
};

/// Notice formatter for terminal display
pub struct NoticeFormatter;

impl NoticeFormatter {
    /// Emoji shown for a pie-menu ping
    ///
    /// # Arguments
    ///
    /// * `index` - Ping index selected in the pie menu (1..=3)
    ///
    /// # Returns
    ///
    /// The emoji, or `"?"` for an index no client sends
    pub fn ping_emoji(index: u8) -> &'static str {
        match index {
            1 => "🔥",
            2 => "👎",
            3 => "👍",
            _ => "?",
        }
    }

    /// Label shown for a recognized gesture
    pub fn gesture_label(gesture: GestureKind) -> &'static str {
        match gesture {
            GestureKind::Horizontal => "No",
            GestureKind::Vertical => "Yes!",
            GestureKind::Circle => "Look here",
        }
    }

    /// Text shown for a contextual ping type
    ///
    /// # Arguments
    ///
    /// * `kind` - Contextual ping type such as `TEXT_ERROR`
    ///
    /// # Returns
    ///
    /// The text, or the raw type for types this client does not know
    pub fn contextual_ping_text(kind: &str) -> &str {
        match kind {
            "LOGO_BODY" => "Look at the logo",
            "LOGO_META" => "Are there any changes?",
            "TEXT_DEFAULT" => "Look at this text",
            "TEXT_ERROR" => "Look at this error",
            "TEXT_META" => "Should we stage this file?",
            other => other,
        }
    }

    fn signal_label(kind: SignalKind) -> &'static str {
        match kind {
            SignalKind::Chat | SignalKind::ChatEcho => "chat bubble",
            SignalKind::Ping => "ping",
            SignalKind::ContextualPing => "contextual ping",
            SignalKind::Gesture => "gesture",
        }
    }

    fn position(position: &DisplayPosition) -> String {
        let suffix = if position.in_viewport {
            ""
        } else {
            " (off-screen)"
        };
        format!("({:.0}, {:.0}){}", position.x, position.y, suffix)
    }

    /// Format the `/who` listing
    pub fn format_roster(entries: &[RosterEntry]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Clients:\n");

        if entries.is_empty() {
            output.push_str("(No other clients)\n");
        } else {
            for entry in entries {
                let hidden = if entry.cursor_visible { "" } else { " [away]" };
                output.push_str(&format!(
                    "{} {} {} at {}{}\n",
                    entry.id,
                    entry.name,
                    entry.color,
                    Self::position(&entry.position),
                    hidden
                ));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a notice for the terminal
    ///
    /// # Arguments
    ///
    /// * `notice` - What happened
    ///
    /// # Returns
    ///
    /// A formatted string starting on a new line
    pub fn format(notice: &Notice) -> String {
        match notice {
            Notice::Initialized {
                id,
                name,
                color,
                others,
            } => format!(
                "\nYou are {} ({}, {}). {} other client(s) connected.\n\
                 Type a message to chat, or /who /move /down /up /zone /ping /context /focus /blur /menu /scroll.\n",
                name, id, color, others
            ),
            Notice::Joined { id, name } => format!("\n+ {} ({}) joined\n", name, id),
            Notice::Left { id, name } => match name {
                Some(name) => format!("\n- {} ({}) left\n", name, id),
                None => format!("\n- {} left\n", id),
            },
            Notice::Chat { from, msg } => format!("\n@{}: {}\n", from, msg),
            Notice::Ping { from, index } => {
                format!("\n{} pinged {}\n", from, Self::ping_emoji(*index))
            }
            Notice::ContextualPing { from, kind } => {
                format!("\n{}: {}\n", from, Self::contextual_ping_text(kind))
            }
            Notice::Gesture { from, gestures } => {
                let labels: Vec<&str> = gestures.iter().map(|g| Self::gesture_label(*g)).collect();
                format!("\n{} gestured: {}\n", from, labels.join(" "))
            }
            Notice::CursorMoved { name, position } => {
                format!("\n{} moved to {}\n", name, Self::position(position))
            }
            Notice::FocusChanged { name, active } => {
                let state = if *active { "is back" } else { "is away" };
                format!("\n{} {}\n", name, state)
            }
            Notice::Expired { from, kind } => {
                format!("\n{}'s {} faded\n", from, Self::signal_label(*kind))
            }
            Notice::MenuChanged(true) => "\nRadial menu open, cursor frozen\n".to_string(),
            Notice::MenuChanged(false) => "\nRadial menu closed\n".to_string(),
            Notice::Roster(entries) => Self::format_roster(entries),
            Notice::MoveSuppressed { menu_open: true } => {
                "\nMove not sent: radial menu is open\n".to_string()
            }
            Notice::MoveSuppressed { menu_open: false } => {
                "\nMove not sent: too soon after the last one\n".to_string()
            }
            Notice::Scrolled(offset) => format!("\nScrolled to {:.0}\n", offset),
        }
    }

    /// Whether a notice is chatty enough to log instead of print
    pub fn is_verbose(notice: &Notice) -> bool {
        matches!(
            notice,
            Notice::CursorMoved { .. } | Notice::Expired { .. } | Notice::FocusChanged { .. }
        )
    }
}
