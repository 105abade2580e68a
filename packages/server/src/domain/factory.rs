//! Factories for connection ids and identities.

use rand::{Rng, seq::IndexedRandom};
use uuid::Uuid;

use super::{
    entity::Identity,
    value_object::{ClientId, CursorColor, DisplayName},
};

/// First half of a generated display name.
pub const NAME_ADJECTIVES: [&str; 5] = ["Fancy", "Delightful", "Sleepy", "Curious", "Brave"];
/// Second half of a generated display name.
pub const NAME_ANIMALS: [&str; 5] = ["Parrot", "Weasel", "Otter", "Badger", "Heron"];
/// Cursor color palette.
pub const COLOR_PALETTE: [&str; 5] = ["#FF6575", "#4262FF", "#58D382", "#C552B8", "#817F99"];

/// Generates connection ids. Ids are UUID v4 and never reused.
pub struct ClientIdFactory;

impl ClientIdFactory {
    pub fn generate() -> ClientId {
        ClientId::generated(Uuid::new_v4().to_string())
    }
}

/// Allocates a random display name and color for a new connection.
///
/// Collisions between concurrently connected clients are allowed.
pub struct IdentityFactory;

impl IdentityFactory {
    pub fn generate(id: ClientId) -> Identity {
        Self::generate_with(id, &mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(id: ClientId, rng: &mut R) -> Identity {
        let first = NAME_ADJECTIVES.choose(rng).copied().unwrap_or(NAME_ADJECTIVES[0]);
        let second = NAME_ANIMALS.choose(rng).copied().unwrap_or(NAME_ANIMALS[0]);
        let color = COLOR_PALETTE.choose(rng).copied().unwrap_or(COLOR_PALETTE[0]);

        Identity::new(
            id,
            DisplayName::from_words(first, second),
            CursorColor::from_palette(color),
        )
    }
}
