//! Conversion logic between DTOs and domain entities.

use cursors_shared::time::timestamp_to_rfc3339;

use crate::domain::{Identity, Session};
use crate::infrastructure::dto::{http::ClientSummaryDto, websocket::IdentityDto};

impl From<Identity> for IdentityDto {
    fn from(model: Identity) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name.into_string(),
            color: model.color.into_string(),
        }
    }
}

impl From<Session> for ClientSummaryDto {
    fn from(model: Session) -> Self {
        Self {
            id: model.identity.id.into_string(),
            name: model.identity.name.into_string(),
            color: model.identity.color.into_string(),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, CursorColor, DisplayName, Registry, Timestamp};

    fn identity() -> Identity {
        Identity::new(
            ClientId::new("abc".to_string()).unwrap(),
            DisplayName::new("Sleepy Otter".to_string()).unwrap(),
            CursorColor::new("#58D382".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_identity_to_dto() {
        // テスト項目: Identity が IdentityDto に変換される
        // given (前提条件):
        let model = identity();

        // when (操作):
        let dto: IdentityDto = model.into();

        // then (期待する結果):
        assert_eq!(
            dto,
            IdentityDto {
                id: "abc".to_string(),
                name: "Sleepy Otter".to_string(),
                color: "#58D382".to_string(),
            }
        );
    }

    #[test]
    fn test_session_to_summary_dto() {
        // テスト項目: Session が RFC 3339 の接続時刻を持つ ClientSummaryDto に変換される
        // given (前提条件):
        let mut registry = Registry::new();
        registry.register(identity(), Timestamp::new(1672531200123));
        let session = registry.sessions().remove(0);

        // when (操作):
        let dto: ClientSummaryDto = session.into();

        // then (期待する結果):
        assert_eq!(dto.id, "abc");
        assert_eq!(dto.connected_at, "2023-01-01T00:00:00.123Z");
    }
}
