//! Conversation and message models
//!
//! A conversation is an append-only message thread between exactly two users.
//! The participant pair is stored normalized (lower id first) so the storage
//! layer can enforce at most one conversation per unordered pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::user::UserSummary;

/// Conversation row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: i32,
    pub user_low: i32,
    pub user_high: i32,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Normalize an unordered participant pair into the stored (low, high) key
    pub fn pair_key(user_x: i32, user_y: i32) -> (i32, i32) {
        if user_x <= user_y {
            (user_x, user_y)
        } else {
            (user_y, user_x)
        }
    }

    pub fn is_participant(&self, user_id: i32) -> bool {
        self.user_low == user_id || self.user_high == user_id
    }
}

/// Optional reference a message carries to exactly one catalog resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MessageAttachment {
    Book(i32),
    Listing(i32),
    ExchangeOffer(i32),
}

impl MessageAttachment {
    /// Split into the three nullable columns the messages table stores.
    /// Exactly one is non-null.
    pub fn into_columns(attachment: Option<Self>) -> (Option<i32>, Option<i32>, Option<i32>) {
        match attachment {
            Some(MessageAttachment::Book(id)) => (Some(id), None, None),
            Some(MessageAttachment::Listing(id)) => (None, Some(id), None),
            Some(MessageAttachment::ExchangeOffer(id)) => (None, None, Some(id)),
            None => (None, None, None),
        }
    }

    /// Rebuild from the stored columns. A CHECK constraint guarantees at most
    /// one of the columns is non-null.
    pub fn from_columns(
        book_id: Option<i32>,
        listing_id: Option<i32>,
        exchange_offer_id: Option<i32>,
    ) -> Option<Self> {
        match (book_id, listing_id, exchange_offer_id) {
            (Some(id), None, None) => Some(MessageAttachment::Book(id)),
            (None, Some(id), None) => Some(MessageAttachment::Listing(id)),
            (None, None, Some(id)) => Some(MessageAttachment::ExchangeOffer(id)),
            _ => None,
        }
    }
}

/// Message row from database
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub book_id: Option<i32>,
    pub listing_id: Option<i32>,
    pub exchange_offer_id: Option<i32>,
}

/// Message as exposed by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Message {
    pub id: i32,
    pub conversation_id: i32,
    pub sender_id: i32,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub attachment: Option<MessageAttachment>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            content: row.content,
            is_read: row.is_read,
            created_at: row.created_at,
            attachment: MessageAttachment::from_columns(
                row.book_id,
                row.listing_id,
                row.exchange_offer_id,
            ),
        }
    }
}

/// Conversation with participants and last message for listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationDetails {
    pub id: i32,
    pub participants: Vec<UserSummary>,
    pub updated_at: DateTime<Utc>,
    pub last_message: Option<Message>,
}

/// Post message request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessage {
    pub conversation_id: Option<i32>,
    /// Recipient, used to locate or create the conversation when no
    /// conversation_id is given
    pub recipient_id: Option<i32>,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    pub attachment: Option<MessageAttachment>,
}

/// Paginated message listing query
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct MessageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(Conversation::pair_key(7, 3), (3, 7));
        assert_eq!(Conversation::pair_key(3, 7), (3, 7));
        assert_eq!(Conversation::pair_key(5, 5), (5, 5));
    }

    #[test]
    fn test_attachment_column_round_trip() {
        for attachment in [
            None,
            Some(MessageAttachment::Book(1)),
            Some(MessageAttachment::Listing(2)),
            Some(MessageAttachment::ExchangeOffer(3)),
        ] {
            let (b, l, e) = MessageAttachment::into_columns(attachment);
            assert_eq!(MessageAttachment::from_columns(b, l, e), attachment);
        }
    }

    #[test]
    fn test_attachment_at_most_one_column_set() {
        let (b, l, e) = MessageAttachment::into_columns(Some(MessageAttachment::Listing(9)));
        let set = [b, l, e].iter().filter(|c| c.is_some()).count();
        assert_eq!(set, 1);
    }
}
