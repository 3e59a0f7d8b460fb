//! Messaging side-effect bridge
//!
//! Connects exchange negotiation events to the conversation ledger. The
//! negotiation engine itself knows nothing about conversations; this bridge
//! is the only path by which an exchange offer becomes visible inside a
//! message thread.

use crate::{
    error::AppResult,
    models::{
        conversation::{Message, MessageAttachment},
        exchange::ExchangeOffer,
    },
    repository::Repository,
};

use super::messaging::MessagingService;

#[derive(Clone)]
pub struct MessagingBridge {
    repository: Repository,
    messaging: MessagingService,
}

impl MessagingBridge {
    pub fn new(repository: Repository, messaging: MessagingService) -> Self {
        Self { repository, messaging }
    }

    /// Ensure a conversation exists between the two parties and post a
    /// system notice referencing the freshly created offer. The notice is
    /// authored programmatically on behalf of the initiator.
    pub async fn on_exchange_offer_created(&self, offer: &ExchangeOffer) -> AppResult<Message> {
        let conversation = self
            .repository
            .conversations
            .get_or_create(offer.user_a, offer.user_b)
            .await?;

        let book = self.repository.books.get_by_id(offer.book_a).await?;
        let content = format!(
            "New exchange offer: \"{}\" for one of {} offered book(s).",
            book.title,
            offer.books_b.len()
        );

        let message = self
            .messaging
            .append_message(
                &conversation,
                offer.user_b,
                &content,
                Some(MessageAttachment::ExchangeOffer(offer.id)),
            )
            .await?;

        tracing::info!(
            offer_id = offer.id,
            conversation_id = conversation.id,
            "exchange offer announced in conversation"
        );
        Ok(message)
    }
}
