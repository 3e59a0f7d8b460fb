//! Conversation and messaging service (the conversation ledger)

use crate::{
    error::{AppError, AppResult},
    models::conversation::{
        Conversation, ConversationDetails, CreateMessage, Message, MessageAttachment, MessageQuery,
    },
    repository::Repository,
};

const DEFAULT_PAGE: i64 = 50;
const MAX_PAGE: i64 = 200;

#[derive(Clone)]
pub struct MessagingService {
    repository: Repository,
}

impl MessagingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Conversations of a user with participants and last-message summary
    pub async fn list_conversations(&self, user_id: i32) -> AppResult<Vec<ConversationDetails>> {
        let conversations = self.repository.conversations.list_for_user(user_id).await?;

        let mut result = Vec::with_capacity(conversations.len());
        for conversation in conversations {
            result.push(self.conversation_details(conversation).await?);
        }
        Ok(result)
    }

    /// Locate or create the conversation for an unordered user pair
    pub async fn get_or_create_conversation(
        &self,
        user_x: i32,
        user_y: i32,
    ) -> AppResult<Conversation> {
        if user_x == user_y {
            return Err(AppError::Validation(
                "A conversation needs two distinct participants".to_string(),
            ));
        }
        // Verify both participants exist
        self.repository.users.get_by_id(user_x).await?;
        self.repository.users.get_by_id(user_y).await?;

        self.repository.conversations.get_or_create(user_x, user_y).await
    }

    /// Post a message. The target conversation is either given by id or
    /// located (creating it if needed) from the recipient.
    pub async fn post_message(&self, sender_id: i32, message: CreateMessage) -> AppResult<Message> {
        let conversation = match (message.conversation_id, message.recipient_id) {
            (Some(conversation_id), _) => {
                self.repository.conversations.get_by_id(conversation_id).await?
            }
            (None, Some(recipient_id)) => {
                self.get_or_create_conversation(sender_id, recipient_id).await?
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "Either conversation_id or recipient_id is required".to_string(),
                ));
            }
        };

        self.append_message(&conversation, sender_id, &message.content, message.attachment)
            .await
    }

    /// Append a message to a conversation. The sender must be a participant.
    pub async fn append_message(
        &self,
        conversation: &Conversation,
        sender_id: i32,
        content: &str,
        attachment: Option<MessageAttachment>,
    ) -> AppResult<Message> {
        if !conversation.is_participant(sender_id) {
            return Err(AppError::PermissionDenied(
                "Sender is not a participant of this conversation".to_string(),
            ));
        }

        self.verify_attachment(attachment).await?;

        let row = self
            .repository
            .conversations
            .append_message(conversation.id, sender_id, content, attachment)
            .await?;

        Ok(row.into())
    }

    /// Messages of one conversation, chronological and paginated.
    /// Participant-only.
    pub async fn conversation_messages(
        &self,
        conversation_id: i32,
        user_id: i32,
        query: &MessageQuery,
    ) -> AppResult<Vec<Message>> {
        let conversation = self.repository.conversations.get_by_id(conversation_id).await?;
        if !conversation.is_participant(user_id) {
            return Err(AppError::PermissionDenied(
                "Not a participant of this conversation".to_string(),
            ));
        }

        let limit = query.limit.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
        let offset = query.offset.unwrap_or(0).max(0);

        let rows = self
            .repository
            .conversations
            .messages_for_user(user_id, Some(conversation_id), limit, offset)
            .await?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    /// Mark a message as read. Only a recipient may do this; the sender
    /// marking their own message is denied. Idempotent on repeat.
    pub async fn mark_read(&self, message_id: i32, actor: i32) -> AppResult<Message> {
        let message = self.repository.conversations.get_message(message_id).await?;
        let conversation = self
            .repository
            .conversations
            .get_by_id(message.conversation_id)
            .await?;

        if !conversation.is_participant(actor) {
            return Err(AppError::PermissionDenied(
                "Not a participant of this conversation".to_string(),
            ));
        }
        if message.sender_id == actor {
            return Err(AppError::PermissionDenied(
                "Cannot mark own message as read".to_string(),
            ));
        }

        let updated = self.repository.conversations.mark_message_read(message_id).await?;
        Ok(updated.into())
    }

    async fn conversation_details(
        &self,
        conversation: Conversation,
    ) -> AppResult<ConversationDetails> {
        let participants = self
            .repository
            .users
            .summaries(&[conversation.user_low, conversation.user_high])
            .await?;

        let last_message = self
            .repository
            .conversations
            .last_message(conversation.id)
            .await?
            .map(Message::from);

        Ok(ConversationDetails {
            id: conversation.id,
            participants,
            updated_at: conversation.updated_at,
            last_message,
        })
    }

    /// An attachment must reference an existing entity
    async fn verify_attachment(&self, attachment: Option<MessageAttachment>) -> AppResult<()> {
        match attachment {
            Some(MessageAttachment::Book(id)) => {
                self.repository.books.get_by_id(id).await?;
            }
            Some(MessageAttachment::Listing(id)) => {
                self.repository.listings.get_by_id(id).await?;
            }
            Some(MessageAttachment::ExchangeOffer(id)) => {
                self.repository.exchanges.get_by_id(id).await?;
            }
            None => {}
        }
        Ok(())
    }
}
