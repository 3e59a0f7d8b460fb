//! Exchange negotiation service
//!
//! Validates and persists offers, runs the negotiation transitions through
//! the repository (which applies the state machine under a row lock), and
//! hands the created-offer event to the messaging bridge.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::exchange::{CreateExchangeOffer, ExchangeOffer, ExchangeOfferDetails},
    repository::{library::Shelf, Repository},
};

use super::bridge::MessagingBridge;

#[derive(Clone)]
pub struct ExchangesService {
    repository: Repository,
    bridge: MessagingBridge,
}

impl ExchangesService {
    pub fn new(repository: Repository, bridge: MessagingBridge) -> Self {
        Self { repository, bridge }
    }

    /// Create an offer. The initiator is the authenticated actor; the target
    /// must own or actively list the requested book. Announces the offer in
    /// the parties' conversation via the bridge.
    pub async fn create_offer(
        &self,
        initiator: i32,
        request: CreateExchangeOffer,
    ) -> AppResult<ExchangeOfferDetails> {
        if request.user_a_id == initiator {
            return Err(AppError::Validation(
                "Cannot open an exchange offer with yourself".to_string(),
            ));
        }
        if request.books_b_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one candidate book must be offered".to_string(),
            ));
        }

        // Verify target user and requested book exist
        self.repository.users.get_by_id(request.user_a_id).await?;
        let book_a = self.repository.books.get_by_id(request.book_a_id).await?;

        let books_b: Vec<i32> = request
            .books_b_ids
            .iter()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if !self.repository.books.all_exist(&books_b).await? {
            return Err(AppError::NotFound(
                "One or more candidate books do not exist".to_string(),
            ));
        }
        if books_b.contains(&request.book_a_id) {
            return Err(AppError::Validation(
                "The requested book cannot be among the candidates".to_string(),
            ));
        }

        let owns = self
            .repository
            .library
            .contains(Shelf::Library, request.user_a_id, request.book_a_id)
            .await?;
        let lists = self
            .repository
            .listings
            .user_has_active_listing(request.user_a_id, request.book_a_id)
            .await?;
        if !owns && !lists {
            return Err(AppError::Validation(
                "The requested book is not owned or listed by the target user".to_string(),
            ));
        }

        let offer = self
            .repository
            .exchanges
            .create(request.user_a_id, initiator, request.book_a_id, &books_b)
            .await?;

        self.bridge.on_exchange_offer_created(&offer).await?;
        self.repository
            .feed
            .record_activity(
                initiator,
                &format!("proposed an exchange for \"{}\"", book_a.title),
            )
            .await?;

        self.details(offer).await
    }

    /// Get an offer; only its parties may see it
    pub async fn get_offer(&self, offer_id: i32, actor: i32) -> AppResult<ExchangeOfferDetails> {
        let offer = self.repository.exchanges.get_by_id(offer_id).await?;
        if !offer.is_party(actor) {
            return Err(AppError::PermissionDenied(
                "Not a party of this exchange offer".to_string(),
            ));
        }
        self.details(offer).await
    }

    /// Offers the actor participates in
    pub async fn list_offers(&self, actor: i32) -> AppResult<Vec<ExchangeOfferDetails>> {
        let offers = self.repository.exchanges.list_for_user(actor).await?;
        let mut result = Vec::with_capacity(offers.len());
        for offer in offers {
            result.push(self.details(offer).await?);
        }
        Ok(result)
    }

    /// The target picks a candidate book, implicitly accepting
    pub async fn choose_book(
        &self,
        offer_id: i32,
        actor: i32,
        book_id: i32,
    ) -> AppResult<ExchangeOfferDetails> {
        let offer = self
            .repository
            .exchanges
            .choose_book(offer_id, actor, book_id)
            .await?;
        self.details(offer).await
    }

    /// The initiator ratifies the target's choice
    pub async fn confirm(&self, offer_id: i32, actor: i32) -> AppResult<ExchangeOfferDetails> {
        let offer = self.repository.exchanges.confirm(offer_id, actor).await?;
        self.details(offer).await
    }

    /// Either party backs out
    pub async fn reject(&self, offer_id: i32, actor: i32) -> AppResult<ExchangeOfferDetails> {
        let offer = self.repository.exchanges.reject(offer_id, actor).await?;
        self.details(offer).await
    }

    async fn details(&self, offer: ExchangeOffer) -> AppResult<ExchangeOfferDetails> {
        let users = self
            .repository
            .users
            .summaries(&[offer.user_a, offer.user_b])
            .await?;
        let user_a = users
            .iter()
            .find(|u| u.id == offer.user_a)
            .cloned()
            .ok_or_else(|| AppError::Internal("Offer target user missing".to_string()))?;
        let user_b = users
            .iter()
            .find(|u| u.id == offer.user_b)
            .cloned()
            .ok_or_else(|| AppError::Internal("Offer initiator user missing".to_string()))?;

        let mut book_ids = offer.books_b.clone();
        book_ids.push(offer.book_a);
        let books = self.repository.books.summaries(&book_ids).await?;

        let book_a = books
            .iter()
            .find(|b| b.id == offer.book_a)
            .cloned()
            .ok_or_else(|| AppError::Internal("Requested book missing".to_string()))?;
        let books_b = offer
            .books_b
            .iter()
            .filter_map(|id| books.iter().find(|b| b.id == *id).cloned())
            .collect();
        let chosen_book_b =
            offer.chosen_book_b.and_then(|id| books.iter().find(|b| b.id == id).cloned());

        Ok(ExchangeOfferDetails {
            id: offer.id,
            user_a,
            user_b,
            book_a,
            books_b,
            chosen_book_b,
            accepted_a: offer.accepted_a,
            accepted_b: offer.accepted_b,
            rejected: offer.rejected,
            state: offer.state(),
            created_at: offer.created_at,
        })
    }
}
