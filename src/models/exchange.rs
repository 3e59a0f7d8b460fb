//! Exchange offer model and negotiation state machine
//!
//! An exchange offer is a negotiation between two users: user_b (the
//! initiator) wants book_a owned by user_a, and offers a set of candidate
//! books (books_b) in return. user_a picks one candidate, which is also the
//! act of accepting; user_b then ratifies, closing the deal. Either party may
//! reject at any point before confirmation.
//!
//! Transition rules live here as pure methods so they can be unit tested in
//! isolation; the repository applies them under a row lock and persists the
//! resulting field changes atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::book::BookSummary;
use super::user::UserSummary;

/// Lifecycle state derived from the acceptance and rejection flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    /// Created by the initiator, no candidate chosen yet
    Proposed,
    /// The target picked a candidate book and thereby accepted
    Chosen,
    /// The initiator ratified the choice - terminal success
    Confirmed,
    /// Either party backed out - terminal failure
    Rejected,
}

/// Exchange offer with its candidate book set. Fetched with the candidate
/// ids aggregated into the books_b array column.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExchangeOffer {
    pub id: i32,
    /// The offer's target: owner of the requested book
    pub user_a: i32,
    /// The offer's initiator
    pub user_b: i32,
    /// The single book of user_a that user_b wants
    pub book_a: i32,
    /// Candidate books user_b offers in exchange
    pub books_b: Vec<i32>,
    /// The candidate user_a selected, if any
    pub chosen_book_b: Option<i32>,
    pub accepted_a: bool,
    pub accepted_b: bool,
    pub rejected: bool,
    pub created_at: DateTime<Utc>,
}

impl ExchangeOffer {
    pub fn state(&self) -> ExchangeState {
        if self.rejected {
            ExchangeState::Rejected
        } else if self.accepted_b {
            ExchangeState::Confirmed
        } else if self.accepted_a {
            ExchangeState::Chosen
        } else {
            ExchangeState::Proposed
        }
    }

    pub fn is_party(&self, user_id: i32) -> bool {
        user_id == self.user_a || user_id == self.user_b
    }

    /// The target picks one of the offered candidates. Choosing is the sole
    /// way accepted_a becomes true: choice and acceptance are the same act.
    /// Re-choosing a different candidate is allowed until confirmation.
    pub fn choose_book(&mut self, actor: i32, book_id: i32) -> AppResult<()> {
        if actor != self.user_a {
            return Err(AppError::PermissionDenied(
                "Only the offer target may choose a book".to_string(),
            ));
        }
        if self.rejected {
            return Err(AppError::InvalidState(
                "Offer has been rejected".to_string(),
            ));
        }
        if self.accepted_b {
            return Err(AppError::InvalidState(
                "Offer has already been confirmed".to_string(),
            ));
        }
        if !self.books_b.contains(&book_id) {
            return Err(AppError::Validation(
                "Chosen book is not among the offered candidates".to_string(),
            ));
        }

        self.chosen_book_b = Some(book_id);
        self.accepted_a = true;
        Ok(())
    }

    /// The initiator ratifies the target's choice, closing the deal.
    pub fn confirm(&mut self, actor: i32) -> AppResult<()> {
        if actor != self.user_b {
            return Err(AppError::PermissionDenied(
                "Only the offer initiator may confirm".to_string(),
            ));
        }
        if self.rejected {
            return Err(AppError::InvalidState(
                "Offer has been rejected".to_string(),
            ));
        }
        if !self.accepted_a || self.chosen_book_b.is_none() {
            return Err(AppError::InvalidState(
                "Target has not chosen a book yet".to_string(),
            ));
        }

        self.accepted_b = true;
        Ok(())
    }

    /// Either party backs out. Rejecting an already rejected offer is a
    /// no-op; a confirmed offer can no longer be rejected.
    pub fn reject(&mut self, actor: i32) -> AppResult<()> {
        if !self.is_party(actor) {
            return Err(AppError::PermissionDenied(
                "Only the offer parties may reject".to_string(),
            ));
        }
        if self.rejected {
            return Ok(());
        }
        if self.accepted_b {
            return Err(AppError::InvalidState(
                "Offer has already been confirmed".to_string(),
            ));
        }

        self.rejected = true;
        Ok(())
    }
}

/// Exchange offer with embedded parties and books for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExchangeOfferDetails {
    pub id: i32,
    pub user_a: UserSummary,
    pub user_b: UserSummary,
    pub book_a: BookSummary,
    pub books_b: Vec<BookSummary>,
    pub chosen_book_b: Option<BookSummary>,
    pub accepted_a: bool,
    pub accepted_b: bool,
    pub rejected: bool,
    pub state: ExchangeState,
    pub created_at: DateTime<Utc>,
}

/// Create exchange offer request. The initiator is always the authenticated
/// user, never taken from the payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExchangeOffer {
    /// Owner of the requested book
    pub user_a_id: i32,
    /// The requested book
    pub book_a_id: i32,
    /// Candidate books offered in exchange
    #[validate(length(min = 1, message = "At least one candidate book must be offered"))]
    pub books_b_ids: Vec<i32>,
}

/// Choose book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChooseBook {
    pub book_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_A: i32 = 1;
    const USER_B: i32 = 2;
    const OUTSIDER: i32 = 9;

    fn offer() -> ExchangeOffer {
        ExchangeOffer {
            id: 1,
            user_a: USER_A,
            user_b: USER_B,
            book_a: 10,
            books_b: vec![20, 30],
            chosen_book_b: None,
            accepted_a: false,
            accepted_b: false,
            rejected: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_offer_is_proposed() {
        let offer = offer();
        assert_eq!(offer.state(), ExchangeState::Proposed);
        assert!(!offer.accepted_a);
        assert!(!offer.accepted_b);
        assert!(!offer.rejected);
        assert_eq!(offer.chosen_book_b, None);
    }

    #[test]
    fn test_choose_book_sets_choice_and_acceptance() {
        let mut offer = offer();
        offer.choose_book(USER_A, 20).unwrap();
        assert_eq!(offer.chosen_book_b, Some(20));
        assert!(offer.accepted_a);
        assert_eq!(offer.state(), ExchangeState::Chosen);
    }

    #[test]
    fn test_choose_book_rejects_non_candidate() {
        let mut offer = offer();
        let err = offer.choose_book(USER_A, 99).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // no state change
        assert_eq!(offer.chosen_book_b, None);
        assert!(!offer.accepted_a);
    }

    #[test]
    fn test_choose_book_denied_for_initiator_and_outsider() {
        let mut offer = offer();
        assert!(matches!(
            offer.choose_book(USER_B, 20),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            offer.choose_book(OUTSIDER, 20),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_rechoose_before_confirmation() {
        let mut offer = offer();
        offer.choose_book(USER_A, 20).unwrap();
        offer.choose_book(USER_A, 30).unwrap();
        assert_eq!(offer.chosen_book_b, Some(30));
    }

    #[test]
    fn test_confirm_before_choice_is_invalid_state() {
        let mut offer = offer();
        let err = offer.confirm(USER_B).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(!offer.accepted_b);
    }

    #[test]
    fn test_confirm_after_choice_closes_the_deal() {
        let mut offer = offer();
        offer.choose_book(USER_A, 20).unwrap();
        offer.confirm(USER_B).unwrap();
        assert!(offer.accepted_b);
        assert_eq!(offer.state(), ExchangeState::Confirmed);
    }

    #[test]
    fn test_confirm_denied_for_target_and_outsider() {
        let mut offer = offer();
        offer.choose_book(USER_A, 20).unwrap();
        assert!(matches!(
            offer.confirm(USER_A),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            offer.confirm(OUTSIDER),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_reject_from_any_non_terminal_state() {
        let mut proposed = offer();
        proposed.reject(USER_A).unwrap();
        assert_eq!(proposed.state(), ExchangeState::Rejected);

        let mut chosen = offer();
        chosen.choose_book(USER_A, 20).unwrap();
        chosen.reject(USER_B).unwrap();
        assert_eq!(chosen.state(), ExchangeState::Rejected);
    }

    #[test]
    fn test_reject_is_idempotent() {
        let mut offer = offer();
        offer.reject(USER_A).unwrap();
        offer.reject(USER_B).unwrap();
        assert!(offer.rejected);
    }

    #[test]
    fn test_reject_denied_for_outsider() {
        let mut offer = offer();
        assert!(matches!(
            offer.reject(OUTSIDER),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_rejected_offer_blocks_further_transitions() {
        let mut offer = offer();
        offer.reject(USER_A).unwrap();
        assert!(matches!(
            offer.choose_book(USER_A, 20),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            offer.confirm(USER_B),
            Err(AppError::InvalidState(_))
        ));
        assert_eq!(offer.state(), ExchangeState::Rejected);
    }

    #[test]
    fn test_confirmed_offer_cannot_be_rejected_or_rechosen() {
        let mut offer = offer();
        offer.choose_book(USER_A, 20).unwrap();
        offer.confirm(USER_B).unwrap();
        assert!(matches!(
            offer.reject(USER_A),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            offer.choose_book(USER_A, 30),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn test_accepted_b_implies_choice_and_accepted_a() {
        // confirm is the only path to accepted_b and it requires both
        let mut offer = offer();
        assert!(offer.confirm(USER_B).is_err());
        offer.choose_book(USER_A, 30).unwrap();
        offer.confirm(USER_B).unwrap();
        assert!(offer.accepted_a);
        assert!(offer.chosen_book_b.is_some());
    }
}
