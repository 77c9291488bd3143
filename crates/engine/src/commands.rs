//! Command structs for engine operations.
//!
//! These types group parameters for write operations (create/update expense),
//! keeping call sites readable and avoiding long argument lists.

use crate::MoneyCents;

/// Create an expense split across a set of participants.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub title: String,
    pub currency: String,
    pub total: MoneyCents,
    pub note: Option<String>,
    pub payer_id: i32,
    pub participant_user_ids: Vec<i32>,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        currency: impl Into<String>,
        total: MoneyCents,
        payer_id: i32,
    ) -> Self {
        Self {
            title: title.into(),
            currency: currency.into(),
            total,
            note: None,
            payer_id,
            participant_user_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn participants(mut self, participant_user_ids: Vec<i32>) -> Self {
        self.participant_user_ids = participant_user_ids;
        self
    }
}

/// Update an expense and reconcile its participant set.
///
/// `user_id` is the requester; only the payer passes the authorization check.
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub expense_id: i32,
    pub title: String,
    pub currency: String,
    pub total: MoneyCents,
    pub note: Option<String>,
    pub participant_user_ids: Vec<i32>,
    pub user_id: i32,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(
        expense_id: i32,
        title: impl Into<String>,
        currency: impl Into<String>,
        total: MoneyCents,
        user_id: i32,
    ) -> Self {
        Self {
            expense_id,
            title: title.into(),
            currency: currency.into(),
            total,
            note: None,
            participant_user_ids: Vec::new(),
            user_id,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn participants(mut self, participant_user_ids: Vec<i32>) -> Self {
        self.participant_user_ids = participant_user_ids;
        self
    }
}
