use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    /// Request body for creating an account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    /// A user as exposed to clients (no credential material).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub username: String,
    }

    /// Response body for listing selectable participants.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<UserView>,
    }
}

pub mod expense {
    use super::*;

    /// Request body for creating an expense.
    ///
    /// `total_minor` is the full amount in integer cents.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        pub currency: String,
        pub total_minor: i64,
        pub note: Option<String>,
        pub participants: Vec<i32>,
    }

    /// Request body for updating an expense; replaces fields and the
    /// participant set.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub title: String,
        pub currency: String,
        pub total_minor: i64,
        pub note: Option<String>,
        pub participants: Vec<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: i32,
    }

    /// The payer-facing edit view: current fields plus participant ids.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDetail {
        pub id: i32,
        pub title: String,
        pub currency: String,
        pub total_minor: i64,
        pub note: Option<String>,
        pub created_at: DateTime<FixedOffset>,
        pub participants: Vec<i32>,
    }
}

pub mod dashboard {
    use super::*;

    /// One participant's slice of an expense, as shown to the payer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShareView {
        pub user_id: i32,
        pub username: String,
        pub amount_minor: i64,
        pub paid: bool,
    }

    /// An expense the user paid for.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaidExpenseView {
        pub id: i32,
        pub title: String,
        pub currency: String,
        pub total_minor: i64,
        pub note: Option<String>,
        pub split_amount_minor: i64,
        pub participants: Vec<ShareView>,
    }

    /// A share the user owes on someone else's expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OwedShareView {
        pub expense_id: i32,
        pub title: String,
        pub currency: String,
        pub payer: String,
        pub amount_minor: i64,
        pub paid: bool,
        pub note: Option<String>,
    }

    /// Aggregate balances, recomputed per request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardResponse {
        pub paid_expenses: Vec<PaidExpenseView>,
        pub owed_shares: Vec<OwedShareView>,
        pub you_are_owed_minor: i64,
        pub you_owe_minor: i64,
    }
}

pub mod notification {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationView {
        pub id: i32,
        pub message: String,
        pub created_at: DateTime<FixedOffset>,
    }

    /// Response body for draining unread notifications.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotificationsResponse {
        pub notifications: Vec<NotificationView>,
    }

    /// Response body for triggering payment reminders.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RemindResponse {
        pub created: usize,
    }
}
