use std::collections::HashMap;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{MoneyCents, ResultEngine, expenses, participants, users};

use super::{Engine, with_tx};

/// One participant's slice of an expense, as seen by the payer.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareView {
    pub user_id: i32,
    pub username: String,
    pub amount: MoneyCents,
    pub paid: bool,
}

/// An expense the user paid for, with its live shares.
#[derive(Clone, Debug, PartialEq)]
pub struct PaidExpense {
    pub id: i32,
    pub title: String,
    pub currency: String,
    pub total: MoneyCents,
    pub note: Option<String>,
    /// Even split over the current share count (0 with no shares). Derived
    /// from the same stored data as the per-share amounts, so the two cannot
    /// disagree.
    pub split_amount: MoneyCents,
    pub participants: Vec<ShareView>,
}

/// A share the user owes on someone else's expense.
#[derive(Clone, Debug, PartialEq)]
pub struct OwedShare {
    pub expense_id: i32,
    pub title: String,
    pub currency: String,
    pub payer: String,
    pub amount: MoneyCents,
    pub paid: bool,
    pub note: Option<String>,
}

/// Aggregate balances for one user, recomputed on every request.
#[derive(Clone, Debug, PartialEq)]
pub struct Dashboard {
    pub paid_expenses: Vec<PaidExpense>,
    pub owed_shares: Vec<OwedShare>,
    pub you_are_owed: MoneyCents,
    pub you_owe: MoneyCents,
}

impl Engine {
    /// Derive the two aggregate views for a user.
    ///
    /// Nothing is persisted or cached; correctness over staleness at this
    /// data volume.
    ///
    /// - Paid expenses: expenses the user created, newest first, each with
    ///   its shares ordered by when the participant was added.
    /// - Owed shares: shares the user holds on other people's expenses,
    ///   newest first.
    /// - `you_are_owed` / `you_owe`: sums over the respective unpaid shares.
    pub async fn dashboard(&self, user_id: i32) -> ResultEngine<Dashboard> {
        with_tx!(self, |db_tx| {
            let paid_models: Vec<expenses::Model> = expenses::Entity::find()
                .filter(expenses::Column::PayerId.eq(user_id))
                .order_by_desc(expenses::Column::CreatedAt)
                .order_by_desc(expenses::Column::Id)
                .all(&db_tx)
                .await?;

            let expense_ids: Vec<i32> = paid_models.iter().map(|e| e.id).collect();
            let mut shares_by_expense: HashMap<i32, Vec<ShareView>> = HashMap::new();
            if !expense_ids.is_empty() {
                let rows: Vec<(participants::Model, Option<users::Model>)> =
                    participants::Entity::find()
                        .filter(participants::Column::ExpenseId.is_in(expense_ids))
                        .find_also_related(users::Entity)
                        .order_by_asc(participants::Column::AddedAt)
                        .order_by_asc(participants::Column::Id)
                        .all(&db_tx)
                        .await?;
                for (share, user) in rows {
                    shares_by_expense
                        .entry(share.expense_id)
                        .or_default()
                        .push(ShareView {
                            user_id: share.user_id,
                            username: user.map(|u| u.username).unwrap_or_default(),
                            amount: MoneyCents::new(share.amount_minor),
                            paid: share.paid,
                        });
                }
            }

            let mut you_are_owed = MoneyCents::ZERO;
            let paid_expenses: Vec<PaidExpense> = paid_models
                .into_iter()
                .map(|expense| {
                    let shares = shares_by_expense.remove(&expense.id).unwrap_or_default();
                    for share in &shares {
                        if !share.paid {
                            you_are_owed += share.amount;
                        }
                    }
                    let split_amount = match shares.len() {
                        0 => MoneyCents::ZERO,
                        n => MoneyCents::new(expense.total_minor / n as i64),
                    };
                    PaidExpense {
                        id: expense.id,
                        title: expense.title,
                        currency: expense.currency,
                        total: MoneyCents::new(expense.total_minor),
                        note: expense.note,
                        split_amount,
                        participants: shares,
                    }
                })
                .collect();

            let owed_rows: Vec<(participants::Model, Option<expenses::Model>)> =
                participants::Entity::find()
                    .filter(participants::Column::UserId.eq(user_id))
                    .find_also_related(expenses::Entity)
                    .order_by_desc(participants::Column::AddedAt)
                    .order_by_desc(participants::Column::Id)
                    .all(&db_tx)
                    .await?;

            let payer_ids: Vec<i32> = owed_rows
                .iter()
                .filter_map(|(_, expense)| expense.as_ref().map(|e| e.payer_id))
                .collect();
            let payer_names: HashMap<i32, String> = if payer_ids.is_empty() {
                HashMap::new()
            } else {
                users::Entity::find()
                    .filter(users::Column::Id.is_in(payer_ids))
                    .all(&db_tx)
                    .await?
                    .into_iter()
                    .map(|user| (user.id, user.username))
                    .collect()
            };

            let mut you_owe = MoneyCents::ZERO;
            let mut owed_shares = Vec::new();
            for (share, expense) in owed_rows {
                let Some(expense) = expense else { continue };
                // The payer's own share (if any) is not money owed to someone else.
                if expense.payer_id == user_id {
                    continue;
                }
                let amount = MoneyCents::new(share.amount_minor);
                if !share.paid {
                    you_owe += amount;
                }
                owed_shares.push(OwedShare {
                    expense_id: expense.id,
                    title: expense.title,
                    currency: expense.currency,
                    payer: payer_names
                        .get(&expense.payer_id)
                        .cloned()
                        .unwrap_or_default(),
                    amount,
                    paid: share.paid,
                    note: expense.note,
                });
            }

            Ok(Dashboard {
                paid_expenses,
                owed_shares,
                you_are_owed,
                you_owe,
            })
        })
    }
}
