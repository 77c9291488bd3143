use chrono::Utc;

use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{EngineError, MoneyCents, ResultEngine, notifications, participants};

use super::{Engine, with_tx};

impl Engine {
    /// Insert one unread notification for a user.
    pub async fn notify(&self, user_id: i32, message: &str) -> ResultEngine<()> {
        notifications::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            message: ActiveValue::Set(message.to_string()),
            read: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.database)
        .await?;

        Ok(())
    }

    /// Fetch a user's unread notifications, oldest first, and mark them read.
    ///
    /// Fetch and mark happen in the same transaction; each notification is
    /// returned exactly once across successive calls. No unread rows is an
    /// empty result, not an error.
    pub async fn drain_unread(&self, user_id: i32) -> ResultEngine<Vec<notifications::Model>> {
        with_tx!(self, |db_tx| {
            let unread: Vec<notifications::Model> = notifications::Entity::find()
                .filter(notifications::Column::UserId.eq(user_id))
                .filter(notifications::Column::Read.eq(false))
                .order_by_asc(notifications::Column::CreatedAt)
                .order_by_asc(notifications::Column::Id)
                .all(&db_tx)
                .await?;

            if !unread.is_empty() {
                let ids: Vec<i32> = unread.iter().map(|n| n.id).collect();
                notifications::Entity::update_many()
                    .col_expr(notifications::Column::Read, Expr::value(true))
                    .filter(notifications::Column::Id.is_in(ids))
                    .exec(&db_tx)
                    .await?;
            }

            Ok(unread)
        })
    }

    /// Create one payment reminder per participant share, skipping the
    /// payer's own share.
    ///
    /// Authorization: only the payer may send reminders. Returns how many
    /// notifications were created.
    pub async fn remind_participants(
        &self,
        expense_id: i32,
        user_id: i32,
    ) -> ResultEngine<usize> {
        with_tx!(self, |db_tx| {
            let expense = self.require_expense(&db_tx, expense_id).await?;
            if expense.payer_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the payer may send reminders".to_string(),
                ));
            }

            let shares: Vec<participants::Model> = participants::Entity::find()
                .filter(participants::Column::ExpenseId.eq(expense_id))
                .order_by_asc(participants::Column::AddedAt)
                .order_by_asc(participants::Column::Id)
                .all(&db_tx)
                .await?;

            let now = Utc::now();
            let mut created = 0;
            for share in shares {
                if share.user_id == expense.payer_id {
                    continue;
                }
                let message = format!(
                    "Reminder: please settle your share for '{}': {} {}.",
                    expense.title,
                    MoneyCents::new(share.amount_minor),
                    expense.currency,
                );
                notifications::ActiveModel {
                    user_id: ActiveValue::Set(share.user_id),
                    message: ActiveValue::Set(message),
                    read: ActiveValue::Set(false),
                    created_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;
                created += 1;
            }

            Ok(created)
        })
    }
}
