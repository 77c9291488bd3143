use std::collections::{HashMap, HashSet};

use chrono::Utc;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    CreateExpenseCmd, EngineError, MoneyCents, OutboundMail, ResultEngine, UpdateExpenseCmd,
    expenses, participants, users,
};

use super::{
    Engine, dedup_preserving_order, normalize_currency, normalize_optional_text,
    normalize_required_text, with_tx,
};

impl Engine {
    /// Create an expense and split its total evenly across the participants.
    ///
    /// Duplicate participant ids collapse to one share each; the split follows
    /// the largest-remainder rule of [`MoneyCents::split_even`], so the share
    /// amounts always sum back to the total. An empty participant list yields
    /// an expense with no shares.
    ///
    /// After the transaction commits, one informational email per participant
    /// is queued on the mail side channel. Delivery is best-effort and cannot
    /// affect the already-committed expense.
    pub async fn create_expense(&self, cmd: CreateExpenseCmd) -> ResultEngine<expenses::Model> {
        let title = normalize_required_text(&cmd.title, "title")?;
        let currency = normalize_currency(&cmd.currency)?;
        let note = normalize_optional_text(cmd.note.as_deref());
        if !cmd.total.is_positive() {
            return Err(EngineError::Validation(
                "total amount must be > 0".to_string(),
            ));
        }
        let participant_ids = dedup_preserving_order(&cmd.participant_user_ids);

        let result: ResultEngine<(expenses::Model, Vec<OutboundMail>)> = with_tx!(self, |db_tx| {
            users::Entity::find_by_id(cmd.payer_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("user not exists".to_string()))?;

            let now = Utc::now();
            let expense = expenses::ActiveModel {
                title: ActiveValue::Set(title.clone()),
                currency: ActiveValue::Set(currency.clone()),
                total_minor: ActiveValue::Set(cmd.total.cents()),
                note: ActiveValue::Set(note.clone()),
                created_at: ActiveValue::Set(now),
                payer_id: ActiveValue::Set(cmd.payer_id),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;

            let members = self
                .require_participant_users(&db_tx, &participant_ids)
                .await?;
            let shares = cmd.total.split_even(members.len());

            let mut mails = Vec::with_capacity(members.len());
            for (member, amount) in members.iter().zip(&shares) {
                participants::ActiveModel {
                    expense_id: ActiveValue::Set(expense.id),
                    user_id: ActiveValue::Set(member.id),
                    amount_minor: ActiveValue::Set(amount.cents()),
                    paid: ActiveValue::Set(false),
                    added_at: ActiveValue::Set(now),
                    ..Default::default()
                }
                .insert(&db_tx)
                .await?;

                mails.push(added_to_expense_mail(member, &expense));
            }

            Ok((expense, mails))
        });
        let (expense, mails) = result?;

        if let Some(mailer) = &self.mailer {
            for mail in mails {
                mailer.enqueue(mail);
            }
        }

        Ok(expense)
    }

    /// Update an expense's fields and reconcile its participant set.
    ///
    /// Authorization: only the payer may update.
    ///
    /// The split is recomputed over the new participant count. Shares for
    /// users staying in the set keep their row (and paid flag) but get the new
    /// amount; new users get fresh unpaid shares; users no longer listed lose
    /// their share. Everything happens in one transaction, so a failure
    /// midway leaves the old state untouched.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<()> {
        let title = normalize_required_text(&cmd.title, "title")?;
        let currency = normalize_currency(&cmd.currency)?;
        let note = normalize_optional_text(cmd.note.as_deref());
        if !cmd.total.is_positive() {
            return Err(EngineError::Validation(
                "total amount must be > 0".to_string(),
            ));
        }
        let participant_ids = dedup_preserving_order(&cmd.participant_user_ids);

        with_tx!(self, |db_tx| {
            let expense = self.require_expense(&db_tx, cmd.expense_id).await?;
            if expense.payer_id != cmd.user_id {
                return Err(EngineError::Forbidden(
                    "only the payer may update this expense".to_string(),
                ));
            }

            expenses::ActiveModel {
                id: ActiveValue::Set(expense.id),
                title: ActiveValue::Set(title.clone()),
                currency: ActiveValue::Set(currency.clone()),
                total_minor: ActiveValue::Set(cmd.total.cents()),
                note: ActiveValue::Set(note.clone()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            let members = self
                .require_participant_users(&db_tx, &participant_ids)
                .await?;
            let shares = cmd.total.split_even(members.len());

            let existing: Vec<participants::Model> = participants::Entity::find()
                .filter(participants::Column::ExpenseId.eq(expense.id))
                .all(&db_tx)
                .await?;
            let existing_by_user: HashMap<i32, &participants::Model> =
                existing.iter().map(|share| (share.user_id, share)).collect();

            let now = Utc::now();
            for (member, amount) in members.iter().zip(&shares) {
                match existing_by_user.get(&member.id) {
                    Some(share) => {
                        // Overwrite the amount; the paid flag stays as it is.
                        participants::ActiveModel {
                            id: ActiveValue::Set(share.id),
                            amount_minor: ActiveValue::Set(amount.cents()),
                            ..Default::default()
                        }
                        .update(&db_tx)
                        .await?;
                    }
                    None => {
                        participants::ActiveModel {
                            expense_id: ActiveValue::Set(expense.id),
                            user_id: ActiveValue::Set(member.id),
                            amount_minor: ActiveValue::Set(amount.cents()),
                            paid: ActiveValue::Set(false),
                            added_at: ActiveValue::Set(now),
                            ..Default::default()
                        }
                        .insert(&db_tx)
                        .await?;
                    }
                }
            }

            let keep: HashSet<i32> = members.iter().map(|member| member.id).collect();
            for share in &existing {
                if !keep.contains(&share.user_id) {
                    participants::Entity::delete_by_id(share.id)
                        .exec(&db_tx)
                        .await?;
                }
            }

            Ok(())
        })
    }

    /// Delete an expense and all its shares.
    ///
    /// Authorization: only the payer may delete.
    pub async fn delete_expense(&self, expense_id: i32, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let expense = self.require_expense(&db_tx, expense_id).await?;
            if expense.payer_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the payer may delete this expense".to_string(),
                ));
            }

            participants::Entity::delete_many()
                .filter(participants::Column::ExpenseId.eq(expense_id))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense_id)
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }

    /// Mark the requester's share of an expense as paid.
    ///
    /// Idempotent: marking an already-paid share again succeeds without
    /// touching the row.
    pub async fn mark_paid(&self, expense_id: i32, user_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let share = participants::Entity::find()
                .filter(participants::Column::ExpenseId.eq(expense_id))
                .filter(participants::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("share not exists".to_string()))?;

            if share.paid {
                return Ok(());
            }

            participants::ActiveModel {
                id: ActiveValue::Set(share.id),
                paid: ActiveValue::Set(true),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;

            Ok(())
        })
    }

    /// Return an expense with its current participant user ids.
    ///
    /// Authorization: only the payer may read the edit view.
    pub async fn expense(
        &self,
        expense_id: i32,
        user_id: i32,
    ) -> ResultEngine<(expenses::Model, Vec<i32>)> {
        with_tx!(self, |db_tx| {
            let expense = self.require_expense(&db_tx, expense_id).await?;
            if expense.payer_id != user_id {
                return Err(EngineError::Forbidden(
                    "only the payer may view this expense".to_string(),
                ));
            }

            let participant_ids = participants::Entity::find()
                .filter(participants::Column::ExpenseId.eq(expense_id))
                .order_by_asc(participants::Column::AddedAt)
                .order_by_asc(participants::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|share| share.user_id)
                .collect();

            Ok((expense, participant_ids))
        })
    }

    pub(super) async fn require_expense(
        &self,
        db: &DatabaseTransaction,
        expense_id: i32,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("expense not exists".to_string()))
    }

    /// Load the users behind `ids`, preserving the given order.
    ///
    /// Fails with `NotFound` if any id has no user row.
    async fn require_participant_users(
        &self,
        db: &DatabaseTransaction,
        ids: &[i32],
    ) -> ResultEngine<Vec<users::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: HashMap<i32, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        ids.iter()
            .map(|id| {
                found
                    .get(id)
                    .cloned()
                    .ok_or_else(|| EngineError::NotFound("user not exists".to_string()))
            })
            .collect()
    }
}

fn added_to_expense_mail(member: &users::Model, expense: &expenses::Model) -> OutboundMail {
    OutboundMail {
        recipient: member.email.clone(),
        subject: format!("{} added", expense.title),
        body: format!(
            "Hi {},\n\nYou have been added to the expense '{}' worth {} {}.\nNote: {}\n\nCheck your dashboard for details.",
            member.username,
            expense.title,
            MoneyCents::new(expense.total_minor),
            expense.currency,
            expense.note.as_deref().unwrap_or("-"),
        ),
    }
}
