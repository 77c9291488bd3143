//! Expenses table.
//!
//! An expense is owned by its payer and split across zero or more participant
//! shares. `total_minor` is the full amount in integer cents; the per-share
//! amounts live in `expense_participants` and are stored, not derived at read
//! time.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub currency: String,
    pub total_minor: i64,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
    pub payer_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PayerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Payer,
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payer.def()
    }
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
