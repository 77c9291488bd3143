use sea_orm::DatabaseConnection;

use crate::{EngineError, Mailer, ResultEngine};

mod balances;
mod expenses;
mod notifications;
mod users;

pub use balances::{Dashboard, OwedShare, PaidExpense, ShareView};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    mailer: Option<Mailer>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Uppercases and validates a currency code (1 to 8 ASCII letters).
fn normalize_currency(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.len() > 8
        || !trimmed.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(EngineError::Validation(format!(
            "invalid currency code: {value}"
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Drops duplicate ids, keeping the first occurrence's position.
fn dedup_preserving_order(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    mailer: Option<Mailer>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass an optional mail queue handle; without one the engine skips the
    /// email side channel entirely.
    pub fn mailer(mut self, mailer: Mailer) -> EngineBuilder {
        self.mailer = Some(mailer);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            mailer: self.mailer,
        })
    }
}
