//! Core ledger for the shared-expense tracker.
//!
//! The engine owns the data model (users, expenses, participant shares,
//! notifications), the split arithmetic, and every mutation of the store.
//! HTTP, sessions and rendering live above it; SMTP lives behind
//! [`MailTransport`]. All collaborators are injected through the builder, the
//! engine reaches for no globals.

pub use commands::{CreateExpenseCmd, UpdateExpenseCmd};
pub use error::EngineError;
pub use mail::{MailError, MailQueue, MailTransport, Mailer, OutboundMail};
pub use money::MoneyCents;
pub use ops::{Dashboard, Engine, EngineBuilder, OwedShare, PaidExpense, ShareView};

mod commands;
mod error;
pub mod expenses;
mod mail;
mod money;
pub mod notifications;
mod ops;
pub mod participants;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
