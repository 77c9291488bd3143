//! Best-effort outbound email.
//!
//! Delivery runs on a bounded worker pool decoupled from request handling:
//! enqueueing never blocks, a full queue drops the message, and transport
//! failures are logged and swallowed. The transaction that triggered the mail
//! has already committed by the time a worker picks it up, so nothing here can
//! roll it back.

use std::{fmt, sync::Arc};

use thiserror::Error;
use tokio::{sync::mpsc, task::JoinSet};

/// A single outbound message.
#[derive(Clone, Debug)]
pub struct OutboundMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Transport failure reported by a [`MailTransport`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MailError(pub String);

/// Narrow delivery interface.
///
/// SMTP mechanics (host/port/TLS/credentials) live behind this trait; the
/// engine only ever hands over recipient, subject and body.
pub trait MailTransport: Send + Sync + 'static {
    fn send(
        &self,
        mail: &OutboundMail,
    ) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Cheap handle for enqueueing mail, cloned into the engine.
#[derive(Clone)]
pub struct Mailer {
    sender: mpsc::Sender<OutboundMail>,
}

impl Mailer {
    /// Queues a message without waiting.
    ///
    /// A full or closed queue drops the message with a warning; the caller
    /// never observes an error.
    pub fn enqueue(&self, mail: OutboundMail) {
        if let Err(err) = self.sender.try_send(mail) {
            tracing::warn!("dropping outbound mail: {err}");
        }
    }
}

impl fmt::Debug for Mailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailer").finish_non_exhaustive()
    }
}

/// The worker pool draining the mail queue.
///
/// Must be spawned from within a tokio runtime.
pub struct MailQueue {
    workers: JoinSet<()>,
}

impl MailQueue {
    /// Starts `workers` tasks sharing a queue of `capacity` slots and returns
    /// the enqueue handle alongside the pool.
    pub fn spawn<T: MailTransport>(
        transport: T,
        workers: usize,
        capacity: usize,
    ) -> (Mailer, MailQueue) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let transport = Arc::new(transport);

        let mut set = JoinSet::new();
        for _ in 0..workers.max(1) {
            let receiver = Arc::clone(&receiver);
            let transport = Arc::clone(&transport);
            set.spawn(async move {
                loop {
                    let mail = { receiver.lock().await.recv().await };
                    let Some(mail) = mail else { break };
                    if let Err(err) = transport.send(&mail).await {
                        tracing::warn!(recipient = %mail.recipient, "mail delivery failed: {err}");
                    }
                }
            });
        }

        (Mailer { sender }, MailQueue { workers: set })
    }

    /// Waits for the workers to finish.
    ///
    /// The queue drains once every [`Mailer`] handle has been dropped; call
    /// this during shutdown after tearing down whatever holds the handle.
    pub async fn drain(mut self) {
        while self.workers.join_next().await.is_some() {}
    }

    /// Aborts the workers without waiting for pending mail.
    pub async fn shutdown(mut self) {
        self.workers.shutdown().await;
    }
}
