//! SMTP delivery behind the engine's transport trait.

use engine::{MailError, MailTransport, OutboundMail};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    transport::smtp::authentication::Credentials,
};

use crate::settings;

pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a STARTTLS relay from the `[mail]` settings.
    pub fn new(
        settings: &settings::Mail,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        if let Some(port) = settings.port {
            builder = builder.port(port);
        }

        Ok(Self {
            from: settings.from.parse()?,
            transport: builder.build(),
        })
    }
}

impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        let recipient: Mailbox = mail
            .recipient
            .parse()
            .map_err(|err| MailError(format!("invalid recipient address: {err}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(mail.subject.clone())
            .body(mail.body.clone())
            .map_err(|err| MailError(format!("failed to build message: {err}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| MailError(err.to_string()))?;

        Ok(())
    }
}
