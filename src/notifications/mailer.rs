//! Fire-and-forget email dispatch.
//!
//! Handlers enqueue an `OutboundEmail` on an in-process channel and return
//! immediately; a spawned worker owns the SMTP transport and drains the
//! channel. Delivery failures are logged and swallowed, never surfaced to the
//! request that queued the message.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::mpsc;

use crate::config::Config;

pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Clonable handle to the outbound notification channel. Sending never blocks
/// and never fails the caller.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<OutboundEmail>,
}

impl Notifier {
    #[cfg(test)]
    pub(crate) fn from_sender(tx: mpsc::UnboundedSender<OutboundEmail>) -> Self {
        Self { tx }
    }

    pub fn send(&self, email: OutboundEmail) {
        if self.tx.send(email).is_err() {
            tracing::warn!("mailer worker is gone; dropping notification");
        }
    }
}

struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    logo: Option<Vec<u8>>,
}

/// Builds the SMTP transport from config and spawns the worker that consumes
/// the channel. Returns the handle the request path uses to enqueue.
pub fn start_mailer(config: &Config) -> Notifier {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundEmail>();

    let mailer = match Mailer::from_config(config) {
        Ok(mailer) => mailer,
        Err(err) => {
            // Mail misconfiguration must not take the server down; the worker
            // just drains and drops.
            tracing::error!(error = %err, "failed to build SMTP transport; notifications disabled");
            tokio::spawn(async move {
                while let Some(email) = rx.recv().await {
                    tracing::warn!(to = %email.to, subject = %email.subject, "dropping notification: mailer disabled");
                }
            });
            return Notifier { tx };
        }
    };

    tokio::spawn(async move {
        tracing::info!("mailer worker started");
        while let Some(email) = rx.recv().await {
            let to = email.to.clone();
            let subject = email.subject.clone();
            match mailer.deliver(email).await {
                Ok(()) => tracing::info!(to = %to, subject = %subject, "notification sent"),
                Err(err) => {
                    tracing::warn!(to = %to, subject = %subject, error = %err, "notification failed")
                }
            }
        }
    });

    Notifier { tx }
}

type DynError = Box<dyn std::error::Error + Send + Sync>;

impl Mailer {
    fn from_config(config: &Config) -> Result<Self, DynError> {
        let mut builder = if config.mail_use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.mail_server)?
        } else if config.mail_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.mail_server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.mail_server)
        };
        builder = builder.port(config.mail_port);

        if let (Some(user), Some(pass)) = (&config.mail_username, &config.mail_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from_address = config
            .mail_username
            .clone()
            .unwrap_or_else(|| "noreply@localhost".to_string());
        let from = format!("{} <{}>", config.mail_from_name, from_address);

        // The logo referenced by templates via cid:life_logo. Missing file
        // just means emails go out without the inline image.
        let logo_path = config.static_folder.join("life_logo.png");
        let logo = std::fs::read(&logo_path)
            .map_err(|err| {
                tracing::warn!(path = %logo_path.display(), error = %err, "logo not found; emails go out without it");
                err
            })
            .ok();

        Ok(Self {
            transport: builder.build(),
            from,
            logo,
        })
    }

    async fn deliver(&self, email: OutboundEmail) -> Result<(), DynError> {
        let html_part = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(email.html);

        let builder = Message::builder()
            .from(self.from.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject);

        let message = match &self.logo {
            Some(bytes) => builder.multipart(
                MultiPart::related()
                    .singlepart(html_part)
                    .singlepart(
                        Attachment::new_inline("life_logo".to_string())
                            .body(bytes.clone(), ContentType::parse("image/png")?),
                    ),
            )?,
            None => builder.multipart(MultiPart::alternative().singlepart(html_part))?,
        };

        self.transport.send(message).await?;
        Ok(())
    }
}
