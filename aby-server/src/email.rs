//! OTP mail delivery

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use crate::config::{Config, MailTransport};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone)]
pub enum Mailer {
    Ses { client: SesClient, from: String },
    /// Writes codes to the log instead of sending them
    Log,
}

impl Mailer {
    pub async fn from_config(config: &Config) -> Self {
        match config.mail_transport {
            MailTransport::Ses => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let aws_config = match std::env::var("SES_REGION") {
                    Ok(region) => aws_config
                        .to_builder()
                        .region(aws_config::Region::new(region))
                        .build(),
                    Err(_) => aws_config,
                };
                Mailer::Ses {
                    client: SesClient::new(&aws_config),
                    from: config.ses_from_email.clone(),
                }
            }
            MailTransport::Log => Mailer::Log,
        }
    }

    pub async fn send_login_code(&self, to: &str, code: &str, ttl_secs: u64) -> Result<(), BoxError> {
        let minutes = ttl_secs.div_ceil(60);
        match self {
            Mailer::Ses { client, from } => {
                let subject = Content::builder()
                    .data("Your ABY HR verification code")
                    .build()?;

                let body_text = format!(
                    "Your admin login verification code is: {code}\n\
                     It is valid for {minutes} minutes.\n\n\
                     If you did not try to sign in, change your password."
                );

                let body = Body::builder()
                    .text(Content::builder().data(body_text).build()?)
                    .build();

                let message = Message::builder().subject(subject).body(body).build();

                client
                    .send_email()
                    .from_email_address(from)
                    .destination(Destination::builder().to_addresses(to).build())
                    .content(EmailContent::builder().simple(message).build())
                    .send()
                    .await?;

                tracing::info!(to = to, "Login code sent");
            }
            Mailer::Log => {
                tracing::warn!(to = to, code = code, minutes, "Login code (log transport)");
            }
        }
        Ok(())
    }
}
