//! Outbound email.
//!
//! SMTP delivery via lettre. When no mail configuration is present the
//! mailer logs what it would have sent and reports success, so registration
//! keeps working in development.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use wanderblog_common::config::MailConfig;
use wanderblog_common::{AppError, AppResult};

/// Email sender.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    public_url: String,
}

impl Mailer {
    /// Create a mailer. `config` absent means delivery is disabled.
    pub fn new(config: Option<&MailConfig>, public_url: &str) -> AppResult<Self> {
        let Some(config) = config else {
            return Ok(Self {
                transport: None,
                from: None,
                public_url: public_url.to_string(),
            });
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Mail(format!("Invalid SMTP relay: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from_address = config.from.as_deref().unwrap_or(&config.username);
        let from: Mailbox = from_address
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: Some(transport),
            from: Some(from),
            public_url: public_url.to_string(),
        })
    }

    /// Whether a transport is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send an HTML email.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            tracing::info!(to, subject, "Mail disabled, skipping delivery");
            return Ok(());
        };

        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::Mail(format!("Invalid recipient: {e}")))?;

        let message = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| AppError::Mail(format!("Failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP send failed: {e}")))?;

        Ok(())
    }

    /// Email the account-verification link.
    pub async fn send_verification(&self, to: &str, username: &str, token: &str) -> AppResult<()> {
        let link = format!("{}/verify?token={token}", self.public_url);
        let html = wrap_html(&format!(
            "<p>Hi {username}!</p>\
            <p>Please verify your account by clicking the button below.</p>\
            <p><a href=\"{link}\" style=\"display:inline-block;padding:12px 24px;background:#28a745;color:#fff;text-decoration:none;border-radius:4px;\">Verify Account</a></p>\
            <p><small>If you didn't create this account, you can safely ignore this email.</small></p>"
        ));

        self.send(to, "Verify your account", &html).await
    }

    /// Email the password-reset link.
    pub async fn send_password_reset(&self, to: &str, username: &str, token: &str) -> AppResult<()> {
        let link = format!("{}/resetPass?token={token}", self.public_url);
        let html = wrap_html(&format!(
            "<p>Hi {username},</p>\
            <p>You requested a password reset for your account.</p>\
            <p><a href=\"{link}\" style=\"display:inline-block;padding:12px 24px;background:#007bff;color:#fff;text-decoration:none;border-radius:4px;\">Reset Password</a></p>\
            <p><small>If you didn't request this, you can safely ignore this email.</small></p>"
        ));

        self.send(to, "Reset your password", &html).await
    }
}

/// Wrap HTML content in a basic email layout.
fn wrap_html(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        a {{ color: #007bff; }}
    </style>
</head>
<body>
    {content}
    <hr style="margin-top: 40px; border: none; border-top: 1px solid #e9ecef;">
    <p style="font-size: 12px; color: #6c757d;">This is an automated message, please do not reply.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_mailer_constructs() {
        let mailer = Mailer::new(None, "https://blog.example.com").unwrap();
        assert!(!mailer.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_mailer_send_succeeds() {
        let mailer = Mailer::new(None, "https://blog.example.com").unwrap();
        mailer
            .send("user@example.com", "Hello", "<p>hi</p>")
            .await
            .unwrap();
    }

    #[test]
    fn test_wrap_html_embeds_content() {
        let html = wrap_html("<p>body here</p>");
        assert!(html.contains("<p>body here</p>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
