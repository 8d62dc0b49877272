//! Email service.
//!
//! Best-effort SMTP delivery via lettre. When no SMTP host is configured
//! the service is disabled and every send is a logged no-op, which keeps
//! local development free of mail infrastructure.

use examdesk_common::{AppError, AppResult, Config};
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Email service for outgoing notifications.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    app_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    pub fn new(config: &Config) -> AppResult<Self> {
        let from = config
            .email
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AppError::Email(format!("Invalid from address: {e}")))?;

        let transport = if config.email.host.is_empty() {
            None
        } else {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.email.host)
                    .map_err(|e| AppError::Email(format!("Invalid SMTP relay: {e}")))?
                    .port(config.email.port);

            if let (Some(username), Some(password)) =
                (&config.email.username, &config.email.password)
            {
                builder = builder.credentials(Credentials::new(
                    username.clone(),
                    password.clone(),
                ));
            }

            Some(builder.build())
        };

        Ok(Self {
            transport,
            from,
            app_url: config.server.url.clone(),
        })
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> AppResult<()> {
        let Some(transport) = &self.transport else {
            tracing::debug!(to, subject, "Email transport disabled, skipping send");
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| AppError::Email(format!("Invalid recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| AppError::Email(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(e.to_string()))?;

        Ok(())
    }

    /// Notify a student that their complaint's status changed.
    pub async fn send_status_update(
        &self,
        to: &str,
        exam_name: &str,
        new_status: &str,
        complaint_id: &str,
    ) -> AppResult<()> {
        let view_link = format!("{}/complaints/{complaint_id}", self.app_url);
        let html = format!(
            "<h2>Complaint Status Updated</h2>\
             <p>Your complaint regarding <strong>{exam_name}</strong> has been \
             moved to <strong>{new_status}</strong>.</p>\
             <a href=\"{view_link}\">View Complaint Details</a>"
        );
        self.send(to, "Complaint Status Updated", html).await
    }

    /// Notify a student that an admin replied to their complaint.
    pub async fn send_response_notification(
        &self,
        to: &str,
        exam_name: &str,
        response_text: &str,
        admin_name: &str,
        complaint_id: &str,
    ) -> AppResult<()> {
        let view_link = format!("{}/complaints/{complaint_id}", self.app_url);
        let html = format!(
            "<h2>New Response to Your Complaint</h2>\
             <p>Your complaint regarding <strong>{exam_name}</strong> has received \
             a new response.</p>\
             <div style=\"background: #f3f4f6; padding: 15px; border-radius: 8px;\">\
             <p style=\"margin: 0; color: #4b5563; font-style: italic;\">{response_text}</p>\
             </div>\
             <p>Response by: <strong>{admin_name}</strong></p>\
             <a href=\"{view_link}\">View Complaint Details</a>"
        );
        self.send(
            to,
            &format!("New Response to Your {exam_name} Complaint"),
            html,
        )
        .await
    }

    /// Send a password-reset link.
    pub async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
        user_id: &str,
    ) -> AppResult<()> {
        let reset_url = format!(
            "{}/reset-password?token={}&userId={}",
            self.app_url,
            urlencoding::encode(token),
            urlencoding::encode(user_id)
        );
        let html = format!(
            "<h2>Reset Your Password</h2>\
             <p>Click the link below to reset your password:</p>\
             <a href=\"{reset_url}\">Reset Password</a>\
             <p>If you did not request this, please ignore this email.</p>"
        );
        self.send(to, "Reset Your Password", html).await
    }
}
