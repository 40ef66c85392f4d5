use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{debug, warn};

/// Delivers member-facing notifications through an external relay.
///
/// Delivery is strictly best effort: every failure path logs and returns,
/// nothing here may fail the transaction that triggered the notification.
pub struct NotificationService {
    pool: SqlitePool,
    client: reqwest::Client,
    relay_url: Option<String>,
    dojo_name: String,
}

impl NotificationService {
    /// Create a new notification service. With no relay URL configured the
    /// service renders nothing and drops every send.
    pub fn new(pool: SqlitePool, relay_url: Option<String>, dojo_name: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            pool,
            client,
            relay_url,
            dojo_name,
        }
    }

    /// Render a stored template by substituting {{placeholder}} variables
    async fn render(
        &self,
        template_name: &str,
        vars: &[(&str, String)],
    ) -> Option<(String, String)> {
        let row: Option<(String, String)> = match sqlx::query_as(
            "SELECT subject, body FROM notification_templates WHERE name = ?1",
        )
        .bind(template_name)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!("Failed to load notification template {}: {}", template_name, e);
                return None;
            }
        };

        let (mut subject, mut body) = match row {
            Some(t) => t,
            None => {
                warn!("Notification template {} not found", template_name);
                return None;
            }
        };

        for (key, value) in vars {
            let placeholder = format!("{{{{{}}}}}", key);
            subject = subject.replace(&placeholder, value);
            body = body.replace(&placeholder, value);
        }

        Some((subject, body))
    }

    /// Render a template and post it to the relay. Recipients without an
    /// email address are skipped.
    pub async fn send(
        &self,
        recipient: Option<&str>,
        template_name: &str,
        mut vars: Vec<(&'static str, String)>,
    ) {
        let relay_url = match &self.relay_url {
            Some(url) => url,
            None => {
                debug!("Notification relay not configured, dropping {}", template_name);
                return;
            }
        };

        let recipient = match recipient {
            Some(email) if !email.is_empty() => email,
            _ => {
                debug!("No recipient email, dropping {}", template_name);
                return;
            }
        };

        vars.push(("dojo_name", self.dojo_name.clone()));

        let (subject, body) = match self.render(template_name, &vars).await {
            Some(rendered) => rendered,
            None => return,
        };

        let payload = serde_json::json!({
            "to": recipient,
            "subject": subject,
            "body": body,
        });

        match self.client.post(relay_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Sent {} notification to {}", template_name, recipient);
            }
            Ok(response) => {
                warn!(
                    "Notification relay rejected {} for {}: HTTP {}",
                    template_name,
                    recipient,
                    response.status()
                );
            }
            Err(e) => {
                warn!(
                    "Failed to deliver {} notification to {}: {}",
                    template_name, recipient, e
                );
            }
        }
    }
}
