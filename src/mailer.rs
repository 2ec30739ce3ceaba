use std::sync::Arc;

use axum::async_trait;
use tracing::{error, info};

/// Outbound-mail collaborator. Registration enqueues a welcome message and
/// never waits on (or fails with) delivery.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Default mailer: writes the outbound message to the log. Deployments with
/// a real relay swap in their own `Mailer` implementation at wiring time.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        info!(from = %self.from, %to, %subject, %body, "outbound mail");
        Ok(())
    }
}

/// Fire-and-forget welcome mail for a newly registered user. Failures are
/// logged; the committed registration is unaffected.
pub fn dispatch_welcome(mailer: Arc<dyn Mailer>, email: String) {
    tokio::spawn(async move {
        let body = format!(
            "Thanks for registering with the Stock Portfolio App, {email}! \
             You can now log in and start tracking your holdings."
        );
        if let Err(e) = mailer
            .send(&email, "Welcome to the Stock Portfolio App", &body)
            .await
        {
            error!(error = %e, %email, "welcome mail dispatch failed");
        }
    });
}
