//! Mock Email Service Implementation
//!
//! A mock implementation of the email service for development and testing.
//! Messages are logged and kept in an in-memory outbox instead of being sent.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

use ot_shared::email::{is_valid_email, mask_email};

use super::email_service::EmailService;
use crate::InfrastructureError;

/// A message accepted by the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    pub message_id: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mock email service for development and testing
///
/// This implementation:
/// - Validates recipient addresses
/// - Logs each message with the address masked
/// - Keeps every accepted message in an outbox
/// - Can simulate provider failures
#[derive(Clone)]
pub struct MockEmailService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Accepted messages, oldest first
    outbox: Arc<Mutex<Vec<OutboxMessage>>>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to the console
    console_output: bool,
}

impl MockEmailService {
    /// Create a new mock email service that prints messages to the console
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock service with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            outbox: Arc::new(Mutex::new(Vec::new())),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter and clear the outbox
    pub fn reset(&self) {
        self.message_count.store(0, Ordering::SeqCst);
        self.outbox().clear();
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// All accepted messages
    pub fn sent_messages(&self) -> Vec<OutboxMessage> {
        self.outbox().clone()
    }

    /// Most recent message for a recipient
    pub fn last_message_to(&self, to: &str) -> Option<OutboxMessage> {
        self.outbox().iter().rev().find(|m| m.to == to).cloned()
    }

    fn outbox(&self) -> std::sync::MutexGuard<'_, Vec<OutboxMessage>> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<String, InfrastructureError> {
        let masked = mask_email(to);

        if !is_valid_email(to) {
            return Err(InfrastructureError::Email(format!(
                "Invalid email address: {}",
                masked
            )));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!("Mock email service simulating failure for {}", masked);
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK EMAIL SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", to);
            println!("Subject: {}", subject);
            println!("Message ID: {}", message_id);
            println!("{}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "email_service",
            provider = "mock",
            to = %masked,
            message_id = %message_id,
            body_length = body.len(),
            "Email sent successfully (mock)"
        );

        self.outbox().push(OutboxMessage {
            message_id: message_id.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure.load(Ordering::SeqCst)
    }
}
