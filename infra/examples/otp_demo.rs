//! Example issuing and checking a passcode with the configured backends
//!
//! With no configuration this uses the in-memory store and the mock email
//! provider, which prints the message to the console.
//!
//! Run with: cargo run -p ot_infra --example otp_demo -- alice@example.com 042391

use ot_infra::{initialize, load_config};
use ot_shared::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_tracing(&config.logging)?;

    let mut args = std::env::args().skip(1);
    let identity = args.next().unwrap_or_else(|| "alice@example.com".to_string());
    let guess = args.next().unwrap_or_else(|| "000000".to_string());

    let service = initialize(&config).await?;

    println!("Sending a passcode to {}", identity);
    service.generate_and_send(&identity, "signup").await?;

    let accepted = service.validate(&identity, &guess, "signup").await?;
    println!("Code {} accepted: {}", guess, accepted);

    // The record was consumed by the attempt above
    let again = service.validate(&identity, &guess, "signup").await?;
    println!("Second attempt accepted: {}", again);

    Ok(())
}
