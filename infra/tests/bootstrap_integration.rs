//! Integration tests for wiring the OTP service from configuration

use std::sync::Arc;

use ot_core::repositories::{InMemoryOtpRepository, OtpRepository};
use ot_core::services::otp::{OtpService, OtpServiceConfig};
use ot_infra::config::{AppConfig, StoreBackend};
use ot_infra::email::{EmailServiceAdapter, MockEmailService};
use ot_infra::{create_otp_repository, initialize, InfrastructureError};

#[tokio::test]
async fn test_initialize_development_defaults() {
    let config = AppConfig::development();
    let service = initialize(&config).await.unwrap();

    assert_eq!(service.config().code_length, 6);
    service.generate_and_send("a@x.com", "signup").await.unwrap();
    assert!(!service.validate("a@x.com", "not-a-code", "signup").await.unwrap());
    assert!(!service.validate("a@x.com", "not-a-code", "signup").await.unwrap());
}

#[tokio::test]
async fn test_initialize_rejects_invalid_otp_settings() {
    let mut config = AppConfig::development();
    config.otp.code_length = 0;

    let result = initialize(&config).await;
    assert!(matches!(result, Err(InfrastructureError::Config(_))));
}

#[tokio::test]
async fn test_unreachable_store_urls_are_config_errors() {
    let mut config = AppConfig::development();

    config.otp.store = StoreBackend::Redis;
    config.cache.url = "invalid://url".to_string();
    assert!(matches!(
        create_otp_repository(&config).await,
        Err(InfrastructureError::Config(_))
    ));

    config.otp.store = StoreBackend::Mysql;
    config.database.url = "not a database url".to_string();
    assert!(matches!(
        create_otp_repository(&config).await,
        Err(InfrastructureError::Config(_))
    ));
}

#[tokio::test]
async fn test_full_flow_with_mock_email() {
    let repo = Arc::new(InMemoryOtpRepository::new());
    let mock = Arc::new(MockEmailService::with_options(false, false));
    let service = OtpService::new(
        repo.clone(),
        Arc::new(EmailServiceAdapter::new(mock.clone())),
        OtpServiceConfig::default(),
    );

    service.generate_and_send("a@x.com", "signup").await.unwrap();

    let message = mock.last_message_to("a@x.com").unwrap();
    assert_eq!(message.subject, "Your OTP");
    let code = message.body.trim_start_matches("Your OTP is ").to_string();
    assert_eq!(code.len(), 6);

    assert!(service.validate("a@x.com", &code, "signup").await.unwrap());
    assert!(!service.validate("a@x.com", &code, "signup").await.unwrap());
    assert!(repo
        .find_by_identity_and_purpose("a@x.com", "signup")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_rejected_address_surfaces_delivery_error() {
    let repo = Arc::new(InMemoryOtpRepository::new());
    let mock = Arc::new(MockEmailService::with_options(false, false));
    let service = OtpService::new(
        repo.clone(),
        Arc::new(EmailServiceAdapter::new(mock)),
        OtpServiceConfig {
            revoke_on_delivery_failure: true,
            ..Default::default()
        },
    );

    let err = service
        .generate_and_send("not-an-address", "signup")
        .await
        .unwrap_err();

    assert!(err.is_delivery());
    assert!(repo.is_empty().await);
}
