//! Unit tests for the OTP service

use chrono::{Duration, Utc};
use std::sync::Arc;

use super::mocks::{FailingOtpRepository, MockEmailService, ScriptedCodeGenerator};
use crate::domain::entities::OtpRecord;
use crate::domain::value_objects::OtpKey;
use crate::errors::DomainError;
use crate::repositories::{InMemoryOtpRepository, OtpRepository};
use crate::services::otp::{OtpService, OtpServiceConfig};

const USER: &str = "user@example.com";

type TestService = OtpService<InMemoryOtpRepository, MockEmailService>;

fn create_service(config: OtpServiceConfig) -> (TestService, Arc<InMemoryOtpRepository>, Arc<MockEmailService>) {
    let repo = Arc::new(InMemoryOtpRepository::new());
    let email = Arc::new(MockEmailService::new(false));
    let service = OtpService::new(repo.clone(), email.clone(), config);
    (service, repo, email)
}

fn create_scripted_service(
    codes: &[&str],
    email: MockEmailService,
    config: OtpServiceConfig,
) -> (TestService, Arc<InMemoryOtpRepository>, Arc<MockEmailService>) {
    let repo = Arc::new(InMemoryOtpRepository::new());
    let email = Arc::new(email);
    let service = OtpService::with_generator(
        repo.clone(),
        email.clone(),
        Arc::new(ScriptedCodeGenerator::new(codes)),
        config,
    );
    (service, repo, email)
}

async fn stored(repo: &InMemoryOtpRepository, identity: &str, purpose: &str) -> Option<OtpRecord> {
    repo.get(&OtpKey::new(identity, purpose)).await
}

#[tokio::test]
async fn test_generate_stores_and_sends_code() {
    let (service, repo, email) = create_service(OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();

    let record = stored(&repo, USER, "signup").await.expect("record stored");
    assert_eq!(record.code.len(), 6);
    assert!(record.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(record.expires_at - record.issued_at, Duration::minutes(5));

    let sent = email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, USER);
    assert_eq!(sent[0].subject, "Your OTP");
    assert_eq!(sent[0].body, format!("Your OTP is {}", record.code));
}

#[tokio::test]
async fn test_generate_twice_keeps_only_second_code() {
    let (service, repo, email) =
        create_scripted_service(&["111111", "222222"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send(USER, "login").await.unwrap();
    service.generate_and_send(USER, "login").await.unwrap();

    assert_eq!(repo.len().await, 1);
    assert_eq!(stored(&repo, USER, "login").await.unwrap().code, "222222");
    assert_eq!(email.sent().len(), 2);

    assert!(!service.validate(USER, "111111", "login").await.unwrap());
}

#[tokio::test]
async fn test_second_code_validates_after_regeneration() {
    let (service, _repo, _email) =
        create_scripted_service(&["111111", "222222"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send(USER, "login").await.unwrap();
    service.generate_and_send(USER, "login").await.unwrap();

    assert!(service.validate(USER, "222222", "login").await.unwrap());
}

#[tokio::test]
async fn test_validate_without_record_returns_false() {
    let (service, repo, _email) = create_service(OtpServiceConfig::default());

    assert!(!service.validate(USER, "123456", "signup").await.unwrap());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_validate_correct_code_once() {
    let (service, repo, email) = create_service(OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();
    let code = stored(&repo, USER, "signup").await.unwrap().code;
    assert!(email.last_body().unwrap().contains(&code));

    assert!(service.validate(USER, &code, "signup").await.unwrap());
    assert!(stored(&repo, USER, "signup").await.is_none());
    assert!(!service.validate(USER, &code, "signup").await.unwrap());
}

#[tokio::test]
async fn test_wrong_code_consumes_record() {
    let (service, repo, _email) =
        create_scripted_service(&["042391"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();

    assert!(!service.validate(USER, "000000", "signup").await.unwrap());
    assert!(stored(&repo, USER, "signup").await.is_none());
    assert!(!service.validate(USER, "042391", "signup").await.unwrap());
}

#[tokio::test]
async fn test_expired_code_rejected_and_removed() {
    let (service, repo, _email) = create_service(OtpServiceConfig::default());

    let issued = Utc::now() - Duration::minutes(6);
    repo.insert_raw(OtpRecord::issued_at(USER, "signup", "042391", issued, Duration::minutes(5)))
        .await;

    assert!(!service.validate(USER, "042391", "signup").await.unwrap());
    assert!(stored(&repo, USER, "signup").await.is_none());
}

#[tokio::test]
async fn test_zero_lifetime_code_expires() {
    let config = OtpServiceConfig {
        code_expiration_minutes: 0,
        ..Default::default()
    };
    let (service, repo, _email) = create_scripted_service(&["042391"], MockEmailService::new(false), config);

    service.generate_and_send(USER, "signup").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    assert!(!service.validate(USER, "042391", "signup").await.unwrap());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_leading_zero_code_scenario() {
    let (service, repo, email) =
        create_scripted_service(&["042391"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();

    assert_eq!(email.last_body().unwrap(), "Your OTP is 042391");
    assert!(!service.validate(USER, "42391", "signup").await.unwrap());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_code_is_compared_verbatim() {
    let (service, _repo, _email) =
        create_scripted_service(&["042391", "042391"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();
    assert!(!service.validate(USER, " 042391", "signup").await.unwrap());

    service.generate_and_send(USER, "signup").await.unwrap();
    assert!(service.validate(USER, "042391", "signup").await.unwrap());
}

#[tokio::test]
async fn test_purposes_are_independent() {
    let (service, repo, _email) =
        create_scripted_service(&["111111", "222222"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();
    service.generate_and_send(USER, "reset").await.unwrap();
    assert_eq!(repo.len().await, 2);

    assert!(service.validate(USER, "111111", "signup").await.unwrap());
    assert_eq!(stored(&repo, USER, "reset").await.unwrap().code, "222222");
    assert!(service.validate(USER, "222222", "reset").await.unwrap());
}

#[tokio::test]
async fn test_identities_are_independent() {
    let (service, repo, _email) =
        create_scripted_service(&["111111", "222222"], MockEmailService::new(false), OtpServiceConfig::default());

    service.generate_and_send("a@example.com", "signup").await.unwrap();
    service.generate_and_send("b@example.com", "signup").await.unwrap();

    assert!(!service.validate("a@example.com", "222222", "signup").await.unwrap());
    assert_eq!(stored(&repo, "b@example.com", "signup").await.unwrap().code, "222222");
}

#[tokio::test]
async fn test_delete_otp() {
    let (service, repo, _email) = create_service(OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();
    let code = stored(&repo, USER, "signup").await.unwrap().code;

    service.delete_otp(USER, "signup").await.unwrap();
    assert!(repo.is_empty().await);
    assert!(!service.validate(USER, &code, "signup").await.unwrap());

    // Nothing stored is not an error
    service.delete_otp(USER, "signup").await.unwrap();
}

#[tokio::test]
async fn test_delivery_failure_keeps_record_by_default() {
    let (service, repo, _email) =
        create_scripted_service(&["042391"], MockEmailService::new(true), OtpServiceConfig::default());

    let result = service.generate_and_send(USER, "signup").await;

    assert!(matches!(result, Err(DomainError::Delivery { .. })));
    assert_eq!(stored(&repo, USER, "signup").await.unwrap().code, "042391");
    assert!(service.validate(USER, "042391", "signup").await.unwrap());
}

#[tokio::test]
async fn test_delivery_failure_revokes_when_configured() {
    let config = OtpServiceConfig {
        revoke_on_delivery_failure: true,
        ..Default::default()
    };
    let (service, repo, _email) = create_scripted_service(&["042391"], MockEmailService::new(true), config);

    let result = service.generate_and_send(USER, "signup").await;

    assert!(result.unwrap_err().is_delivery());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_store_failure_propagates_without_sending() {
    let email = Arc::new(MockEmailService::new(false));
    let service = OtpService::new(Arc::new(FailingOtpRepository), email.clone(), OtpServiceConfig::default());

    let result = service.generate_and_send(USER, "signup").await;
    assert!(result.unwrap_err().is_persistence());
    assert!(email.sent().is_empty());

    let result = service.validate(USER, "123456", "signup").await;
    assert!(result.unwrap_err().is_persistence());

    assert!(service.delete_otp(USER, "signup").await.is_err());
}

#[tokio::test]
async fn test_works_behind_trait_objects() {
    let repo: Arc<dyn OtpRepository> = Arc::new(InMemoryOtpRepository::new());
    let email = Arc::new(MockEmailService::new(false));
    let service: OtpService<dyn OtpRepository, MockEmailService> =
        OtpService::new(repo.clone(), email.clone(), OtpServiceConfig::default());

    service.generate_and_send(USER, "signup").await.unwrap();
    let code = repo
        .find_by_identity_and_purpose(USER, "signup")
        .await
        .unwrap()
        .unwrap()
        .code;

    assert!(service.validate(USER, &code, "signup").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generates_leave_one_record() {
    let (service, repo, email) = create_service(OtpServiceConfig::default());
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.generate_and_send(USER, "signup").await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.len().await, 1);
    let code = stored(&repo, USER, "signup").await.unwrap().code;
    assert!(email.sent().iter().any(|m| m.body.ends_with(&code)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validates_accept_once() {
    let (service, _repo, _email) =
        create_scripted_service(&["042391"], MockEmailService::new(false), OtpServiceConfig::default());
    let service = Arc::new(service);

    service.generate_and_send(USER, "signup").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.validate(USER, "042391", "signup").await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
}
