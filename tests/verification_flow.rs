// End-to-end tests of the verification state machine against the
// in-memory record store, with manually driven clocks for expiry.

use chrono::{Duration, Utc};
use identity_registry::error::RegistryError;
use identity_registry::otp::{ManualClock, OtpStore};
use identity_registry::service::VerificationService;
use identity_registry::storage::{MemoryRecordStore, RecordField, RecordStore};
use identity_registry::types::{
    AadhaarOtpRequest, AadhaarOtpVerifyRequest, AadhaarUniqueRequest, NewRecord, PanOtpRequest,
    PanOtpVerifyRequest,
};
use std::sync::Arc;

const AADHAAR: &str = "234567890124";
const OTHER_AADHAAR: &str = "345678901238";
const PAN: &str = "ABCDE1234F";

fn service_with_clock() -> (VerificationService, Arc<ManualClock>, Arc<MemoryRecordStore>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let records = Arc::new(MemoryRecordStore::new());
    let ttl = Duration::minutes(5);
    let service = VerificationService::with_otp_stores(
        records.clone(),
        OtpStore::with_clock(ttl, clock.clone()),
        OtpStore::with_clock(ttl, clock.clone()),
    );
    (service, clock, records)
}

fn aadhaar_request(aadhaar: &str) -> AadhaarOtpRequest {
    AadhaarOtpRequest {
        aadhaar: Some(aadhaar.to_string()),
        name: Some("Alice Kumar".to_string()),
        consent: Some(true),
    }
}

fn pan_request(pan: &str) -> PanOtpRequest {
    PanOtpRequest {
        pan: Some(pan.to_string()),
        name: Some("Alice Kumar".to_string()),
        email: Some("alice@example.com".to_string()),
    }
}

#[tokio::test]
async fn full_flow_persists_one_record() {
    let (service, _clock, records) = service_with_clock();

    // Aadhaar flow.
    let aadhaar_otp = service
        .request_aadhaar_otp(aadhaar_request(AADHAAR))
        .await
        .expect("aadhaar otp should be issued");
    service
        .verify_aadhaar_otp(AadhaarOtpVerifyRequest {
            aadhaar: Some(AADHAAR.to_string()),
            otp: Some(aadhaar_otp),
        })
        .await
        .expect("aadhaar otp should verify");

    // Nothing persisted yet.
    assert!(!records.exists(RecordField::Aadhaar, AADHAAR).await.unwrap());

    // PAN flow; lowercase input exercises normalization end to end.
    let pan_otp = service
        .request_pan_otp(pan_request("abcde1234f"))
        .await
        .expect("pan otp should be issued");
    let record = service
        .verify_pan_otp(PanOtpVerifyRequest {
            pan: Some("abcde1234f".to_string()),
            otp: Some(pan_otp),
            aadhaar: Some(AADHAAR.to_string()),
            name: Some("Alice Kumar".to_string()),
        })
        .await
        .expect("pan otp should verify and persist");

    assert_eq!(record.name, "Alice Kumar");
    assert_eq!(record.aadhaar_number, AADHAAR);
    assert_eq!(record.pan_number.as_deref(), Some(PAN));
    assert!(records.exists(RecordField::Aadhaar, AADHAAR).await.unwrap());
    assert!(records.exists(RecordField::Pan, PAN).await.unwrap());
}

#[tokio::test]
async fn expired_aadhaar_otp_is_rejected_then_gone() {
    let (service, clock, _records) = service_with_clock();

    let otp = service
        .request_aadhaar_otp(aadhaar_request(AADHAAR))
        .await
        .unwrap();

    clock.advance(Duration::minutes(5) + Duration::seconds(1));

    let err = service
        .verify_aadhaar_otp(AadhaarOtpVerifyRequest {
            aadhaar: Some(AADHAAR.to_string()),
            otp: Some(otp.clone()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::OtpExpired));

    // Expiry consumed the entry; the follow-up is NotFound, not Expired.
    let err = service
        .verify_aadhaar_otp(AadhaarOtpVerifyRequest {
            aadhaar: Some(AADHAAR.to_string()),
            otp: Some(otp),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::OtpNotFound(_)));
}

#[tokio::test]
async fn expired_pan_otp_requires_new_request() {
    let (service, clock, _records) = service_with_clock();

    let otp = service.request_pan_otp(pan_request(PAN)).await.unwrap();
    clock.advance(Duration::minutes(6));

    let err = service
        .verify_pan_otp(PanOtpVerifyRequest {
            pan: Some(PAN.to_string()),
            otp: Some(otp),
            aadhaar: Some(AADHAAR.to_string()),
            name: Some("Alice Kumar".to_string()),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::OtpExpired));

    // A fresh request still works.
    let otp = service.request_pan_otp(pan_request(PAN)).await.unwrap();
    service
        .verify_pan_otp(PanOtpVerifyRequest {
            pan: Some(PAN.to_string()),
            otp: Some(otp),
            aadhaar: Some(AADHAAR.to_string()),
            name: Some("Alice Kumar".to_string()),
        })
        .await
        .expect("second otp should verify");
}

#[tokio::test]
async fn registered_aadhaar_conflicts_on_new_otp_request() {
    let (service, _clock, _records) = service_with_clock();

    service
        .create_record(NewRecord {
            name: Some("Alice Kumar".to_string()),
            aadhaar_number: Some(AADHAAR.to_string()),
            pan_number: None,
        })
        .await
        .unwrap();

    let err = service
        .request_aadhaar_otp(aadhaar_request(AADHAAR))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(_)));

    assert!(service
        .check_aadhaar_unique(AadhaarUniqueRequest {
            aadhaar: Some(AADHAAR.to_string()),
        })
        .await
        .unwrap());

    // A different, valid Aadhaar is unaffected.
    service
        .request_aadhaar_otp(aadhaar_request(OTHER_AADHAAR))
        .await
        .expect("unregistered aadhaar should get an otp");
}

#[tokio::test]
async fn registered_pan_conflicts_on_new_otp_request() {
    let (service, _clock, _records) = service_with_clock();

    let otp = service.request_pan_otp(pan_request(PAN)).await.unwrap();
    service
        .verify_pan_otp(PanOtpVerifyRequest {
            pan: Some(PAN.to_string()),
            otp: Some(otp),
            aadhaar: Some(AADHAAR.to_string()),
            name: Some("Alice Kumar".to_string()),
        })
        .await
        .unwrap();

    let err = service.request_pan_otp(pan_request(PAN)).await.unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_record_creation_fails() {
    let (service, _clock, _records) = service_with_clock();

    let record = NewRecord {
        name: Some("Alice Kumar".to_string()),
        aadhaar_number: Some(AADHAAR.to_string()),
        pan_number: Some(PAN.to_string()),
    };
    service.create_record(record.clone()).await.unwrap();

    let err = service.create_record(record).await.unwrap_err();
    assert!(matches!(err, RegistryError::Persistence(_)));
}

#[tokio::test]
async fn aadhaar_flow_completion_is_not_rechecked_at_persistence() {
    // Current behavior: the PAN step trusts the client-supplied aadhaar and
    // name; no proof of the Aadhaar flow is required before persisting.
    let (service, _clock, _records) = service_with_clock();

    let otp = service.request_pan_otp(pan_request(PAN)).await.unwrap();
    let record = service
        .verify_pan_otp(PanOtpVerifyRequest {
            pan: Some(PAN.to_string()),
            otp: Some(otp),
            aadhaar: Some(OTHER_AADHAAR.to_string()),
            name: Some("Bob Sharma".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(record.aadhaar_number, OTHER_AADHAAR);
    assert_eq!(record.name, "Bob Sharma");
}
