use rstest::rstest;

use crate::error::AppError;

#[rstest]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::PayloadTooLarge("test".into()), 413, "PAYLOAD_TOO_LARGE")]
#[case(AppError::Database("test".into()), 500, "DATABASE_ERROR")]
#[case(AppError::ExternalService("test".into()), 500, "EXTERNAL_SERVICE_ERROR")]
#[case(AppError::Internal("test".into()), 500, "INTERNAL_ERROR")]
fn test_app_error_status_and_code(
    #[case] error: AppError,
    #[case] status: u16,
    #[case] code: &str,
) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Validation("msg".into())),
        "Validation error: msg"
    );
    assert_eq!(
        format!("{}", AppError::PayloadTooLarge("msg".into())),
        "Payload too large: msg"
    );
    assert_eq!(
        format!("{}", AppError::Database("msg".into())),
        "Database error: msg"
    );
}

#[test]
fn test_client_message_hides_internal_details() {
    assert_eq!(
        AppError::Validation("No data received".into()).client_message(),
        "No data received"
    );
    assert_eq!(
        AppError::Database("connection refused on 10.0.0.3".into()).client_message(),
        "Internal error"
    );
}
