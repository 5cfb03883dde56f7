use std::error::Error;
use studysync_core::errors::{StudyError, StudyResult};

#[test]
fn test_study_error_display() {
    let not_found = StudyError::NotFound("Session not found".to_string());
    let validation = StudyError::Validation("Invalid start_at".to_string());
    let authentication = StudyError::Authentication("Unauthorized".to_string());
    let authorization = StudyError::Authorization("Not the session creator".to_string());
    let unsupported = StudyError::Unsupported("/api/my/sessions".to_string());
    let backend = StudyError::Backend(eyre::eyre!("connection refused"));

    assert_eq!(not_found.to_string(), "Resource not found: Session not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid start_at");
    assert_eq!(authentication.to_string(), "Authentication error: Unauthorized");
    assert_eq!(
        authorization.to_string(),
        "Authorization error: Not the session creator"
    );
    assert_eq!(
        unsupported.to_string(),
        "Endpoint not supported: /api/my/sessions"
    );
    assert!(backend.to_string().contains("Backend error:"));
}

#[test]
fn test_only_unsupported_is_unsupported() {
    assert!(StudyError::Unsupported("x".to_string()).is_unsupported());
    assert!(!StudyError::NotFound("x".to_string()).is_unsupported());
    assert!(!StudyError::Backend(eyre::eyre!("x")).is_unsupported());
}

#[test]
fn test_internal_error_keeps_source() {
    let io_error = std::io::Error::other("socket closed");
    let study_error = StudyError::Internal(Box::new(io_error));

    assert!(study_error.source().is_some());
    assert!(study_error.to_string().contains("socket closed"));
}

#[test]
fn test_eyre_report_converts_with_question_mark() {
    fn fails() -> StudyResult<()> {
        Err::<(), _>(eyre::eyre!("upstream 502"))?;
        Ok(())
    }

    let err = fails().unwrap_err();
    assert!(matches!(err, StudyError::Backend(_)));
    assert!(err.to_string().contains("upstream 502"));
}
