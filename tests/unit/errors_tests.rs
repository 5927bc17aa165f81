/*!
 * Tests for error types
 */

use reelcut::errors::ClipError;

#[test]
fn test_validationAbort_display_shouldNameLessonAndCause() {
    let err = ClipError::ValidationAbort {
        lesson: 3,
        title: "Wrap up".to_string(),
        source: Box::new(ClipError::invalid_timestamp("9:99:99:9", "too many fields")),
    };

    let message = err.to_string();
    assert!(message.contains("Lesson 3"));
    assert!(message.contains("Wrap up"));
    assert!(message.contains("9:99:99:9"));
}

#[test]
fn test_rootCause_shouldUnwrapNestedErrors() {
    let err = ClipError::LessonAborted {
        sequence: 4,
        title: "Setup".to_string(),
        completed: 1,
        source: Box::new(ClipError::tool_failure("cut of 04 - Setup.mp4", "No space left on device")),
    };

    assert!(err.to_string().starts_with("Lesson 04"));
    match err.root_cause() {
        ClipError::ExternalToolFailure { diagnostics, .. } => {
            assert_eq!(diagnostics, "No space left on device");
        }
        other => panic!("unexpected root cause: {:?}", other),
    }
}

#[test]
fn test_errors_shouldConvertIntoAnyhow() {
    fn fails() -> anyhow::Result<()> {
        let result: Result<(), ClipError> = Err(ClipError::EmptyBatch);
        result?;
        Ok(())
    }
    assert_eq!(fails().unwrap_err().to_string(), "No lessons were supplied");
}
