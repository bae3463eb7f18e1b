//! Custom assertion utilities for tests.

use chainsim_harness::{TxOutcome, TxStatus};

/// Assert that a result is Ok and return the inner value.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

#[allow(dead_code)]
pub fn assert_err<T: std::fmt::Debug, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> E {
    match result {
        Ok(v) => panic!("{} should have failed but got: {:?}", context, v),
        Err(e) => e,
    }
}

/// Assert that an error message contains expected text, case-insensitively.
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    assert!(
        error_str.contains(&expected_text.to_lowercase()),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

#[allow(dead_code)]
pub fn assert_success(outcome: &TxOutcome, context: &str) {
    assert!(
        outcome.is_success(),
        "{}: expected success, got {} ({:?})",
        context,
        outcome.status,
        outcome.error
    );
}

/// Assert a `fail` outcome whose reason mentions `expected_text`.
#[allow(dead_code)]
pub fn assert_outcome_fails_with(outcome: &TxOutcome, expected_text: &str, context: &str) {
    assert_eq!(
        outcome.status,
        TxStatus::Fail,
        "{}: expected fail, got {} ({:?})",
        context,
        outcome.status,
        outcome.error
    );
    assert!(
        outcome.error_contains(expected_text),
        "{}: failure reason should contain '{}', got: {:?}",
        context,
        expected_text,
        outcome.error
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_ok() {
        let result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(result, "test operation"), 42);
    }

    #[test]
    #[should_panic(expected = "test operation failed")]
    fn test_assert_ok_fails() {
        let result: Result<i32, &str> = Err("error");
        assert_ok(result, "test operation");
    }

    #[test]
    fn test_assert_outcome_fails_with() {
        let outcome = TxOutcome {
            hash: None,
            status: TxStatus::Fail,
            error: Some("lower nonce in transaction".to_string()),
        };
        assert_outcome_fails_with(&outcome, "lower nonce", "rejected transfer");
    }
}
