//! Custom Test Assertions
//!
//! Assertion helpers for records and timestamps that give more meaningful
//! failure messages than the standard assertions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use subscription_kernel::Record;

/// Asserts that two instants agree to the second
///
/// Stored timestamps carry whole seconds, so values read back from the
/// database only match the in-memory originals at that resolution.
pub fn assert_same_second(actual: DateTime<Utc>, expected: DateTime<Utc>) {
    assert_eq!(
        actual.timestamp(),
        expected.timestamp(),
        "Timestamps differ at second resolution: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a decimal value is approximately equal to another
pub fn assert_decimal_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Decimals differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a record has no tracked changes
pub fn assert_clean<R: Record>(record: &R) {
    let changed: Vec<_> = record.changes().iter().collect();
    assert!(
        changed.is_empty(),
        "Expected a clean {}, found changed columns {:?}",
        R::ENTITY,
        changed
    );
}

/// Asserts that exactly the given columns are tracked as changed
///
/// Order is irrelevant.
pub fn assert_changed_exactly<R: Record>(record: &R, columns: &[&str]) {
    let mut actual: Vec<&str> = record.changes().iter().collect();
    let mut expected: Vec<&str> = columns.to_vec();
    actual.sort_unstable();
    expected.sort_unstable();
    assert_eq!(
        actual,
        expected,
        "Changed columns of {} do not match",
        R::ENTITY
    );
}

/// Asserts that a result is Ok and returns the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Asserts that a result is Err and returns the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!(
                "Expected Err matching {}, got Ok({:?})",
                stringify!($pattern),
                value
            ),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}
