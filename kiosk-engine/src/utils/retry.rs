//! Single retry for idempotent store reads
//!
//! Writes never go through here: retrying an append could record the same
//! scan or party twice.

use crate::store::StoreResult;

pub fn retry_read<T>(operation: &'static str, mut read: impl FnMut() -> StoreResult<T>) -> StoreResult<T> {
    match read() {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(operation, error = %err, "Store read failed, retrying once");
            read()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::time::Duration;

    fn busy() -> StoreError {
        StoreError::LockTimeout(Duration::from_millis(1))
    }

    #[test]
    fn test_second_attempt_succeeds() {
        let mut calls = 0;
        let result = retry_read("test", || {
            calls += 1;
            if calls == 1 { Err(busy()) } else { Ok(7) }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_gives_up_after_one_retry() {
        let mut calls = 0;
        let result: StoreResult<()> = retry_read("test", || {
            calls += 1;
            Err(busy())
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
