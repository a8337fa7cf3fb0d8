//! Retry handling for transient syscall results
//!
//! "Would block" and "interrupted" are not failures: the same call is issued
//! again with unchanged arguments, immediately, as long as the
//! [`RetryPolicy`] allows it.

use copybench_types::RetryPolicy;
use std::io;
use tracing::trace;

/// Check if an I/O error only asks for the call to be repeated
pub fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Run `op` until it returns something other than a transient error
///
/// When the policy's retry cap is reached the last transient error is
/// returned, annotated with the number of retries.
pub fn retry_transient<T, F>(policy: RetryPolicy, mut op: F) -> io::Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    let mut retries = 0u32;
    loop {
        match op() {
            Err(error) if is_transient(&error) => {
                if !policy.allows(retries) {
                    return Err(io::Error::new(
                        error.kind(),
                        format!("gave up after {} retries: {}", retries, error),
                    ));
                }
                retries += 1;
                trace!("Transient error ({}), retry {}", error, retries);
            }
            other => return other,
        }
    }
}
