use crate::core::errors::{BfxError, BfxResult};
use std::future::Future;

/// Node-style completion: `(Some(err), None)` or `(None, Some(result))`
pub type LegacyCallback<'a, T> = Box<dyn FnOnce(Option<&BfxError>, Option<&T>) + Send + 'a>;

/// Settle one call.
///
/// The returned result is the awaited outcome; when a legacy callback is
/// supplied it sees the very same error or value before the result is handed
/// back, so both notification paths always agree.
pub fn complete<T>(outcome: BfxResult<T>, callback: Option<LegacyCallback<'_, T>>) -> BfxResult<T> {
    if let Some(callback) = callback {
        match &outcome {
            Ok(result) => callback(None, Some(result)),
            Err(err) => callback(Some(err), None),
        }
    }

    outcome
}

/// Await a pipeline future and settle it through [`complete`]
pub async fn settle<T, F>(future: F, callback: Option<LegacyCallback<'_, T>>) -> BfxResult<T>
where
    F: Future<Output = BfxResult<T>>,
{
    complete(future.await, callback)
}
