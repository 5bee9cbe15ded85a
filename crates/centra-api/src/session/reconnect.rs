// One-shot re-authentication around an authenticated operation.

use std::future::Future;

use tracing::warn;

use crate::error::Error;

/// Run `op`; on an authentication error, re-authenticate once and run it
/// again.
///
/// `eligible` must only be true when the previous authentication attempt
/// succeeded and auto-reconnect is enabled. Otherwise wrong credentials
/// would loop forever. The retry's outcome is returned as-is, so a second
/// authentication failure propagates.
pub async fn retry_once<T, Op, OpFut, Reauth, ReauthFut>(
    eligible: bool,
    mut op: Op,
    reauthenticate: Reauth,
) -> Result<T, Error>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, Error>>,
    Reauth: FnOnce() -> ReauthFut,
    ReauthFut: Future<Output = Result<(), Error>>,
{
    match op().await {
        Err(err) if eligible && err.is_authentication() => {
            warn!(error = %err, "request rejected as unauthenticated, re-authenticating once");
            reauthenticate().await?;
            op().await
        }
        result => result,
    }
}
