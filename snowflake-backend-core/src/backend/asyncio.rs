use std::env;

use crate::error::Error;

/// Setting this variable (to any value) disables the async-context check.
pub const ALLOW_ASYNC_UNSAFE_ENV: &str = "SNOWFLAKE_BACKEND_ALLOW_ASYNC_UNSAFE";

/// Refuses to continue when the current thread has entered an async runtime.
///
/// Blocking driver calls would stall the executor. Threads of the runtime's
/// blocking pool count as entered as well; run the call from a plain thread.
pub fn async_unsafe(operation: &'static str) -> Result<(), Error> {
    if tokio::runtime::Handle::try_current().is_err() {
        return Ok(());
    }

    if env::var_os(ALLOW_ASYNC_UNSAFE_ENV).is_some() {
        log::warn!("`{}` called from an async context", operation);
        return Ok(());
    }

    Err(Error::SynchronousOnly(operation))
}
