//! Optional collaborator acting on the real system under test.

use std::time::Duration;

/// Hook into whatever drives the system under test (a browser, an API client).
///
/// The machine calls [`Driver::wait_until_settled`] once after every
/// transition action, before verifying the new state. It is a fixed
/// synchronization point, not a retry.
pub trait Driver: Send {
    /// Pause until the system under test has settled, for at most `max_wait`.
    fn wait_until_settled(&mut self, max_wait: Duration);
}

impl<F> Driver for F
where
    F: FnMut(Duration) + Send,
{
    fn wait_until_settled(&mut self, max_wait: Duration) {
        self(max_wait)
    }
}
