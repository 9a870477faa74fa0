mod message_queue;

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Poll `condition` until it holds or `limit` elapses
pub(crate) async fn wait_until(limit: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }
    condition()
}
