use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleeps for `duration` unless `stop` fires first.
/// Returns `true` when the full duration elapsed.
pub async fn pause(stop: &CancellationToken, duration: Duration) -> bool {
    if stop.is_cancelled() {
        return false;
    }
    tokio::select! {
        _ = stop.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// `3723s` -> `1h 2m 3s`; zero components are skipped.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3_600, (total % 3_600) / 60, total % 60);
    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
