use std::sync::OnceLock;

use time::{OffsetDateTime, UtcOffset};

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Captures the local UTC offset. The lookup fails on Unix once other threads exist, so this runs
/// before the async runtime starts; without it, or when the lookup fails, labels are in UTC.
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// Wall clock in the offset captured by `init_local_offset`.
pub fn now() -> OffsetDateTime {
    let offset = LOCAL_OFFSET.get().copied().unwrap_or(UtcOffset::UTC);

    OffsetDateTime::now_utc().to_offset(offset)
}

/// 24-hour `HH:MM:SS` label used by the energy chart and the activity log.
pub fn time_label(at: OffsetDateTime) -> String {
    format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
}
