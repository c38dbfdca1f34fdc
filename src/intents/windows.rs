// Fixed look-back windows for social post collection.
//
// A post belongs to every window whose [now - seconds, now] interval contains
// its creation time, so a 10-day-old post is evidence for 14d, 60d, 180d and
// 365d alike.

const DAY: i64 = 24 * 3600;

/// Every window label the pipeline understands, with its length in seconds.
pub const KNOWN_WINDOWS: &[(&str, i64)] = &[
    ("14d", 14 * DAY),
    ("60d", 60 * DAY),
    ("180d", 180 * DAY),
    ("365d", 365 * DAY),
];

/// Windows used when the configuration does not name any.
pub const DEFAULT_WINDOW_LABELS: &[&str] = &["14d", "60d", "180d", "365d"];

/// A labelled look-back interval ending at "now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub label: String,
    pub seconds: i64,
}

impl TimeWindow {
    /// Look up a known label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        KNOWN_WINDOWS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(known, seconds)| TimeWindow {
                label: known.to_string(),
                seconds: *seconds,
            })
    }

    /// `(start, end)` unix timestamps for this window ending at `now`.
    pub fn bounds(&self, now: i64) -> (i64, i64) {
        (now - self.seconds, now)
    }

    /// Whether `created` (unix seconds) falls inside the window ending at `now`.
    pub fn contains(&self, created: i64, now: i64) -> bool {
        let (start, end) = self.bounds(now);
        created >= start && created <= end
    }
}

/// Resolve labels to windows, silently dropping unknown ones.
pub fn build_windows<I, S>(labels: I) -> Vec<TimeWindow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| TimeWindow::from_label(label.as_ref()))
        .collect()
}

/// Labels of every window containing `created`.
pub fn windows_containing(created: i64, now: i64, windows: &[TimeWindow]) -> Vec<&str> {
    windows
        .iter()
        .filter(|window| window.contains(created, now))
        .map(|window| window.label.as_str())
        .collect()
}
