// Structural vs. temporal classification from per-window evidence.
//
//   recent    = count(14d) + count(60d)
//   long_term = count(180d) + count(365d)
//
// structural: long_term > 0, recent > 0 and evidence in >= 2 windows
// temporal:   recent > 0 and long_term == 0
// otherwise:  structural iff long_term >= recent (exact ties are structural)

use std::collections::BTreeMap;

use crate::models::IntentClass;

pub const RECENT_WINDOWS: &[&str] = &["14d", "60d"];
pub const LONG_TERM_WINDOWS: &[&str] = &["180d", "365d"];

fn sum_windows(counts: &BTreeMap<String, u32>, labels: &[&str]) -> u32 {
    labels
        .iter()
        .map(|label| counts.get(*label).copied().unwrap_or(0))
        .sum()
}

/// Classify a window -> count histogram.
pub fn classify_intent(counts: &BTreeMap<String, u32>) -> IntentClass {
    let recent = sum_windows(counts, RECENT_WINDOWS);
    let long_term = sum_windows(counts, LONG_TERM_WINDOWS);
    let distinct_windows = counts.values().filter(|&&count| count > 0).count();

    if long_term > 0 && recent > 0 && distinct_windows >= 2 {
        return IntentClass::Structural;
    }
    if recent > 0 && long_term == 0 {
        return IntentClass::Temporal;
    }
    if long_term >= recent {
        IntentClass::Structural
    } else {
        IntentClass::Temporal
    }
}
