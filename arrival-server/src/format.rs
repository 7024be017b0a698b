//! Display formatting for raw arrival-time values.
//!
//! The feed reports either a status code (`""`, `"-1"` .. `"-4"`) or a
//! number of seconds until arrival. Status codes are matched against the
//! unparsed string before any numeric interpretation.

/// Below this many seconds a bus is "arriving soon" rather than shown in minutes.
const ARRIVING_SOON_SECS: i64 = 180;

/// Labels used when rendering arrival times and unmatched routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLabels {
    /// `""` and `"-1"`
    pub not_departed: String,
    /// `"-2"`
    pub traffic_control: String,
    /// `"-3"`
    pub last_bus_passed: String,
    /// `"-4"`
    pub not_operating: String,
    pub arriving_now: String,
    pub arriving_soon: String,
    /// Appended to the whole-minute count, e.g. `"分"` renders `"3分"`.
    pub minutes_suffix: String,
    /// The value is not an integer.
    pub malformed: String,
    /// The value is a negative integer that is not a known status code.
    pub abnormal: String,
    /// Route name for signals with no static record; `{id}` is replaced
    /// by the signal's dynamic key.
    pub unknown_route: String,
}

impl TimeLabels {
    /// Traditional Chinese labels, matching the stop pages themselves.
    pub fn zh_tw() -> Self {
        Self {
            not_departed: "未發車".to_string(),
            traffic_control: "交管不停".to_string(),
            last_bus_passed: "末班已過".to_string(),
            not_operating: "今日未營運".to_string(),
            arriving_now: "進站中".to_string(),
            arriving_soon: "將到站".to_string(),
            minutes_suffix: "分".to_string(),
            malformed: "資料格式錯誤".to_string(),
            abnormal: "數據異常".to_string(),
            unknown_route: "未知路線 (ID:{id})".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            not_departed: "not yet departed".to_string(),
            traffic_control: "skipped due to traffic control".to_string(),
            last_bus_passed: "last bus already passed".to_string(),
            not_operating: "not operating today".to_string(),
            arriving_now: "arriving now".to_string(),
            arriving_soon: "arriving soon".to_string(),
            minutes_suffix: " minutes".to_string(),
            malformed: "malformed data".to_string(),
            abnormal: "abnormal data".to_string(),
            unknown_route: "unknown route (ID:{id})".to_string(),
        }
    }

    /// Route name for a signal whose entry has no static route record.
    pub fn unknown_route(&self, dynamic_key: &str) -> String {
        self.unknown_route.replace("{id}", dynamic_key)
    }
}

impl Default for TimeLabels {
    fn default() -> Self {
        Self::zh_tw()
    }
}

/// Maps raw arrival-time values to display strings.
#[derive(Debug, Clone, Default)]
pub struct TimeFormatter {
    labels: TimeLabels,
}

impl TimeFormatter {
    pub fn new(labels: TimeLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &TimeLabels {
        &self.labels
    }

    /// Label for a status code, matched against the exact unparsed string.
    pub fn status_label(&self, raw: &str) -> Option<&str> {
        let label = match raw {
            "" | "-1" => &self.labels.not_departed,
            "-2" => &self.labels.traffic_control,
            "-3" => &self.labels.last_bus_passed,
            "-4" => &self.labels.not_operating,
            _ => return None,
        };
        Some(label.as_str())
    }

    /// Format a raw time value for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrival_server::format::{TimeFormatter, TimeLabels};
    ///
    /// let formatter = TimeFormatter::new(TimeLabels::english());
    /// assert_eq!(formatter.format("-3"), "last bus already passed");
    /// assert_eq!(formatter.format("0"), "arriving now");
    /// assert_eq!(formatter.format("90"), "arriving soon");
    /// assert_eq!(formatter.format("185"), "3 minutes");
    /// assert_eq!(formatter.format("abc"), "malformed data");
    /// ```
    pub fn format(&self, raw: &str) -> String {
        if let Some(label) = self.status_label(raw) {
            return label.to_string();
        }

        let trimmed = raw.trim();
        let seconds = match trimmed.parse::<i64>() {
            Ok(seconds) => seconds,
            // Too large for i64 but still a count of seconds.
            Err(_) => match trimmed.parse::<u128>() {
                Ok(seconds) => return format!("{}{}", seconds / 60, self.labels.minutes_suffix),
                Err(_) => return self.labels.malformed.clone(),
            },
        };

        match seconds {
            0 => self.labels.arriving_now.clone(),
            1..ARRIVING_SOON_SECS => self.labels.arriving_soon.clone(),
            ARRIVING_SOON_SECS.. => format!("{}{}", seconds / 60, self.labels.minutes_suffix),
            // Negative: "-01" or " -2" still carry a status meaning once canonicalized.
            _ => self
                .status_label(&seconds.to_string())
                .unwrap_or(self.labels.abnormal.as_str())
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> TimeFormatter {
        TimeFormatter::new(TimeLabels::english())
    }

    #[test]
    fn status_codes() {
        let f = english();
        assert_eq!(f.format(""), "not yet departed");
        assert_eq!(f.format("-1"), "not yet departed");
        assert_eq!(f.format("-2"), "skipped due to traffic control");
        assert_eq!(f.format("-3"), "last bus already passed");
        assert_eq!(f.format("-4"), "not operating today");
    }

    #[test]
    fn seconds_thresholds() {
        let f = english();
        assert_eq!(f.format("0"), "arriving now");
        assert_eq!(f.format("1"), "arriving soon");
        assert_eq!(f.format("90"), "arriving soon");
        assert_eq!(f.format("179"), "arriving soon");
        assert_eq!(f.format("180"), "3 minutes");
        assert_eq!(f.format("185"), "3 minutes");
        assert_eq!(f.format("239"), "3 minutes");
        assert_eq!(f.format("240"), "4 minutes");
    }

    #[test]
    fn non_integers_are_malformed() {
        let f = english();
        assert_eq!(f.format("abc"), "malformed data");
        assert_eq!(f.format("1.5"), "malformed data");
        assert_eq!(f.format("--1"), "malformed data");
    }

    #[test]
    fn seconds_beyond_i64_are_minutes() {
        let f = english();
        assert_eq!(f.format("99999999999999999999"), "1666666666666666666 minutes");
        assert_eq!(f.format(" 9223372036854775808 "), "153722867280912930 minutes");
        // Overflowing negatives are not seconds counts.
        assert_eq!(f.format("-99999999999999999999"), "malformed data");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let f = english();
        assert_eq!(f.format(" 185 "), "3 minutes");
        assert_eq!(f.format("\t0"), "arriving now");
    }

    #[test]
    fn negative_values() {
        let f = english();
        // Canonical form is a status code
        assert_eq!(f.format("-01"), "not yet departed");
        assert_eq!(f.format(" -2"), "skipped due to traffic control");
        // Unknown status
        assert_eq!(f.format("-5"), "abnormal data");
        assert_eq!(f.format("-180"), "abnormal data");
    }

    #[test]
    fn zh_tw_labels() {
        let f = TimeFormatter::default();
        assert_eq!(f.format(""), "未發車");
        assert_eq!(f.format("0"), "進站中");
        assert_eq!(f.format("120"), "將到站");
        assert_eq!(f.format("185"), "3分");
        assert_eq!(f.format("-4"), "今日未營運");
        assert_eq!(f.format("x"), "資料格式錯誤");
    }

    #[test]
    fn status_label_only_matches_exact_strings() {
        let f = english();
        assert!(f.status_label("-1").is_some());
        assert!(f.status_label(" -1").is_none());
        assert!(f.status_label("0").is_none());
    }

    #[test]
    fn unknown_route_embeds_key() {
        assert_eq!(
            TimeLabels::english().unknown_route("482"),
            "unknown route (ID:482)"
        );
        assert_eq!(TimeLabels::zh_tw().unknown_route("482"), "未知路線 (ID:482)");
    }
}
