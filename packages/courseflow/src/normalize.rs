//! Result normalization - raw events to canonical assignment records.
//!
//! Every rule here is lossy in one direction only: an unparseable fragment
//! normalizes to a null/neutral value and the record is kept. The single
//! exception is a title that is empty after cleanup, which drops the event.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::types::assignment::{Assignment, AssignmentStatus, GradeInfo, Priority};
use crate::types::event::RawEvent;
use crate::types::page::PageSnapshot;

/// Maximum title length after cleanup, in characters.
const MAX_TITLE_CHARS: usize = 200;

/// Course used when neither the event nor the page resolves one.
const UNKNOWN_COURSE: &str = "Unknown Course";

/// Ordered status keyword table; first match wins, later rules never
/// override an earlier match.
const STATUS_TABLE: &[(&str, AssignmentStatus)] = &[
    ("submitted", AssignmentStatus::Completed),
    ("turned in", AssignmentStatus::Completed),
    ("complete", AssignmentStatus::Completed),
    ("graded", AssignmentStatus::Graded),
    ("overdue", AssignmentStatus::Overdue),
    ("late", AssignmentStatus::Overdue),
    ("missing", AssignmentStatus::Missing),
    ("in progress", AssignmentStatus::InProgress),
    ("pending", AssignmentStatus::Pending),
];

/// Normalize a batch of raw events against the page they came from.
///
/// `default_course` is the page-level course resolution, used when an event
/// carries none of its own.
pub fn normalize_events(
    events: Vec<RawEvent>,
    page: &PageSnapshot,
    default_course: Option<&str>,
) -> Vec<Assignment> {
    let total = events.len();
    let assignments: Vec<Assignment> = events
        .into_iter()
        .filter_map(|event| normalize_event(event, page, default_course))
        .collect();
    debug!(
        raw = total,
        normalized = assignments.len(),
        "Normalization complete"
    );
    assignments
}

/// Normalize one event; `None` when the title is empty after cleanup.
pub fn normalize_event(
    event: RawEvent,
    page: &PageSnapshot,
    default_course: Option<&str>,
) -> Option<Assignment> {
    let title = clean_title(&event.title)?;

    let course = event
        .course
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or(default_course)
        .unwrap_or(UNKNOWN_COURSE)
        .to_string();

    let grade = event
        .grade_text
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(classify_grade);

    let status = match event.status_text.as_deref().and_then(map_status) {
        Some(status) => status,
        // No recognized status text: a structured grade means graded
        None if grade.as_ref().is_some_and(GradeInfo::has_structured_value) => {
            AssignmentStatus::Graded
        }
        None => AssignmentStatus::Pending,
    };

    Some(Assignment {
        id: Uuid::new_v4().to_string(),
        title,
        course,
        description: event
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        due_date: event.due_date.as_deref().and_then(parse_due_date),
        url: resolve_url(event.url.as_deref(), page),
        priority: map_priority(event.priority_hint.as_deref()),
        status,
        grade,
        estimated_minutes: event.duration_hint.as_deref().and_then(parse_minutes),
        confidence: event.confidence.clamp(0.0, 1.0),
        extraction_method: event.method,
        scraped_at: Utc::now(),
        synced: false,
    })
}

/// Trim, collapse whitespace, strip a leading task-type label, cap length.
pub fn clean_title(raw: &str) -> Option<String> {
    let collapsed = Regex::new(r"\s+")
        .expect("static regex")
        .replace_all(raw.trim(), " ")
        .into_owned();

    let stripped = Regex::new(r"(?i)^(?:assignment|task|homework|hw|quiz|exam|test)\s*:\s*")
        .expect("static regex")
        .replace(&collapsed, "")
        .trim()
        .to_string();

    if stripped.is_empty() {
        return None;
    }
    Some(stripped.chars().take(MAX_TITLE_CHARS).collect())
}

/// Parse a due date from a direct timestamp or a natural-language fragment.
///
/// Returns `None` for anything unrecognized; a guessed value is never
/// produced.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    // Directly parseable timestamps first
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(text, format) {
            return local_to_utc(naive);
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return local_to_utc(date.and_hms_opt(23, 59, 0)?);
        }
    }

    // Natural language: "Due Jun 15 at 11:59pm", "September 3", ...
    let re = Regex::new(
        r"(?ix)
        \b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+
        (\d{1,2})(?:st|nd|rd|th)?
        (?:,?\s*(\d{4}))?
        (?:\s+at\s+(\d{1,2}):(\d{2})\s*(am|pm)?)?",
    )
    .expect("static regex");
    let caps = re.captures(text)?;

    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps
        .get(3)
        .and_then(|y| y.as_str().parse().ok())
        .unwrap_or_else(|| Local::now().year());

    // Bare dates default to end of day
    let (hour, minute) = match (caps.get(4), caps.get(5)) {
        (Some(h), Some(m)) => {
            let hour: u32 = h.as_str().parse().ok()?;
            let minute: u32 = m.as_str().parse().ok()?;
            if hour > 12 || minute > 59 {
                return None;
            }
            let hour = match caps.get(6).map(|x| x.as_str().to_lowercase()) {
                Some(ref meridiem) if meridiem == "pm" => {
                    if hour == 12 {
                        12
                    } else {
                        hour + 12
                    }
                }
                Some(ref meridiem) if meridiem == "am" => {
                    if hour == 12 {
                        0
                    } else {
                        hour
                    }
                }
                _ => hour,
            };
            (hour, minute)
        }
        _ => (23, 59),
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    local_to_utc(date.and_hms_opt(hour, minute, 0)?)
}

fn local_to_utc(naive: chrono::NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn month_number(prefix: &str) -> Option<u32> {
    match prefix.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Classify grade/points text against the ordered pattern set.
///
/// First match wins; unmatched text keeps only the verbatim display string.
pub fn classify_grade(text: &str) -> GradeInfo {
    let trimmed = text.trim();

    // earned/total
    if let Some(caps) = Regex::new(r"^(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)$")
        .expect("static regex")
        .captures(trimmed)
    {
        let points: f64 = caps[1].parse().unwrap_or(0.0);
        let max_points: f64 = caps[2].parse().unwrap_or(0.0);
        return GradeInfo {
            points: Some(points),
            max_points: Some(max_points),
            percentage: (max_points > 0.0).then(|| points / max_points * 100.0),
            ..Default::default()
        };
    }

    // bare percentage
    if let Some(caps) = Regex::new(r"^(\d+(?:\.\d+)?)\s*%$")
        .expect("static regex")
        .captures(trimmed)
    {
        return GradeInfo {
            percentage: caps[1].parse().ok(),
            ..Default::default()
        };
    }

    // letter grade
    if Regex::new(r"^[A-F][+-]?$")
        .expect("static regex")
        .is_match(trimmed)
    {
        return GradeInfo {
            letter_grade: Some(trimmed.to_string()),
            ..Default::default()
        };
    }

    // bare points
    if let Some(caps) = Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(?:pts?|points)$")
        .expect("static regex")
        .captures(trimmed)
    {
        return GradeInfo {
            points: caps[1].parse().ok(),
            ..Default::default()
        };
    }

    GradeInfo {
        display: Some(text.to_string()),
        ..Default::default()
    }
}

/// Map status free text through the keyword table; `None` when nothing
/// matches.
fn map_status(text: &str) -> Option<AssignmentStatus> {
    let lower = text.to_lowercase();
    STATUS_TABLE
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, status)| *status)
}

/// Map a priority hint; defaults to medium.
fn map_priority(hint: Option<&str>) -> Priority {
    let Some(hint) = hint else {
        return Priority::Medium;
    };
    let lower = hint.to_lowercase();
    if lower.contains("high") || lower.contains("urgent") {
        Priority::High
    } else if lower.contains("low") || lower.contains("optional") {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Parse an estimated-duration hint into minutes.
fn parse_minutes(hint: &str) -> Option<u32> {
    let caps = Regex::new(r"(\d+)")
        .expect("static regex")
        .captures(hint)?;
    let value: u32 = caps[1].parse().ok()?;
    let lower = hint.to_lowercase();
    if lower.contains("hour") || lower.contains("hr") {
        value.checked_mul(60)
    } else {
        Some(value)
    }
}

/// Resolve an item URL: absolute as-is, root-relative against the page
/// origin, anything else falls back to the page URL.
pub fn resolve_url(raw: Option<&str>, page: &PageSnapshot) -> String {
    let Some(raw) = raw.map(str::trim).filter(|u| !u.is_empty()) else {
        return page.url.clone();
    };

    if let Ok(parsed) = url::Url::parse(raw) {
        if parsed.host_str().is_some() {
            return parsed.to_string();
        }
    }

    if raw.starts_with('/') {
        if let Some(origin) = page.origin() {
            if let Ok(joined) = url::Url::parse(&origin).and_then(|base| base.join(raw)) {
                return joined.to_string();
            }
        }
    }

    page.url.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::event::ExtractionMethod;
    use chrono::Timelike;
    use proptest::prelude::*;

    fn page() -> PageSnapshot {
        PageSnapshot::new("https://lms.example.edu/courses/42/assignments", "")
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(
            clean_title("  Assignment:   Essay   1 ").as_deref(),
            Some("Essay 1")
        );
        assert_eq!(clean_title("HW: Problem Set 3").as_deref(), Some("Problem Set 3"));
        assert_eq!(clean_title("Quiz 2").as_deref(), Some("Quiz 2"));
        assert_eq!(clean_title("   "), None);
        assert_eq!(clean_title("Quiz:  "), None);
    }

    #[test]
    fn test_title_length_cap() {
        let long = "x".repeat(400);
        assert_eq!(clean_title(&long).unwrap().chars().count(), 200);
    }

    #[test]
    fn test_parse_due_date_natural_language() {
        let dt = parse_due_date("Due Jun 15 at 11:59pm").unwrap();
        let local = dt.with_timezone(&Local);
        assert_eq!(local.month(), 6);
        assert_eq!(local.day(), 15);
        assert_eq!(local.hour(), 23);
        assert_eq!(local.minute(), 59);
    }

    #[test]
    fn test_parse_due_date_bare_date_defaults_to_end_of_day() {
        let dt = parse_due_date("September 3").unwrap();
        let local = dt.with_timezone(&Local);
        assert_eq!(local.month(), 9);
        assert_eq!(local.day(), 3);
        assert_eq!(local.hour(), 23);
        assert_eq!(local.minute(), 59);
    }

    #[test]
    fn test_parse_due_date_rfc3339() {
        let dt = parse_due_date("2025-06-15T23:59:00Z").unwrap();
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn test_parse_due_date_unrecognized_is_none() {
        assert!(parse_due_date("whenever you get to it").is_none());
        assert!(parse_due_date("").is_none());
        assert!(parse_due_date("Due Xyz 99").is_none());
    }

    #[test]
    fn test_classify_grade_table() {
        let earned = classify_grade("85/100");
        assert_eq!(earned.points, Some(85.0));
        assert_eq!(earned.max_points, Some(100.0));
        assert_eq!(earned.percentage, Some(85.0));

        let zero_total = classify_grade("0/0");
        assert_eq!(zero_total.points, Some(0.0));
        assert!(zero_total.percentage.is_none());

        assert_eq!(classify_grade("92%").percentage, Some(92.0));
        assert_eq!(classify_grade("A-").letter_grade.as_deref(), Some("A-"));
        assert_eq!(classify_grade("40 pts").points, Some(40.0));

        let unmatched = classify_grade("see rubric");
        assert_eq!(unmatched.display.as_deref(), Some("see rubric"));
        assert!(!unmatched.has_structured_value());
    }

    #[test]
    fn test_resolve_url() {
        let page = page();
        assert_eq!(
            resolve_url(Some("https://other.edu/a"), &page),
            "https://other.edu/a"
        );
        assert_eq!(
            resolve_url(Some("/courses/42/assignments/7"), &page),
            "https://lms.example.edu/courses/42/assignments/7"
        );
        assert_eq!(resolve_url(Some("garbage path"), &page), page.url);
        assert_eq!(resolve_url(None, &page), page.url);
    }

    #[test]
    fn test_empty_title_drops_event() {
        let event = RawEvent::new("   ");
        assert!(normalize_event(event, &page(), None).is_none());
    }

    #[test]
    fn test_status_mapping_and_grade_upgrade() {
        let mut event = RawEvent::new("Essay 1");
        event.status_text = Some("Submitted yesterday".into());
        let a = normalize_event(event, &page(), None).unwrap();
        assert_eq!(a.status, AssignmentStatus::Completed);

        let mut event = RawEvent::new("Essay 2");
        event.grade_text = Some("92/100".into());
        let a = normalize_event(event, &page(), None).unwrap();
        assert_eq!(a.status, AssignmentStatus::Graded);

        let mut event = RawEvent::new("Essay 3");
        event.grade_text = Some("not graded yet".into());
        let a = normalize_event(event, &page(), None).unwrap();
        assert_eq!(a.status, AssignmentStatus::Pending);
    }

    #[test]
    fn test_course_defaults() {
        let event = RawEvent::new("Essay 1");
        let a = normalize_event(event, &page(), Some("Biology 101")).unwrap();
        assert_eq!(a.course, "Biology 101");

        let event = RawEvent::new("Essay 1");
        let a = normalize_event(event, &page(), None).unwrap();
        assert_eq!(a.course, "Unknown Course");
    }

    #[test]
    fn test_duration_and_priority_hints() {
        let mut event = RawEvent::new("Essay 1");
        event.duration_hint = Some("2 hours".into());
        event.priority_hint = Some("urgent".into());
        event.method = ExtractionMethod::Ai;
        let a = normalize_event(event, &page(), None).unwrap();
        assert_eq!(a.estimated_minutes, Some(120));
        assert_eq!(a.priority, Priority::High);
        assert_eq!(a.extraction_method, ExtractionMethod::Ai);
    }

    #[test]
    fn test_ids_are_unique_per_record() {
        let a = normalize_event(RawEvent::new("Essay 1"), &page(), None).unwrap();
        let b = normalize_event(RawEvent::new("Essay 1"), &page(), None).unwrap();
        assert_ne!(a.id, b.id);
    }

    proptest! {
        #[test]
        fn prop_date_round_trip(
            month_idx in 0usize..12,
            day in 1u32..=28,
            hour in 1u32..=12,
            minute in 0u32..=59,
            pm in proptest::bool::ANY,
        ) {
            let months = [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun",
                "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ];
            let meridiem = if pm { "pm" } else { "am" };
            let fragment = format!("{} {} at {}:{:02}{}", months[month_idx], day, hour, minute, meridiem);

            let parsed = parse_due_date(&fragment).expect("fragment should parse");
            let local = parsed.with_timezone(&Local);

            let expected_hour = match (hour, pm) {
                (12, true) => 12,
                (h, true) => h + 12,
                (12, false) => 0,
                (h, false) => h,
            };

            prop_assert_eq!(local.month(), month_idx as u32 + 1);
            prop_assert_eq!(local.day(), day);
            prop_assert_eq!(local.hour(), expected_hour);
            prop_assert_eq!(local.minute(), minute);
        }
    }
}
