//! Heuristic extraction - selector and pattern driven, no inference service.
//!
//! Used as the unconditional fallback when the inference service fails, and
//! as the primary path on pages the AI extractor does not target. Scans a
//! fixed, context-independent selector set and pattern-matches titles,
//! dates, grades, and status straight out of the DOM text.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::content::{element_text, inside_chrome, is_ancestor, resolve_course};
use crate::types::event::{ExtractionMethod, RawEvent};

/// Broad "looks like an assignment" selectors, independent of context.
const ITEM_SELECTORS: &[&str] = &[
    "li.assignment",
    "tr.assignment",
    ".assignment-list li",
    "[class*='assignment']",
    ".planner-item",
    ".to-do-list li",
    ".context_module_item",
    ".fc-event",
];

/// Selectors tried in order for an item's title.
const TITLE_SELECTORS: &[&str] = &[
    ".ig-title",
    ".assignment-name",
    ".title",
    "[class*='title']",
    "h1",
    "h2",
    "h3",
    "h4",
    "a",
];

/// Selectors tried in order for grade/points text.
const GRADE_SELECTORS: &[&str] = &["[class*='grade']", "[class*='score']", "[class*='points']"];

/// Upper bound on events produced from a single page.
const MAX_EVENTS: usize = 50;

/// Status keywords recognized directly in item text.
const STATUS_WORDS: &[&str] = &[
    "submitted",
    "turned in",
    "complete",
    "graded",
    "overdue",
    "late",
    "missing",
    "in progress",
];

/// Extract raw events from page HTML using selectors and patterns only.
pub fn extract_events(html: &str, page_url: &str, confidence: f32) -> Vec<RawEvent> {
    let document = Html::parse_document(html);
    let course = resolve_course(html, page_url);

    let mut kept: Vec<ElementRef> = Vec::new();
    for selector_str in ITEM_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                if kept.len() >= MAX_EVENTS {
                    break;
                }
                if element_text(&element).is_empty() || inside_chrome(&element) {
                    continue;
                }
                if kept.iter().any(|k| {
                    k.id() == element.id() || is_ancestor(k, &element) || is_ancestor(&element, k)
                }) {
                    continue;
                }
                kept.push(element);
            }
        }
    }

    let events: Vec<RawEvent> = kept
        .iter()
        .filter_map(|element| event_from_element(element, course.clone(), confidence))
        .collect();

    debug!(
        url = %page_url,
        candidates = kept.len(),
        events = events.len(),
        "Heuristic extraction complete"
    );
    events
}

/// Build one raw event from an item element; `None` when no title is found.
fn event_from_element(
    element: &ElementRef,
    course: Option<String>,
    confidence: f32,
) -> Option<RawEvent> {
    let title = extract_title(element)?;
    let text = element_text(element);
    let lower = text.to_lowercase();

    Some(RawEvent {
        title,
        course,
        description: None,
        due_date: extract_due_fragment(&text),
        url: first_href(element),
        grade_text: extract_grade_text(element, &text),
        status_text: STATUS_WORDS
            .iter()
            .find(|w| lower.contains(**w))
            .map(|w| w.to_string()),
        priority_hint: None,
        duration_hint: None,
        confidence,
        method: ExtractionMethod::Heuristic,
    })
}

/// Title from the first matching title-like child or anchor.
fn extract_title(element: &ElementRef) -> Option<String> {
    for selector_str in TITLE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(child) = element.select(&selector).next() {
                let text = element_text(&child);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    // Leaf items carry their title as bare text
    let text = element_text(element);
    let first_line = text.lines().next().unwrap_or("").trim().to_string();
    (!first_line.is_empty()).then_some(first_line)
}

/// First anchor href inside the item.
fn first_href(element: &ElementRef) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    element
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}

/// A "due ..." fragment from the item text.
fn extract_due_fragment(text: &str) -> Option<String> {
    let re = regex::Regex::new(r"(?i)due\s*:?\s*([^|\n]{3,60})").ok()?;
    re.captures(text)
        .map(|caps| caps[1].trim().trim_end_matches(['.', ',']).to_string())
}

/// Grade text from a grade-like child, else a points pattern in the text.
fn extract_grade_text(element: &ElementRef, text: &str) -> Option<String> {
    for selector_str in GRADE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(child) = element.select(&selector).next() {
                let grade = element_text(&child);
                if !grade.is_empty() {
                    return Some(grade);
                }
            }
        }
    }
    let re = regex::Regex::new(r"\d+(?:\.\d+)?\s*(?:/\s*\d+(?:\.\d+)?|pts?\b|points\b|%)").ok()?;
    re.find(text).map(|m| m.as_str().to_string())
}
