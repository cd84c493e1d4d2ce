//! Content-area selection - finding DOM regions likely to hold assignments.
//!
//! Selection runs in three tiers: per-context structural selectors plus a
//! generic "looks like an assignment" set, then a keyword-density scan, then
//! coarse containers ending at `body`. Candidates inside navigation chrome
//! are skipped, and a candidate nested in (or containing) an already-kept
//! one is suppressed.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::context::PageContext;

/// Assignment-domain keywords for the density fallback scan.
const KEYWORDS: &[&str] = &[
    "assignment",
    "due",
    "quiz",
    "exam",
    "project",
    "homework",
    "discussion",
    "points",
    "pts",
];

/// Plausible text length range for a single assignment item.
const MIN_ITEM_TEXT: usize = 10;
const MAX_ITEM_TEXT: usize = 500;

/// Context-independent selectors appended to every context's list.
const GENERIC_SELECTORS: &[&str] = &[
    "[class*='assignment']",
    "[id*='assignment']",
    "[class*='planner-item']",
    "[class*='todo']",
    "[class*='due-date']",
    ".quiz",
];

/// Coarse containers tried last, in priority order.
const COARSE_SELECTORS: &[&str] = &["main", "#content", "#main", ".content", "#application", "body"];

/// Structural selectors per page context.
fn context_selectors(context: PageContext) -> &'static [&'static str] {
    match context {
        PageContext::Dashboard => &[
            ".ic-DashboardCard",
            ".planner-item",
            ".to-do-list li",
            ".coming_up .event",
        ],
        PageContext::CourseAssignments => &[
            "ul.assignment-group li.assignment",
            ".assignment-list .assignment",
            "tr.assignment",
            ".ig-row",
        ],
        PageContext::CourseModules => &[".context_module_item", ".module-item"],
        PageContext::Calendar => &[".fc-event", ".calendar-event", ".agenda-event__item"],
        PageContext::CourseHome => &[".coming_up .event", ".recent-activity .activity", ".event-list .event"],
        PageContext::Grades => &["#grades_summary tr.student_assignment", "table.grades tbody tr"],
        PageContext::Unknown => &[],
    }
}

/// Select the DOM regions likely to contain assignment data, as outer HTML.
pub fn select_content_areas(html: &str, context: PageContext) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut kept: Vec<ElementRef> = Vec::new();

    // Tier 1: structural selectors for this context, then the generic set
    let selectors = context_selectors(context)
        .iter()
        .chain(GENERIC_SELECTORS.iter());
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                consider(&mut kept, element);
            }
        }
    }

    // Tier 2: keyword-density scan over the whole document
    if kept.is_empty() {
        debug!(context = %context, "No structural candidates, running keyword scan");
        for node in document.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            if matches!(element.value().name(), "html" | "body") {
                continue;
            }
            let text = element_text(&element);
            if text.len() < MIN_ITEM_TEXT || text.len() > MAX_ITEM_TEXT {
                continue;
            }
            let lower = text.to_lowercase();
            if !KEYWORDS.iter().any(|k| lower.contains(k)) {
                continue;
            }
            consider(&mut kept, climb_to_content_region(element));
        }
    }

    // Tier 3: coarsest containers, finally the document body
    if kept.is_empty() {
        debug!(context = %context, "No keyword candidates, falling back to coarse containers");
        for selector_str in COARSE_SELECTORS {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(element) = document.select(&selector).next() {
                    if !element_text(&element).is_empty() {
                        kept.push(element);
                        break;
                    }
                }
            }
        }
    }

    debug!(context = %context, candidates = kept.len(), "Content areas selected");
    kept.iter().map(|e| e.html()).collect()
}

/// Keep a candidate unless it is empty, inside page chrome, or related by
/// containment to an already-kept candidate.
fn consider<'a>(kept: &mut Vec<ElementRef<'a>>, element: ElementRef<'a>) {
    if element_text(&element).is_empty() {
        return;
    }
    if inside_chrome(&element) {
        return;
    }
    if kept
        .iter()
        .any(|k| k.id() == element.id() || is_ancestor(k, &element) || is_ancestor(&element, k))
    {
        return;
    }
    kept.push(element);
}

/// Whole-element text, trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// True if `a` is a strict ancestor of `b`.
pub(crate) fn is_ancestor(a: &ElementRef, b: &ElementRef) -> bool {
    b.ancestors().any(|n| n.id() == a.id())
}

/// True if the element sits inside navigation/header/footer chrome.
pub(crate) fn inside_chrome(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value().as_element().is_some_and(|el| {
            matches!(el.name(), "nav" | "header" | "footer" | "aside" | "script" | "style")
                || el.attr("role").is_some_and(|r| {
                    matches!(r, "navigation" | "banner" | "contentinfo")
                })
        })
    })
}

/// Climb to the nearest ancestor tagged as a content/main region; the
/// element itself when none exists.
fn climb_to_content_region(element: ElementRef) -> ElementRef {
    for node in element.ancestors() {
        let Some(ancestor) = ElementRef::wrap(node) else {
            continue;
        };
        let el = ancestor.value();
        let is_content = matches!(el.name(), "main" | "article")
            || el.attr("role").is_some_and(|r| r == "main")
            || el
                .attr("id")
                .is_some_and(|id| id == "content" || id == "main")
            || el.attr("class").is_some_and(|c| c.contains("content"));
        if is_content {
            return ancestor;
        }
    }
    element
}

/// Resolve the course name for a page.
///
/// Tries a prioritized list of heading selectors, then falls back to the
/// course number in the URL.
pub fn resolve_course(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let heading_selectors = [
        ".course-title",
        "#course_name",
        "#breadcrumbs .ellipsible",
        "h1.course-header",
        "header .course-name",
        "h1",
    ];

    for selector_str in heading_selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element_text(&element);
                if !text.is_empty() && text.len() <= 100 {
                    return Some(text);
                }
            }
        }
    }

    course_number_from_url(page_url)
}

/// "/courses/123" style fallback course name.
fn course_number_from_url(page_url: &str) -> Option<String> {
    let re = regex::Regex::new(r"/courses?/(\d+)").ok()?;
    re.captures(page_url)
        .map(|caps| format!("Course {}", &caps[1]))
}
