//! Page snapshot type - the pipeline's view of the live document.

use sha2::{Digest, Sha256};

/// Marker appended when serialized content exceeds the byte budget.
pub const TRUNCATION_MARKER: &str = "\n<!-- content truncated -->";

/// A point-in-time capture of the page the pipeline is running against.
///
/// The host (browser glue, test harness) produces these; the pipeline never
/// touches a live document directly.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    /// Full page URL, including origin.
    pub url: String,

    /// Document title if available.
    pub title: Option<String>,

    /// Raw page HTML.
    pub html: String,
}

impl PageSnapshot {
    /// Create a new snapshot.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            html: html.into(),
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// SHA-256 hex hash of the raw HTML, used for cache keys.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.html.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Origin (scheme + host + port) of the page URL, if parseable.
    pub fn origin(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?;
        let mut origin = format!("{}://{}", parsed.scheme(), host);
        if let Some(port) = parsed.port() {
            origin.push_str(&format!(":{port}"));
        }
        Some(origin)
    }

    /// Cap a serialized content string to `budget` bytes.
    ///
    /// Oversized content is cut at a char boundary and tagged with a visible
    /// truncation marker; it is never silently dropped.
    pub fn cap_content(content: &str, budget: usize) -> String {
        if content.len() <= budget {
            return content.to_string();
        }
        let mut end = budget;
        while end > 0 && !content.is_char_boundary(end) {
            end -= 1;
        }
        let mut capped = content[..end].to_string();
        capped.push_str(TRUNCATION_MARKER);
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_is_stable() {
        let a = PageSnapshot::new("https://x.edu/", "<p>hi</p>");
        let b = PageSnapshot::new("https://y.edu/", "<p>hi</p>");
        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a.content_hash().len(), 64);
    }

    #[test]
    fn test_origin() {
        let page = PageSnapshot::new("https://lms.example.edu:8443/courses/1", "");
        assert_eq!(
            page.origin().as_deref(),
            Some("https://lms.example.edu:8443")
        );
        assert!(PageSnapshot::new("not a url", "").origin().is_none());
    }

    #[test]
    fn test_cap_content_marks_truncation() {
        let content = "x".repeat(100);
        let capped = PageSnapshot::cap_content(&content, 40);
        assert!(capped.starts_with(&"x".repeat(40)));
        assert!(capped.ends_with(TRUNCATION_MARKER));

        // Under budget passes through untouched
        assert_eq!(PageSnapshot::cap_content("short", 40), "short");
    }

    #[test]
    fn test_cap_content_respects_char_boundaries() {
        let content = "é".repeat(30); // 2 bytes each
        let capped = PageSnapshot::cap_content(&content, 31);
        assert!(capped.ends_with(TRUNCATION_MARKER));
        // No panic and no broken char
        assert!(capped.chars().all(|c| c == 'é' || TRUNCATION_MARKER.contains(c)));
    }
}
