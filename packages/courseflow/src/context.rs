//! Page context classification from URLs.
//!
//! Labels the current page from its URL path alone, so the rest of the
//! pipeline can pick context-appropriate selectors. Pure, infallible,
//! first-matching-rule-wins.

use serde::{Deserialize, Serialize};

/// Label for the kind of page currently loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageContext {
    Dashboard,
    CourseAssignments,
    CourseModules,
    Calendar,
    CourseHome,
    Grades,
    Unknown,
}

impl PageContext {
    /// Classify a page URL.
    ///
    /// Rules are ordered most-specific first: a course page that also
    /// mentions assignments classifies as `CourseAssignments`, never as
    /// `CourseHome`.
    pub fn classify(url: &str) -> Self {
        let path = url::Url::parse(url)
            .map(|u| u.path().to_lowercase())
            .unwrap_or_else(|_| url.to_lowercase());

        let in_course = path.contains("/courses/") || path.contains("/course/");

        if in_course && (path.contains("assignment") || path.contains("quizzes")) {
            Self::CourseAssignments
        } else if in_course && path.contains("module") {
            Self::CourseModules
        } else if in_course && path.contains("grade") {
            Self::Grades
        } else if path.contains("calendar") {
            Self::Calendar
        } else if path.contains("grade") {
            Self::Grades
        } else if in_course {
            Self::CourseHome
        } else if path.contains("dashboard") || path == "/" || path.is_empty() {
            Self::Dashboard
        } else {
            Self::Unknown
        }
    }

    /// Stable label used in cache keys and inference context strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::CourseAssignments => "course_assignments",
            Self::CourseModules => "course_modules",
            Self::Calendar => "calendar",
            Self::CourseHome => "course_home",
            Self::Grades => "grades",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_assignments_beats_course_home() {
        assert_eq!(
            PageContext::classify("https://lms.example.edu/courses/123/assignments"),
            PageContext::CourseAssignments
        );
        assert_eq!(
            PageContext::classify("https://lms.example.edu/courses/123/assignments/456"),
            PageContext::CourseAssignments
        );
        assert_eq!(
            PageContext::classify("https://lms.example.edu/courses/123"),
            PageContext::CourseHome
        );
    }

    #[test]
    fn test_course_modules_and_grades() {
        assert_eq!(
            PageContext::classify("https://lms.example.edu/courses/123/modules"),
            PageContext::CourseModules
        );
        assert_eq!(
            PageContext::classify("https://lms.example.edu/courses/123/grades"),
            PageContext::Grades
        );
        assert_eq!(
            PageContext::classify("https://lms.example.edu/grades"),
            PageContext::Grades
        );
    }

    #[test]
    fn test_dashboard_and_calendar() {
        assert_eq!(
            PageContext::classify("https://lms.example.edu/"),
            PageContext::Dashboard
        );
        assert_eq!(
            PageContext::classify("https://lms.example.edu/dashboard"),
            PageContext::Dashboard
        );
        assert_eq!(
            PageContext::classify("https://lms.example.edu/calendar#view_name=month"),
            PageContext::Calendar
        );
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(
            PageContext::classify("https://lms.example.edu/profile/settings"),
            PageContext::Unknown
        );
        // Unparseable input still classifies
        assert_eq!(PageContext::classify("not a url"), PageContext::Unknown);
    }
}
