//! Stylesheet href filtering and chunk base-path derivation.

/// Stylesheets that never describe where application chunks live.
const EXCLUDED: [&str; 5] = ["wss", "pages/revision", "pages/cdn", "old-browser", "stacktrace"];

pub(super) fn is_excluded(href: &str) -> bool {
    EXCLUDED.iter().any(|needle| href.contains(needle))
}

pub(super) fn is_css(href: &str) -> bool {
    href.contains(".css")
}

/// Directory of a stylesheet relative to its host, without surrounding slashes.
///
/// `https://cdn.example.com/static/css/main.css` gives `static/css`. A
/// root-relative href such as `/static/css/main.css` gives the same result,
/// since its leading empty segment takes the host's place.
pub(super) fn base_path(href: &str) -> String {
    let rest = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"))
        .unwrap_or(href);
    let segments: Vec<&str> = rest.split('/').skip(1).collect();
    match segments.split_last() {
        Some((_file, dirs)) => dirs.join("/"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_substrings() {
        assert!(is_excluded("https://cdn.example.com/pages/revision/main.css"));
        assert!(is_excluded("wss://socket.example.com/x.css"));
        assert!(is_excluded("/assets/old-browser.css"));
        assert!(is_excluded("/stacktrace.css"));
        assert!(!is_excluded("https://cdn.example.com/static/css/main.css"));
    }

    #[test]
    fn css_detection_allows_query_suffix() {
        assert!(is_css("/static/main.css?v=3"));
        assert!(!is_css("/static/main.js"));
    }

    #[test]
    fn base_path_of_absolute_href() {
        assert_eq!(base_path("https://cdn.example.com/static/css/main.css"), "static/css");
        assert_eq!(base_path("http://cdn.example.com/a/b.css"), "a");
    }

    #[test]
    fn base_path_of_root_relative_href() {
        assert_eq!(base_path("/static/css/main.css"), "static/css");
    }

    #[test]
    fn base_path_of_file_at_host_root() {
        assert_eq!(base_path("https://cdn.example.com/main.css"), "");
        assert_eq!(base_path("main.css"), "");
    }
}
