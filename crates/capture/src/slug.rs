//! Filesystem-safe filename slugs derived from URLs.

/// Characters treated as URL separators; runs of these collapse to a
/// single hyphen.
const SEPARATORS: &[char] = &['/', ':', '?', '&', '='];

/// Derive a filesystem-safe slug from a URL.
///
/// Strips one leading `http://` or `https://`, collapses separator runs
/// to a single hyphen, drops anything outside `[a-zA-Z0-9-]`, lowercases,
/// and trims trailing hyphens. Total and idempotent; degenerate input
/// yields the empty string.
pub fn url_slug(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let mut slug = String::with_capacity(stripped.len());
    let mut pending_sep = false;

    for c in stripped.chars() {
        if SEPARATORS.contains(&c) {
            pending_sep = true;
        } else if c.is_ascii_alphanumeric() || c == '-' {
            if pending_sep {
                slug.push('-');
                pending_sep = false;
            }
            slug.push(c.to_ascii_lowercase());
        }
        // Anything else is dropped without breaking a separator run.
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme() {
        assert_eq!(url_slug("https://example.com"), "examplecom");
        assert_eq!(url_slug("http://example.com"), "examplecom");
    }

    #[test]
    fn strips_only_one_scheme_prefix() {
        // The remainder is slugged, not re-parsed as a URL.
        assert_eq!(
            url_slug("https://http://example.com"),
            "http-examplecom"
        );
    }

    #[test]
    fn separators_collapse_to_single_hyphen() {
        assert_eq!(
            url_slug("https://example.com/a/b?x=1&y=2"),
            "examplecom-a-b-x-1-y-2"
        );
        assert_eq!(url_slug("a//:?&=b"), "a-b");
    }

    #[test]
    fn leading_separators_keep_their_hyphen() {
        // Only trailing hyphens are stripped; a separator run before the
        // first kept character still marks the boundary.
        assert_eq!(url_slug("://x"), "-x");
        assert_eq!(url_slug("?q=1"), "-q-1");
    }

    #[test]
    fn trailing_hyphens_removed() {
        assert_eq!(url_slug("https://example.com/"), "examplecom");
        assert_eq!(url_slug("https://example.com/a/b/"), "examplecom-a-b");
    }

    #[test]
    fn invalid_characters_dropped() {
        assert_eq!(url_slug("https://example.com/päge#1"), "examplecom-pge1");
        assert_eq!(url_slug("a.b.c"), "abc");
    }

    #[test]
    fn lowercases() {
        // Scheme stripping is case-sensitive, matching the slug contract.
        assert_eq!(url_slug("HTTPS://Example.COM/Path"), "https-examplecom-path");
        assert_eq!(url_slug("https://Example.COM/Path"), "examplecom-path");
    }

    #[test]
    fn idempotent() {
        for input in [
            "https://example.com/a/b?x=1",
            "HTTP://WEIRD//path:80/",
            "no-scheme/path",
            "://x",
            "",
            "---",
            "ünïcode",
        ] {
            let once = url_slug(input);
            assert_eq!(url_slug(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn degenerate_input_yields_empty() {
        assert_eq!(url_slug(""), "");
        assert_eq!(url_slug("https://"), "");
        assert_eq!(url_slug("///"), "");
    }
}
