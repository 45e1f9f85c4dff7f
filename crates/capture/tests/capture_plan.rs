//! End-to-end checks of the pure planning layer: device selection, slug
//! derivation, and output naming. No browser involved.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use viewshot_capture::{device, runner::segment_filename, url_slug};

#[test]
fn full_device_set_in_fixed_order() {
    let selected = device::select_devices(None).unwrap();
    let names: Vec<_> = selected.iter().map(|p| p.name).collect();
    assert_eq!(names, ["mobile", "tablet", "laptop", "desktop"]);
}

#[test]
fn filtered_selection_keeps_enumeration_order() {
    let selected = device::select_devices(Some("MOBILE, Tablet")).unwrap();
    let names: Vec<_> = selected.iter().map(|p| p.name).collect();
    assert_eq!(names, ["mobile", "tablet"]);
}

#[test]
fn invalid_selection_fails_before_any_browser_work() {
    let err = device::select_devices(Some("xbox")).unwrap_err();
    assert!(err.to_string().contains("mobile, tablet, laptop, desktop"));
}

#[test]
fn slug_never_keeps_a_scheme() {
    for url in ["http://example.com/a", "https://example.com/a"] {
        let slug = url_slug(url);
        assert!(!slug.contains("http-"));
        assert!(slug.starts_with("examplecom"));
    }
}

#[test]
fn slug_is_idempotent() {
    let once = url_slug("https://shop.example.com/items?id=7&ref=mail");
    assert_eq!(url_slug(&once), once);
}

#[test]
fn filenames_are_stable_for_a_given_run() {
    // Re-running the same URL and device set must produce identical
    // names, so a second run overwrites rather than accumulating.
    let slug = url_slug("https://example.com/pricing/");
    let first = segment_filename("laptop", 2, &slug);
    let second = segment_filename("laptop", 2, &url_slug("https://example.com/pricing/"));
    assert_eq!(first, second);
    assert_eq!(first, "screenshot-laptop-2__examplecom-pricing.png");
}
