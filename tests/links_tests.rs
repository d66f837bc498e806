// Host-side tests for link interception rules.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod links {
    include!("../src/links.rs");
}

use links::*;

fn click(href: &str) -> LinkClick<'_> {
    LinkClick {
        href,
        ..Default::default()
    }
}

#[test]
fn internal_links_transition() {
    assert_eq!(
        classify(&click("/blog"), "/"),
        LinkAction::Transition("/blog".to_string())
    );
    assert_eq!(
        classify(&click("/market?tab=1#top"), "/"),
        LinkAction::Transition("/market?tab=1#top".to_string())
    );
}

#[test]
fn modified_and_secondary_clicks_are_left_alone() {
    for c in [
        LinkClick { meta: true, ..click("/blog") },
        LinkClick { ctrl: true, ..click("/blog") },
        LinkClick { shift: true, ..click("/blog") },
        LinkClick { alt: true, ..click("/blog") },
        LinkClick { button: 1, ..click("/blog") },
    ] {
        assert_eq!(classify(&c, "/"), LinkAction::Ignore);
    }
}

#[test]
fn external_new_tab_and_download_links_are_left_alone() {
    assert_eq!(classify(&click("https://example.org"), "/"), LinkAction::Ignore);
    assert_eq!(classify(&click("//cdn.example.org/x"), "/"), LinkAction::Ignore);
    assert_eq!(classify(&click("mailto:me@example.org"), "/"), LinkAction::Ignore);
    assert_eq!(
        classify(
            &LinkClick {
                target: Some("_blank"),
                ..click("/blog")
            },
            "/"
        ),
        LinkAction::Ignore
    );
    assert_eq!(
        classify(
            &LinkClick {
                target: Some("_self"),
                ..click("/blog")
            },
            "/"
        ),
        LinkAction::Transition("/blog".to_string())
    );
    assert_eq!(
        classify(
            &LinkClick {
                download: true,
                ..click("/cv.pdf")
            },
            "/"
        ),
        LinkAction::Ignore
    );
}

#[test]
fn hashes_on_the_current_page_go_to_the_slide_deck() {
    assert_eq!(classify(&click("#about"), "/"), LinkAction::SamePageHash);
    assert_eq!(classify(&click("/#projects"), "/"), LinkAction::SamePageHash);
    // a hash on another page is a real navigation that keeps its slide
    assert_eq!(
        classify(&click("/#projects"), "/blog"),
        LinkAction::Transition("/#projects".to_string())
    );
}

#[test]
fn same_path_is_forwarded_for_rejection() {
    assert_eq!(
        classify(&click("/blog"), "/blog"),
        LinkAction::Transition("/blog".to_string())
    );
}

#[test]
fn route_path_strips_query_and_hash() {
    assert_eq!(route_path("/a/b?x=1"), "/a/b");
    assert_eq!(route_path("/a#b"), "/a");
    assert_eq!(route_path("#b"), "");
    assert!(is_external("HTTPS://EXAMPLE.ORG"));
    assert!(!is_external("/about"));
}
