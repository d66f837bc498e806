// Which anchor clicks become animated page transitions.
//
// Pure string logic so it can be tested on the host.

/// Snapshot of a click on an `<a>` element.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkClick<'a> {
    /// Raw `href` attribute, not the resolved URL.
    pub href: &'a str,
    pub target: Option<&'a str>,
    pub download: bool,
    pub button: i16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkAction {
    /// Let the browser handle it.
    Ignore,
    /// A hash on the current page; the slide deck reacts via `hashchange`.
    SamePageHash,
    /// Run the transition choreography toward this href. Query and hash are
    /// kept so the destination page can restore its slide.
    Transition(String),
}

pub fn is_external(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("//")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
}

/// Path part of an internal href, without query or hash. Empty for a bare
/// `#hash`.
pub fn route_path(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    &href[..end]
}

pub fn classify(click: &LinkClick<'_>, current_path: &str) -> LinkAction {
    if click.meta || click.ctrl || click.shift || click.alt || click.button != 0 {
        return LinkAction::Ignore;
    }
    if click.download || click.target.is_some_and(|t| !t.is_empty() && t != "_self") {
        return LinkAction::Ignore;
    }
    let href = click.href.trim();
    if href.is_empty() || is_external(href) {
        return LinkAction::Ignore;
    }
    let path = route_path(href);
    let has_hash = href.contains('#');
    if path.is_empty() {
        return if has_hash {
            LinkAction::SamePageHash
        } else {
            LinkAction::Ignore
        };
    }
    if path == current_path && has_hash {
        return LinkAction::SamePageHash;
    }
    // Same path without a hash still goes through the coordinator, which
    // rejects it as a no-op.
    LinkAction::Transition(href.to_string())
}
