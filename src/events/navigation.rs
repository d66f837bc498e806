use crate::constants::{CONTENT_ID, ROUTE_TEMPLATE_ATTR};
use crate::deck::DeckView;
use crate::dom;
use crate::links::{classify, route_path, LinkAction, LinkClick};
use blueprint_core::TransitionCoordinator;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Swaps `#page-content` between routes declared as
/// `<template data-route="/path">` in the page.
pub struct Router {
    document: web::Document,
    deck: Rc<DeckView>,
    mounted: RefCell<String>,
}

impl Router {
    pub fn new(document: web::Document, deck: Rc<DeckView>) -> Rc<Self> {
        Rc::new(Self {
            document,
            deck,
            mounted: RefCell::new(dom::current_path()),
        })
    }

    pub fn mounted_path(&self) -> String {
        self.mounted.borrow().clone()
    }

    fn template_for(&self, path: &str) -> Option<web::HtmlTemplateElement> {
        let selector = format!("template[{}=\"{}\"]", ROUTE_TEMPLATE_ATTR, path);
        self.document
            .query_selector(&selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<web::HtmlTemplateElement>().ok())
    }

    /// Replace the page content with the route's template. Returns false when
    /// the route is not known to this page.
    pub fn mount(&self, path: &str) -> bool {
        let (Some(template), Some(content)) = (
            self.template_for(path),
            self.document.get_element_by_id(CONTENT_ID),
        ) else {
            return false;
        };
        let Ok(fragment) = template.content().clone_node_with_deep(true) else {
            return false;
        };
        content.set_inner_html("");
        if let Err(e) = content.append_child(&fragment) {
            log::error!("[nav] mount {} failed: {:?}", path, e);
            return false;
        }
        *self.mounted.borrow_mut() = path.to_string();
        self.deck.sync_route(path);
        log::debug!("[nav] mounted {}", path);
        true
    }

    /// Mount whatever the address bar points at, if the content is empty.
    pub fn mount_initial(&self) {
        let path = dom::current_path();
        let empty = self
            .document
            .get_element_by_id(CONTENT_ID)
            .map(|c| c.child_element_count() == 0)
            .unwrap_or(false);
        if !empty || !self.mount(&path) {
            self.deck.sync_route(&path);
        }
    }
}

/// Connect the coordinator's navigation and reveal hooks to the router.
pub fn wire_coordinator(coordinator: &Rc<TransitionCoordinator>, router: Rc<Router>) {
    let coord = Rc::downgrade(coordinator);
    coordinator.set_navigator(move |href| {
        let Some(window) = web::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            _ = history.push_state_with_url(&JsValue::NULL, "", Some(href));
        }
        // The full href is pushed so the mounted page can read its hash.
        let path = route_path(href);
        if !router.mount(path) {
            // Unknown to this page: fall back to a full load.
            _ = window.location().set_href(href);
            return;
        }
        if let Some(c) = coord.upgrade() {
            c.location_changed(path);
        }
    });
    coordinator.set_reveal(|| {
        if let Some(window) = web::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    });
}

fn link_from_click(ev: &web::MouseEvent) -> Option<web::HtmlAnchorElement> {
    ev.target()?
        .dyn_into::<web::Element>()
        .ok()?
        .closest("a[href]")
        .ok()??
        .dyn_into::<web::HtmlAnchorElement>()
        .ok()
}

/// Intercept internal link clicks and run them through the coordinator.
pub fn wire_link_interception(
    document: &web::Document,
    coordinator: Rc<TransitionCoordinator>,
    reduced_motion: Rc<Cell<bool>>,
) {
    dom::listen(document, "click", move |ev: web::MouseEvent| {
        if ev.default_prevented() {
            return;
        }
        let Some(anchor) = link_from_click(&ev) else {
            return;
        };
        let href = anchor.get_attribute("href").unwrap_or_default();
        let target = anchor.get_attribute("target");
        let click = LinkClick {
            href: &href,
            target: target.as_deref(),
            download: anchor.has_attribute("download"),
            button: ev.button(),
            meta: ev.meta_key(),
            ctrl: ev.ctrl_key(),
            shift: ev.shift_key(),
            alt: ev.alt_key(),
        };
        let current = dom::current_path();
        let LinkAction::Transition(dest) = classify(&click, &current) else {
            return;
        };
        ev.prevent_default();
        match coordinator.request(&dest, &current, reduced_motion.get()) {
            Ok(plan) => log::debug!("[nav] {} accepted: {:?}", dest, plan),
            Err(e) => log::debug!("[nav] {} dropped: {}", dest, e),
        }
    });
}

/// Back/forward: mount the route the history entry points at.
pub fn wire_popstate(router: Rc<Router>, coordinator: Rc<TransitionCoordinator>) {
    let Some(window) = web::window() else {
        return;
    };
    dom::listen(&window, "popstate", move |_: web::Event| {
        let path = dom::current_path();
        // Hash-only entries belong to the slide deck.
        if path == router.mounted_path() {
            return;
        }
        if !router.mount(&path) {
            if let Some(w) = web::window() {
                _ = w.location().reload();
            }
            return;
        }
        coordinator.location_changed(&path);
    });
}
