use crate::deck::DeckView;
use crate::dom;
use blueprint_core::SlideCommand;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys typed into form fields never move the deck.
fn is_editable_target(ev: &web::KeyboardEvent) -> bool {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<web::Element>().ok()) else {
        return false;
    };
    let tag = el.tag_name().to_ascii_lowercase();
    matches!(tag.as_str(), "input" | "textarea" | "select")
        || el.get_attribute("contenteditable").is_some()
}

pub fn handle_slide_keydown(ev: &web::KeyboardEvent, deck: &Rc<DeckView>) {
    if ev.default_prevented() || ev.meta_key() || ev.ctrl_key() || ev.alt_key() {
        return;
    }
    if is_editable_target(ev) {
        return;
    }
    let Some(cmd) = SlideCommand::from_key(&ev.key()) else {
        return;
    };
    if deck.apply(cmd) {
        ev.prevent_default();
    } else if deck.is_mounted() {
        // Swallow arrows mid-animation so the page doesn't scroll instead.
        ev.prevent_default();
    }
}

pub fn wire_slide_keys(deck: Rc<DeckView>) {
    let Some(window) = web::window() else {
        return;
    };
    dom::listen(&window, "keydown", move |ev: web::KeyboardEvent| {
        handle_slide_keydown(&ev, &deck);
    });
}
