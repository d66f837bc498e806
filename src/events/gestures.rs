use crate::constants::SLIDES_ID;
use crate::deck::DeckView;
use crate::dom;
use blueprint_core::{classify_swipe, SlideTarget, WheelGate};
use std::cell::Cell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone, Copy, Debug)]
struct TouchStart {
    x: f32,
    y: f32,
    at_ms: f64,
}

/// Wheel, swipe and hash navigation for the deck. Listeners sit on the
/// document so they survive route swaps; each checks the deck is mounted.
pub fn wire_deck_gestures(document: &web::Document, deck: Rc<DeckView>) {
    wire_wheel(document, deck.clone());
    wire_touch(document, deck.clone());
    wire_hashchange(deck);
}

fn inside_slides(ev: &web::Event) -> bool {
    ev.target()
        .and_then(|t| wasm_bindgen::JsCast::dyn_into::<web::Element>(t).ok())
        .and_then(|el| el.closest(&format!("#{}", SLIDES_ID)).ok().flatten())
        .is_some()
}

fn wire_wheel(document: &web::Document, deck: Rc<DeckView>) {
    let gate = WheelGate::default();
    dom::listen(document, "wheel", move |ev: web::WheelEvent| {
        if !deck.is_mounted() || !inside_slides(&ev) {
            return;
        }
        let (at_top, at_bottom) = deck.scroll_bounds();
        if let Some(cmd) = gate.command(ev.delta_y(), at_top, at_bottom, dom::now_ms()) {
            deck.apply(cmd);
        }
    });
}

fn wire_touch(document: &web::Document, deck: Rc<DeckView>) {
    let start: Rc<Cell<Option<TouchStart>>> = Rc::new(Cell::new(None));

    let start_down = start.clone();
    dom::listen(document, "touchstart", move |ev: web::TouchEvent| {
        let touch = ev.touches().get(0);
        start_down.set(touch.map(|t| TouchStart {
            x: t.client_x() as f32,
            y: t.client_y() as f32,
            at_ms: dom::now_ms(),
        }));
    });

    dom::listen(document, "touchend", move |ev: web::TouchEvent| {
        let Some(s) = start.take() else {
            return;
        };
        if !deck.is_mounted() || !inside_slides(&ev) {
            return;
        }
        let Some(t) = ev.changed_touches().get(0) else {
            return;
        };
        let dx = t.client_x() as f32 - s.x;
        let dy = t.client_y() as f32 - s.y;
        if let Some(cmd) = classify_swipe(dx, dy, dom::now_ms() - s.at_ms) {
            deck.apply(cmd);
        }
    });
}

fn wire_hashchange(deck: Rc<DeckView>) {
    let Some(window) = web::window() else {
        return;
    };
    dom::listen(&window, "hashchange", move |_: web::Event| {
        if let Some(target) = SlideTarget::from_hash(&dom::current_hash()) {
            deck.go_to(target);
        }
    });
}
