use crate::constants::{
    CONTENT_ID, HIDDEN_CLASS, LOADER_ID, OFFLINE_ATTR, REVEALED_CLASS, TRANSITION_ATTR,
};
use crate::dom::set_class;
use blueprint_core::TransitionPhase;
use web_sys as web;

/// Show or hide the page loader overlay.
pub fn set_loader_visible(document: &web::Document, visible: bool) {
    if let Some(el) = document.get_element_by_id(LOADER_ID) {
        set_class(&el, HIDDEN_CLASS, !visible);
        _ = el.set_attribute("aria-hidden", if visible { "false" } else { "true" });
    }
}

/// Page content stays hidden until the globe reaches `Ready`.
pub fn set_content_revealed(document: &web::Document, revealed: bool) {
    if let Some(el) = document.get_element_by_id(CONTENT_ID) {
        set_class(&el, REVEALED_CLASS, revealed);
    }
}

/// Mirror the transition phase onto `<body>` so CSS can run the exit and
/// reveal animations.
pub fn set_transition_phase(document: &web::Document, phase: TransitionPhase) {
    if let Some(body) = document.body() {
        let value = match phase {
            TransitionPhase::Idle => "idle",
            TransitionPhase::Exiting => "exiting",
            TransitionPhase::Entering => "entering",
        };
        _ = body.set_attribute(TRANSITION_ATTR, value);
    }
}

pub fn set_pressed(document: &web::Document, id: &str, pressed: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.set_attribute("aria-pressed", if pressed { "true" } else { "false" });
    }
}

/// Flag a control whose backing stream is unreachable.
pub fn set_offline(document: &web::Document, id: &str, offline: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = if offline {
            el.set_attribute(OFFLINE_ATTR, "")
        } else {
            el.remove_attribute(OFFLINE_ATTR)
        };
    }
}
