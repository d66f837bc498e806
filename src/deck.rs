use crate::constants::{
    ACTIVE_SLIDE_CLASS, DIRECTION_ATTR, FOCUSED_CARD_CLASS, HOME_PATH, PROJECT_CARD_SELECTOR,
    SLIDES_ID,
};
use crate::dom::{self, set_class};
use blueprint_core::constants::SLIDE_ANIMATION_MS;
use blueprint_core::{
    Direction, GlobeContext, Scheduler, SlideChange, SlideCommand, SlideDeck, SlideTarget,
    TimerSlot,
};
use std::cell::Cell;
use std::rc::{Rc, Weak};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// DOM side of the slide deck on the home route.
pub struct DeckView {
    document: web::Document,
    deck: SlideDeck,
    ctx: GlobeContext,
    finish_timer: TimerSlot,
    reduced_motion: Rc<Cell<bool>>,
}

impl DeckView {
    pub fn new(
        document: web::Document,
        ctx: GlobeContext,
        scheduler: Rc<dyn Scheduler>,
        reduced_motion: Rc<Cell<bool>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            document,
            deck: SlideDeck::new(ctx.slide.clone()),
            ctx,
            finish_timer: TimerSlot::new(scheduler),
            reduced_motion,
        })
    }

    /// The deck only exists while the home route is mounted.
    pub fn is_mounted(&self) -> bool {
        self.document.get_element_by_id(SLIDES_ID).is_some()
    }

    pub fn apply(self: &Rc<Self>, cmd: SlideCommand) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match self.deck.apply(cmd) {
            Some(change) => {
                self.begin(change);
                true
            }
            None => false,
        }
    }

    pub fn go_to(self: &Rc<Self>, target: SlideTarget) -> bool {
        let Some(index) = target.deck_index() else {
            return false;
        };
        if !self.is_mounted() {
            return false;
        }
        match self.deck.navigate_to(index) {
            Some(change) => {
                self.begin(change);
                true
            }
            None => false,
        }
    }

    /// React to a route change: the home route restores the deck slide from
    /// the URL hash, every other route parks the globe in its ambient spot.
    pub fn sync_route(&self, path: &str) {
        if path != HOME_PATH || !self.is_mounted() {
            self.ctx.slide.set(SlideTarget::Ambient);
            return;
        }
        let index = SlideTarget::from_hash(&dom::current_hash())
            .and_then(SlideTarget::deck_index)
            .unwrap_or(0);
        self.deck.jump_to(index);
        self.show(index, None);
    }

    /// Scroll position of the active slide, for wheel gating.
    pub fn scroll_bounds(&self) -> (bool, bool) {
        let id = self.deck.active_slide().id();
        match self.document.get_element_by_id(id) {
            Some(el) => {
                let top = el.scroll_top();
                let at_top = top <= 0;
                let at_bottom = top + el.client_height() >= el.scroll_height() - 1;
                (at_top, at_bottom)
            }
            None => (true, true),
        }
    }

    fn begin(self: &Rc<Self>, change: SlideChange) {
        log::debug!(
            "[deck] {} -> {} ({:?})",
            change.from,
            change.to,
            change.direction
        );
        self.show(change.to, Some(change.direction));
        self.write_hash(SlideTarget::DECK[change.to]);

        let delay = if self.reduced_motion.get() {
            0
        } else {
            SLIDE_ANIMATION_MS
        };
        let weak: Weak<Self> = Rc::downgrade(self);
        self.finish_timer.arm(delay, move || {
            if let Some(view) = weak.upgrade() {
                view.deck.finish();
            }
        });
    }

    fn show(&self, active: usize, direction: Option<Direction>) {
        if let (Some(container), Some(dir)) = (self.document.get_element_by_id(SLIDES_ID), direction)
        {
            let value = match dir {
                Direction::Forward => "forward",
                Direction::Backward => "backward",
            };
            _ = container.set_attribute(DIRECTION_ATTR, value);
        }
        for (i, slide) in SlideTarget::DECK.iter().enumerate() {
            if let Some(el) = self.document.get_element_by_id(slide.id()) {
                set_class(&el, ACTIVE_SLIDE_CLASS, i == active);
                _ = el.set_attribute("aria-hidden", if i == active { "false" } else { "true" });
            }
        }
    }

    fn write_hash(&self, slide: SlideTarget) {
        let Some(history) = web::window().and_then(|w| w.history().ok()) else {
            return;
        };
        let url = format!("#{}", slide.id());
        _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}

/// While the projects slide is active, clicking an orbit marker focuses the
/// matching project card.
pub fn wire_marker_focus(ctx: &GlobeContext, document: web::Document) {
    let slot = ctx.marker_click.clone();
    ctx.slide.subscribe(move |slide| {
        if *slide != SlideTarget::Projects {
            slot.clear();
            clear_card_focus(&document);
            return;
        }
        let doc = document.clone();
        slot.set(move |index| focus_card(&doc, index));
    });
}

fn project_cards(document: &web::Document) -> Vec<web::Element> {
    let Ok(list) = document.query_selector_all(PROJECT_CARD_SELECTOR) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<web::Element>().ok())
        .collect()
}

fn clear_card_focus(document: &web::Document) {
    for card in project_cards(document) {
        set_class(&card, FOCUSED_CARD_CLASS, false);
    }
}

fn focus_card(document: &web::Document, index: usize) {
    let cards = project_cards(document);
    for (i, card) in cards.iter().enumerate() {
        set_class(card, FOCUSED_CARD_CLASS, i == index);
    }
    if let Some(card) = cards.get(index) {
        log::debug!("[deck] marker {} focused its project card", index);
        card.scroll_into_view();
    }
}
