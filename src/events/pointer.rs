use crate::dom;
use blueprint_core::{GlobeContext, GlobeScene};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
pub struct MarkerWiring {
    pub layer: web::HtmlElement,
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<GlobeScene>>,
    pub ctx: GlobeContext,
}

pub fn wire_marker_layer(w: MarkerWiring) {
    wire_pointermove(&w);
    wire_pointerleave(&w);
    wire_click(&w);
}

/// Pointer position in CSS pixels relative to the canvas, which is the frame
/// the orbit hit targets are expressed in.
fn canvas_css_pos(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (ev.client_x() as f64 - rect.left()) as f32,
        (ev.client_y() as f64 - rect.top()) as f32,
    )
}

fn set_hover(layer: &web::HtmlElement, hovered: Option<usize>) {
    let style = layer.style();
    match hovered {
        Some(i) => {
            _ = style.set_property("cursor", "pointer");
            _ = layer.set_attribute("data-hover", &i.to_string());
        }
        None => {
            _ = style.remove_property("cursor");
            _ = layer.remove_attribute("data-hover");
        }
    }
}

fn wire_pointermove(w: &MarkerWiring) {
    let w = w.clone();
    let target = w.layer.clone();
    dom::listen(&target, "pointermove", move |ev: web::PointerEvent| {
        let p = canvas_css_pos(&ev, &w.canvas);
        let hovered = match w.scene.try_borrow() {
            Ok(scene) => scene.orbits().hit_test(p.x, p.y),
            Err(_) => return,
        };
        set_hover(&w.layer, hovered);
    });
}

fn wire_pointerleave(w: &MarkerWiring) {
    let layer = w.layer.clone();
    let target = w.layer.clone();
    dom::listen(&target, "pointerleave", move |_: web::PointerEvent| {
        set_hover(&layer, None);
    });
}

fn wire_click(w: &MarkerWiring) {
    let w = w.clone();
    let target = w.layer.clone();
    dom::listen(&target, "click", move |ev: web::MouseEvent| {
        let p = canvas_css_pos(&ev, &w.canvas);
        let hit = match w.scene.try_borrow() {
            Ok(scene) => w.ctx.marker_click.dispatch(scene.orbits(), p.x, p.y),
            Err(_) => None,
        };
        if let Some(i) = hit {
            log::info!("[pointer] marker {} clicked", i);
            ev.stop_propagation();
        }
    });
}
