#![cfg(target_arch = "wasm32")]
use blueprint_core::{
    DrawList, GlobeContext, GlobePhase, GlobeScene, LoaderTimings, PageLoader, Scheduler,
};
use constants::*;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod canvas;
mod constants;
mod deck;
mod dom;
mod events;
mod frame;
mod links;
mod overlay;
mod timers;

/// Everything that must live as long as the page.
struct App {
    _loader: Rc<PageLoader>,
    _renderer: Rc<frame::Renderer>,
    _player: Option<Rc<audio::AudioPlayer>>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("blueprint-web starting");

    match init() {
        Ok(app) => APP.with(|slot| *slot.borrow_mut() = Some(app)),
        Err(e) => log::error!("init error: {:?}", e),
    }
    Ok(())
}

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement, renderer: &Rc<frame::Renderer>) {
    dom::sync_canvas_backing_size(canvas);
    let Some(window) = web::window() else {
        return;
    };
    let canvas_resize = canvas.clone();
    let renderer = Rc::downgrade(renderer);
    dom::listen(&window, "resize", move |_: web::Event| {
        dom::sync_canvas_backing_size(&canvas_resize);
        if let Some(r) = renderer.upgrade() {
            r.redraw_if_static();
        }
    });
}

fn wire_state_observers(
    ctx: &GlobeContext,
    document: &web::Document,
    renderer: &Rc<frame::Renderer>,
) {
    let doc = document.clone();
    let r = Rc::downgrade(renderer);
    ctx.phase.observable().subscribe(move |phase| {
        log::info!("[globe] phase {:?}", phase);
        overlay::set_content_revealed(&doc, *phase == GlobePhase::Ready);
        if let Some(r) = r.upgrade() {
            r.redraw_if_static();
        }
    });

    let r = Rc::downgrade(renderer);
    ctx.slide.subscribe(move |_| {
        if let Some(r) = r.upgrade() {
            r.redraw_if_static();
        }
    });

    let doc = document.clone();
    let r = Rc::downgrade(renderer);
    ctx.show_markers.subscribe(move |on| {
        overlay::set_pressed(&doc, MARKERS_TOGGLE_ID, *on);
        if let Some(r) = r.upgrade() {
            r.redraw_if_static();
        }
    });

    let doc = document.clone();
    ctx.transition.observable().subscribe(move |phase| {
        overlay::set_transition_phase(&doc, *phase);
    });

    let doc = document.clone();
    ctx.audio_playing.subscribe(move |on| {
        overlay::set_pressed(&doc, AUDIO_TOGGLE_ID, *on);
    });

    overlay::set_content_revealed(document, ctx.content_revealed());
    overlay::set_transition_phase(document, ctx.transition.phase());
    overlay::set_pressed(document, MARKERS_TOGGLE_ID, ctx.show_markers.get());
    overlay::set_pressed(document, AUDIO_TOGGLE_ID, ctx.audio_playing.get());
}

fn wire_reduced_motion(reduced: Rc<Cell<bool>>, renderer: Rc<frame::Renderer>) {
    let Some(query) = dom::reduced_motion_query() else {
        return;
    };
    let q = query.clone();
    dom::listen(&query, "change", move |_: web::Event| {
        let on = q.matches();
        log::info!("[globe] reduced motion {}", if on { "on" } else { "off" });
        reduced.set(on);
        renderer.set_reduced_motion(on);
    });
}

fn wire_audio(
    document: &web::Document,
    ctx: &GlobeContext,
    bands: &Rc<RefCell<audio::AnalyserBands>>,
) -> Option<Rc<audio::AudioPlayer>> {
    let element = dom::element_by_id::<web::HtmlAudioElement>(document, AUDIO_ID).ok()?;
    let player = audio::AudioPlayer::new(element, bands.clone(), ctx.audio_playing.clone());

    let p = player.clone();
    dom::add_click_listener(document, AUDIO_TOGGLE_ID, move || {
        let p = p.clone();
        spawn_local(async move {
            if let Err(e) = p.toggle().await {
                log::error!("[audio] toggle failed: {:?}", e);
            }
        });
    });
    for event in ["ended", "pause"] {
        let p = Rc::downgrade(&player);
        dom::listen(player.element(), event, move |_: web::Event| {
            if let Some(p) = p.upgrade() {
                p.stopped();
            }
        });
    }
    let p = Rc::downgrade(&player);
    dom::listen(player.element(), "error", move |_: web::Event| {
        if let Some(p) = p.upgrade() {
            p.failed();
        }
    });

    let doc = document.clone();
    player
        .offline()
        .subscribe(move |off| overlay::set_offline(&doc, AUDIO_TOGGLE_ID, *off));

    let p = player.clone();
    let doc = document.clone();
    dom::add_click_listener(document, AUDIO_MUTE_ID, move || {
        let muted = p.toggle_mute();
        overlay::set_pressed(&doc, AUDIO_MUTE_ID, muted);
    });
    overlay::set_pressed(document, AUDIO_MUTE_ID, player.controls().is_muted());

    if let Ok(slider) = dom::element_by_id::<web::HtmlInputElement>(document, AUDIO_VOLUME_ID) {
        slider.set_value(&player.controls().volume().to_string());
        let p = player.clone();
        let doc = document.clone();
        let input = slider.clone();
        dom::listen(&slider, "input", move |_: web::Event| {
            let v = input.value_as_number();
            if v.is_finite() {
                p.set_volume(v as f32);
                overlay::set_pressed(&doc, AUDIO_MUTE_ID, p.controls().is_muted());
            }
        });
    }
    Some(player)
}

fn init() -> anyhow::Result<App> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let scheduler: Rc<dyn Scheduler> = Rc::new(timers::WindowScheduler::new(window.clone()));
    let ctx = GlobeContext::new(scheduler.clone());
    let reduced = Rc::new(Cell::new(dom::prefers_reduced_motion()));

    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?;
    let marker_layer = dom::element_by_id::<web::HtmlElement>(&document, MARKER_LAYER_ID).ok();
    let scene = Rc::new(RefCell::new(GlobeScene::new(rand::random())));
    let bands = Rc::new(RefCell::new(audio::AnalyserBands::default()));

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        ctx: ctx.clone(),
        scene: scene.clone(),
        painter: canvas::CanvasPainter::new(&canvas)?,
        canvas: canvas.clone(),
        marker_layer: marker_layer.clone(),
        bands: bands.clone(),
        draw: DrawList::default(),
        last_instant: Instant::now(),
        pointer_enabled: None,
    }));
    let renderer = frame::Renderer::new(frame_ctx, scheduler.clone());
    wire_canvas_resize(&canvas, &renderer);
    wire_state_observers(&ctx, &document, &renderer);

    // Slide deck, marker focus, and the route swapper
    deck::wire_marker_focus(&ctx, document.clone());
    let deck_view =
        deck::DeckView::new(document.clone(), ctx.clone(), scheduler.clone(), reduced.clone());
    let router = events::navigation::Router::new(document.clone(), deck_view.clone());
    router.mount_initial();
    events::navigation::wire_coordinator(&ctx.transition, router.clone());
    events::navigation::wire_link_interception(
        &document,
        ctx.transition.clone(),
        reduced.clone(),
    );
    events::navigation::wire_popstate(router, ctx.transition.clone());
    events::keyboard::wire_slide_keys(deck_view.clone());
    events::gestures::wire_deck_gestures(&document, deck_view);

    if let Some(layer) = marker_layer {
        events::pointer::wire_marker_layer(events::pointer::MarkerWiring {
            layer,
            canvas: canvas.clone(),
            scene,
            ctx: ctx.clone(),
        });
    }
    {
        let show = ctx.show_markers.clone();
        dom::add_click_listener(&document, MARKERS_TOGGLE_ID, move || {
            show.set(!show.get());
        });
    }
    let player = wire_audio(&document, &ctx, &bands);

    // Loader choreography drives Loading -> Transitioning; frames finish it.
    let loader = PageLoader::new(ctx.phase.clone(), scheduler, LoaderTimings::default());
    {
        let doc = document.clone();
        loader
            .visible()
            .subscribe(move |v| overlay::set_loader_visible(&doc, *v));
    }
    overlay::set_loader_visible(&document, loader.visible().get());
    loader.start();

    renderer.set_reduced_motion(reduced.get());
    wire_reduced_motion(reduced, renderer.clone());

    log::info!("blueprint-web ready");
    Ok(App {
        _loader: loader,
        _renderer: renderer,
        _player: player,
    })
}
