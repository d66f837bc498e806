use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING};
use blueprint_core::{reduce_bands, BandSource, FrequencyBands, Observable, PlayerControls};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Reads byte magnitudes from an attached analyser. Reports silence while
/// detached.
#[derive(Default)]
pub struct AnalyserBands {
    analyser: Option<web::AnalyserNode>,
    buf: Vec<u8>,
}

impl AnalyserBands {
    pub fn attach(&mut self, analyser: web::AnalyserNode) {
        self.buf.resize(analyser.frequency_bin_count() as usize, 0);
        self.analyser = Some(analyser);
    }

    pub fn detach(&mut self) {
        self.analyser = None;
    }
}

impl BandSource for AnalyserBands {
    fn bands(&mut self) -> FrequencyBands {
        match &self.analyser {
            Some(a) => {
                a.get_byte_frequency_data(&mut self.buf);
                reduce_bands(&self.buf)
            }
            None => FrequencyBands::SILENT,
        }
    }
}

struct AudioGraph {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    _source: web::MediaElementAudioSourceNode,
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn build_graph(element: &web::HtmlAudioElement) -> anyhow::Result<AudioGraph> {
    let ctx = web::AudioContext::new().map_err(js_err)?;
    let source = ctx
        .create_media_element_source(element)
        .map_err(js_err)?;
    let analyser = ctx.create_analyser().map_err(js_err)?;
    analyser.set_fft_size(ANALYSER_FFT_SIZE);
    analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
    source
        .connect_with_audio_node(&analyser)
        .map_err(js_err)?;
    analyser
        .connect_with_audio_node(&ctx.destination())
        .map_err(js_err)?;
    log::info!(
        "[audio] graph ready: {} bins",
        analyser.frequency_bin_count()
    );
    Ok(AudioGraph {
        ctx,
        analyser,
        _source: source,
    })
}

/// Ambient track player. The audio graph is built on the first user gesture
/// because browsers refuse to start an `AudioContext` before one.
pub struct AudioPlayer {
    element: web::HtmlAudioElement,
    graph: RefCell<Option<AudioGraph>>,
    bands: Rc<RefCell<AnalyserBands>>,
    playing: Observable<bool>,
    controls: RefCell<PlayerControls>,
    offline: Observable<bool>,
}

impl AudioPlayer {
    pub fn new(
        element: web::HtmlAudioElement,
        bands: Rc<RefCell<AnalyserBands>>,
        playing: Observable<bool>,
    ) -> Rc<Self> {
        let controls = PlayerControls::default();
        element.set_volume(controls.output_volume() as f64);
        Rc::new(Self {
            element,
            graph: RefCell::new(None),
            bands,
            playing,
            controls: RefCell::new(controls),
            offline: Observable::new(false),
        })
    }

    pub fn element(&self) -> &web::HtmlAudioElement {
        &self.element
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// True after the stream failed; cleared by the next play attempt.
    pub fn offline(&self) -> &Observable<bool> {
        &self.offline
    }

    pub fn controls(&self) -> PlayerControls {
        *self.controls.borrow()
    }

    pub async fn toggle(self: Rc<Self>) -> anyhow::Result<()> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play().await
        }
    }

    pub async fn play(&self) -> anyhow::Result<()> {
        let (ctx, analyser) = {
            let mut graph = self.graph.borrow_mut();
            if graph.is_none() {
                *graph = Some(build_graph(&self.element)?);
            }
            match graph.as_ref() {
                Some(g) => (g.ctx.clone(), g.analyser.clone()),
                None => anyhow::bail!("audio graph unavailable"),
            }
        };
        JsFuture::from(ctx.resume().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let reload = self.controls.borrow_mut().begin_play();
        self.offline.set(false);
        if reload {
            log::info!("[audio] reloading stream after failure");
            self.element.load();
        }
        let started = match self.element.play() {
            Ok(p) => JsFuture::from(p).await,
            Err(e) => Err(e),
        };
        if let Err(e) = started {
            self.failed();
            return Err(js_err(e));
        }
        self.bands.borrow_mut().attach(analyser);
        self.playing.set(true);
        Ok(())
    }

    pub fn pause(&self) {
        _ = self.element.pause();
        self.stopped();
    }

    /// Playback ended or paused from outside (media keys, `ended`).
    pub fn stopped(&self) {
        self.bands.borrow_mut().detach();
        self.playing.set(false);
    }

    /// The media element reported an error, or `play()` was refused.
    pub fn failed(&self) {
        log::warn!("[audio] stream offline");
        self.controls.borrow_mut().mark_offline();
        self.offline.set(true);
        self.stopped();
    }

    /// Slider input in `[0, 1]`.
    pub fn set_volume(&self, volume: f32) {
        let out = self.controls.borrow_mut().set_volume(volume);
        self.element.set_volume(out as f64);
    }

    /// Returns whether the player is now muted.
    pub fn toggle_mute(&self) -> bool {
        let mut c = self.controls.borrow_mut();
        let out = c.toggle_mute();
        self.element.set_volume(out as f64);
        c.is_muted()
    }
}
