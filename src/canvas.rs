use crate::constants::{css_rgb, ACCENT_RGB, INK_RGB, TRACK_DASH_CSS, TRACK_LINE_WIDTH_CSS};
use blueprint_core::{DrawList, Tone};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Paints a `DrawList` with Canvas2D: dashed ellipses for orbit tracks and
/// filled squares for every dot. No depth sorting; list order is paint order.
pub struct CanvasPainter {
    ctx: web::CanvasRenderingContext2d,
    ink: JsValue,
    accent: JsValue,
}

impl CanvasPainter {
    pub fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext failed: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self {
            ctx,
            ink: JsValue::from_str(&css_rgb(INK_RGB)),
            accent: JsValue::from_str(&css_rgb(ACCENT_RGB)),
        })
    }

    fn color(&self, tone: Tone) -> &JsValue {
        match tone {
            Tone::Ink => &self.ink,
            Tone::Accent => &self.accent,
        }
    }

    pub fn paint(&self, list: &DrawList, width: f64, height: f64, dpr: f64) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.clear_rect(0.0, 0.0, width, height);

        if !list.tracks.is_empty() {
            let dash = js_sys::Array::new();
            for d in TRACK_DASH_CSS {
                dash.push(&JsValue::from_f64(d * dpr));
            }
            _ = ctx.set_line_dash(&dash);
            ctx.set_line_width(TRACK_LINE_WIDTH_CSS * dpr);
            #[allow(deprecated)]
            ctx.set_stroke_style(&self.ink);
            for t in &list.tracks {
                if t.alpha <= 0.0 {
                    continue;
                }
                ctx.set_global_alpha(t.alpha as f64);
                ctx.begin_path();
                _ = ctx.ellipse(
                    t.center.x as f64,
                    t.center.y as f64,
                    t.rx.max(0.0) as f64,
                    t.ry.max(0.0) as f64,
                    0.0,
                    0.0,
                    TAU,
                );
                ctx.stroke();
            }
            _ = ctx.set_line_dash(&js_sys::Array::new());
        }

        let mut tone = None;
        for d in &list.dots {
            if d.alpha <= 0.0 {
                continue;
            }
            if tone != Some(d.tone) {
                #[allow(deprecated)]
                ctx.set_fill_style(self.color(d.tone));
                tone = Some(d.tone);
            }
            let half = d.size * 0.5;
            ctx.set_global_alpha(d.alpha as f64);
            ctx.fill_rect(
                (d.x - half) as f64,
                (d.y - half) as f64,
                d.size as f64,
                d.size as f64,
            );
        }
        ctx.set_global_alpha(1.0);
    }
}
