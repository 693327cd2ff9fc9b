//! Canvas 2D render surface (WASM only)
//!
//! Sprites are drawn from the image cache; anything still loading or missing
//! is skipped for that frame.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::{DrawCommand, RenderSurface, sprites};
use crate::platform::{ResourceCache, ResourceLookup};

const FONT_FAMILY: &str = "Courier, monospace";
const TEXT_STROKE_WIDTH: f64 = 5.0;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    /// Filled in by `onload` handlers as sprites finish decoding
    images: Rc<RefCell<ResourceCache<HtmlImageElement>>>,
}

impl CanvasSurface {
    /// Wrap the canvas' 2D context. Returns `None` if the context is unavailable.
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            images: Rc::new(RefCell::new(ResourceCache::new())),
        })
    }

    /// Start loading every sprite. Each one becomes drawable once its
    /// `onload` fires; failed loads stay pending and are never drawn.
    pub fn load_sprites(&mut self, document: &Document) {
        for id in sprites::ALL {
            self.images.borrow_mut().request(id);
            let Some(image) = document
                .create_element("img")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
            else {
                log::warn!("Could not create image element for {id}");
                continue;
            };

            let images = self.images.clone();
            let loaded = image.clone();
            let onload = Closure::once(move || {
                let mut cache = images.borrow_mut();
                cache.ready(id, loaded);
                if cache.all_ready() {
                    log::info!("All {} sprites loaded", sprites::ALL.len());
                }
            });
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = Closure::once(move || log::warn!("Failed to load sprite {id}"));
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            image.set_src(id);
        }
    }

    fn draw_sprite(&self, id: &str, rect: &crate::Rect, flip_y: bool, rotation: f32) {
        let images = self.images.borrow();
        let Some(image) = images.get(id) else {
            return;
        };

        let (w, h) = (rect.size.x as f64, rect.size.y as f64);
        let center = rect.center();

        self.ctx.save();
        let _ = self.ctx.translate(center.x as f64, center.y as f64);
        if rotation != 0.0 {
            let _ = self.ctx.rotate(rotation as f64);
        }
        if flip_y {
            let _ = self.ctx.scale(1.0, -1.0);
        }
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, -w / 2.0, -h / 2.0, w, h);
        self.ctx.restore();
    }

    fn draw_text(&self, text: &str, x: f32, y: f32, size: f32) {
        self.ctx.set_font(&format!("{size}px {FONT_FAMILY}"));
        self.ctx.set_text_align("center");
        self.ctx.set_stroke_style_str("black");
        self.ctx.set_line_width(TEXT_STROKE_WIDTH);
        let _ = self.ctx.stroke_text(text, x as f64, y as f64);
        self.ctx.set_fill_style_str("white");
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }
}

impl RenderSurface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Sprite {
                id,
                rect,
                flip_y,
                rotation,
            } => self.draw_sprite(id, rect, *flip_y, *rotation),
            DrawCommand::Text { text, x, y, size } => self.draw_text(text, *x, *y, *size),
        }
    }
}
