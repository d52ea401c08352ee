//! Canvas2D surface
//!
//! Images load asynchronously; until an image has decoded (or if it failed to
//! load) whatever uses it is skipped.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::sprite::{Animator, SpriteSheet};
use super::{DINO_FRAME_SIZE, asset_path, assets};
use crate::consts::*;
use crate::platform::Surface;
use crate::sim::{AnimState, Facing, Player, Rect};

/// An image that may or may not have finished loading
struct Image {
    element: HtmlImageElement,
}

impl Image {
    fn load(name: &str) -> Option<Self> {
        let element = HtmlImageElement::new().ok()?;
        let path = asset_path(name);

        let failed_path = path.clone();
        let on_error = Closure::<dyn FnMut()>::new(move || {
            log::error!("Failed to load image: {}", failed_path);
        });
        element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();

        element.set_src(&path);
        Some(Self { element })
    }

    /// Decoded and drawable
    fn ready(&self) -> bool {
        self.element.complete() && self.element.natural_width() > 0
    }

    fn sheet(&self) -> SpriteSheet {
        SpriteSheet::new(
            DINO_FRAME_SIZE,
            DINO_FRAME_SIZE,
            self.element.natural_width() as f32,
            self.element.natural_height() as f32,
        )
    }
}

/// Draws the game onto an HTML canvas
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    background: Option<Image>,
    floor: Option<Image>,
    meteor: Option<Image>,
    dino_idle: Option<Image>,
    dino_walk: Option<Image>,
    dino_jump: Option<Image>,
    animator: Animator,
}

impl CanvasSurface {
    /// Grab the 2D context and start loading images
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            ctx,
            background: Image::load(assets::BACKGROUND),
            floor: Image::load(assets::FLOOR),
            meteor: Image::load(assets::METEOR),
            dino_idle: Image::load(assets::DINO_IDLE),
            dino_walk: Image::load(assets::DINO_WALK),
            dino_jump: Image::load(assets::DINO_JUMP),
            animator: Animator::default(),
        })
    }

    fn ready(image: &Option<Image>) -> Option<&Image> {
        image.as_ref().filter(|img| img.ready())
    }

    fn draw_text(&self, text: &str, x: f32, y: f32, font: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str("white");
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }

    fn draw_centered(&self, text: &str, y: f32, font: &str) {
        self.ctx.set_text_align("center");
        self.draw_text(text, CANVAS_WIDTH / 2.0, y, font);
        self.ctx.set_text_align("start");
    }

    fn sheet_for(&self, state: AnimState) -> Option<&Image> {
        let image = match state {
            AnimState::Idle => &self.dino_idle,
            AnimState::Walking => &self.dino_walk,
            AnimState::Jumping => &self.dino_jump,
        };
        // Fall back to the idle sheet while the others are loading
        Self::ready(image).or_else(|| Self::ready(&self.dino_idle))
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    }

    fn draw_background(&mut self) {
        self.ctx.set_fill_style_str("#0b0d1a");
        self.ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);

        if let Some(bg) = Self::ready(&self.background) {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &bg.element,
                0.0,
                0.0,
                CANVAS_WIDTH as f64,
                CANVAS_HEIGHT as f64,
            );
        }

        match Self::ready(&self.floor) {
            Some(floor) => {
                let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &floor.element,
                    0.0,
                    FLOOR_TOP as f64,
                    CANVAS_WIDTH as f64,
                    FLOOR_HEIGHT as f64,
                );
            }
            None => {
                self.ctx.set_fill_style_str("#5a5a66");
                self.ctx.fill_rect(0.0, FLOOR_TOP as f64, CANVAS_WIDTH as f64, FLOOR_HEIGHT as f64);
            }
        }
    }

    fn draw_obstacle(&mut self, rect: Rect) {
        if let Some(meteor) = Self::ready(&self.meteor) {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                &meteor.element,
                rect.x as f64,
                rect.y as f64,
                rect.width as f64,
                rect.height as f64,
            );
        }
    }

    fn draw_player(&mut self, player: &Player, dt: f32) {
        self.animator.update(player.state, dt);

        let Some(image) = self.sheet_for(player.state) else {
            return;
        };
        let sheet = image.sheet();
        let Some(src) = sheet.frame_rect(self.animator.frame_index(sheet.frame_count())) else {
            return;
        };

        let dst = player.bounding_rect();
        self.ctx.save();
        if player.facing == Facing::Left {
            // Mirror around the hitbox
            let _ = self.ctx.translate((dst.x + dst.width) as f64, dst.y as f64);
            let _ = self.ctx.scale(-1.0, 1.0);
        } else {
            let _ = self.ctx.translate(dst.x as f64, dst.y as f64);
        }
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &image.element,
                src.x as f64,
                src.y as f64,
                src.width as f64,
                src.height as f64,
                0.0,
                0.0,
                dst.width as f64,
                dst.height as f64,
            );
        self.ctx.restore();
    }

    fn draw_score(&mut self, score: u32, highscore: u32) {
        let font = "16px Helvetica";
        let score_x = (CANVAS_WIDTH - 150.0).max(10.0);
        let highscore_x = (CANVAS_WIDTH - 150.0).min(20.0);
        self.draw_text(&format!("Score: {}", score), score_x, 20.0, font);
        self.draw_text(&format!("Highscore: {}", highscore), highscore_x, 20.0, font);
    }

    fn draw_fps(&mut self, fps: u32) {
        self.draw_text(&format!("{} fps", fps), 20.0, 40.0, "12px Helvetica");
    }

    fn show_start_screen(&mut self, last_score: Option<u32>) {
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        self.ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);

        self.draw_centered("MOON DINO", CANVAS_HEIGHT / 2.0 - 60.0, "bold 48px Helvetica");
        if let Some(score) = last_score {
            self.draw_centered(
                &format!("Game over - score {}", score),
                CANVAS_HEIGHT / 2.0 - 10.0,
                "24px Helvetica",
            );
        }
        self.draw_centered(
            "Press Enter to start",
            CANVAS_HEIGHT / 2.0 + 30.0,
            "20px Helvetica",
        );
        self.draw_centered(
            "A / D to move, Space to jump, Esc to pause, M to mute",
            CANVAS_HEIGHT / 2.0 + 60.0,
            "14px Helvetica",
        );
    }

    fn show_pause_overlay(&mut self) {
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.4)");
        self.ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
        self.draw_centered("PAUSED", CANVAS_HEIGHT / 2.0, "bold 36px Helvetica");
    }
}
