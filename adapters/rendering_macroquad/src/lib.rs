#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad window for Starfall.
//!
//! Each frame polls the bound keys, hands the timestamp and held controls to
//! the caller, then draws the scene letterboxed into the window. Macroquad is
//! linked without its `audio` feature, so sound never reaches this crate.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use starfall_core::{Control, InputState};
use starfall_rendering::{Banner, Color, FrameInput, Presentation, RenderingBackend, Scene};

const SCORE_FONT_SIZE: f32 = 28.0;
const BANNER_FONT_SIZE: u16 = 48;

/// Physical keys bound to each logical control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    /// Keys that steer the ship left.
    pub move_left: Vec<KeyCode>,
    /// Keys that steer the ship right.
    pub move_right: Vec<KeyCode>,
    /// Keys that fire the weapon.
    pub fire: Vec<KeyCode>,
    /// Keys that close the window.
    pub quit: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![KeyCode::Left, KeyCode::A],
            move_right: vec![KeyCode::Right, KeyCode::D],
            fire: vec![KeyCode::Space],
            quit: vec![KeyCode::Escape],
        }
    }
}

impl KeyBindings {
    /// Keys bound to the provided control.
    #[must_use]
    pub fn keys_for(&self, control: Control) -> &[KeyCode] {
        match control {
            Control::MoveLeft => &self.move_left,
            Control::MoveRight => &self.move_right,
            Control::Fire => &self.fire,
        }
    }

    /// Resolves the held controls given a predicate over physical keys.
    ///
    /// A control is held when any of its bound keys is held.
    pub fn controls<P>(&self, mut is_held: P) -> InputState
    where
        P: FnMut(KeyCode) -> bool,
    {
        let mut controls = InputState::new();
        for control in Control::ALL {
            let held = self.keys_for(control).iter().any(|key| is_held(*key));
            controls.set_control(control, held);
        }
        controls
    }

    fn quit_requested(&self) -> bool {
        self.quit.iter().any(|key| is_key_pressed(*key))
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    bindings: KeyBindings,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests vertical sync, or an uncapped frame rate when disabled.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.swap_interval = Some(i32::from(enabled));
        self
    }

    /// Draws the current frame rate under the play field when enabled.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Replaces the default key bindings.
    #[must_use]
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            bindings,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.play_field.width.round() as i32,
            window_height: scene.play_field.height.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                if bindings.quit_requested() {
                    break;
                }

                let frame_input = FrameInput {
                    timestamp: macroquad::time::get_time(),
                    controls: bindings.controls(is_key_down),
                };
                update_scene(frame_input, &mut scene);

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_play_field(&metrics);
                draw_sprites(&scene, &metrics);
                draw_score(scene.score, &metrics);
                if let Some(banner) = scene.banner {
                    draw_banner(banner, &metrics);
                }
                if show_fps {
                    let fps = format!("FPS: {}", macroquad::time::get_fps());
                    let _ = macroquad::text::draw_text(
                        &fps,
                        metrics.offset_x + 8.0,
                        metrics.offset_y + metrics.height - 8.0,
                        SCORE_FONT_SIZE * 0.75,
                        macroquad::color::GRAY,
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps play-field units onto the window, preserving the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    width: f32,
    height: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let field = scene.play_field;
        let scale = (screen_width / field.width)
            .min(screen_height / field.height)
            .max(0.0);
        let width = field.width * scale;
        let height = field.height * scale;

        Self {
            scale,
            offset_x: ((screen_width - width) * 0.5).max(0.0),
            offset_y: ((screen_height - height) * 0.5).max(0.0),
            width,
            height,
        }
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }
}

fn draw_play_field(metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle_lines(
        metrics.offset_x,
        metrics.offset_y,
        metrics.width,
        metrics.height,
        2.0,
        macroquad::color::DARKGRAY,
    );
}

fn draw_sprites(scene: &Scene, metrics: &SceneMetrics) {
    for sprite in scene.sprites() {
        let top_left = metrics.to_screen(sprite.center - sprite.half_extents);
        let size = sprite.half_extents * 2.0 * metrics.scale;
        macroquad::shapes::draw_rectangle(
            top_left.x,
            top_left.y,
            size.x,
            size.y,
            to_macroquad_color(sprite.color),
        );
    }
}

fn draw_score(score: u32, metrics: &SceneMetrics) {
    let text = format!("Score: {score}");
    let _ = macroquad::text::draw_text(
        &text,
        metrics.offset_x + 8.0,
        metrics.offset_y + SCORE_FONT_SIZE,
        SCORE_FONT_SIZE,
        macroquad::color::WHITE,
    );
}

fn draw_banner(banner: Banner, metrics: &SceneMetrics) {
    let text = banner.text();
    let dimensions = macroquad::text::measure_text(text, None, BANNER_FONT_SIZE, 1.0);
    let x = metrics.offset_x + (metrics.width - dimensions.width) * 0.5;
    let y = metrics.offset_y + (metrics.height + dimensions.height) * 0.5;
    let color = match banner {
        Banner::GameOver => macroquad::color::RED,
        Banner::Victory => macroquad::color::GOLD,
    };
    let _ = macroquad::text::draw_text(text, x, y, f32::from(BANNER_FONT_SIZE), color);
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
