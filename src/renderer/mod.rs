//! Rendering module
//!
//! Rendering is split in two: `build_scene` turns game state into a flat list
//! of world-space draw commands (pure, testable), and a `RenderSurface`
//! executes them. The core never reads pixels back.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use crate::Rect;
use crate::highscores::ScoreBoard;
use crate::sim::{GameState, WingState};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

/// Sprite identifiers, as looked up in the resource cache
pub mod sprites {
    pub const BACKGROUND: &str = "/background-day.png";
    pub const BASE: &str = "/base.png";
    pub const PIPE: &str = "/pipe-green.png";
    pub const BIRD_UPFLAP: &str = "/bird/upflap.png";
    pub const BIRD_MIDFLAP: &str = "/bird/midflap.png";
    pub const BIRD_DOWNFLAP: &str = "/bird/downflap.png";

    pub const ALL: [&str; 6] = [
        BACKGROUND,
        BASE,
        PIPE,
        BIRD_UPFLAP,
        BIRD_MIDFLAP,
        BIRD_DOWNFLAP,
    ];
}

/// Score label baseline, from the top of the world
const SCORE_LABEL_Y: f32 = 100.0;
const SCORE_FONT_SIZE: f32 = 36.0;
const BEST_FONT_SIZE: f32 = 24.0;

/// One draw call in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        id: &'static str,
        rect: Rect,
        /// Mirror vertically (upper obstacle segments)
        flip_y: bool,
        /// Radians around the rect center
        rotation: f32,
    },
    /// Outlined text centered on `x`, baseline at `y`
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
    },
}

impl DrawCommand {
    fn sprite(id: &'static str, rect: Rect) -> Self {
        DrawCommand::Sprite {
            id,
            rect,
            flip_y: false,
            rotation: 0.0,
        }
    }
}

/// Target for draw commands
pub trait RenderSurface {
    fn clear(&mut self);
    fn draw(&mut self, command: &DrawCommand);
}

pub fn actor_sprite(wing: WingState) -> &'static str {
    match wing {
        WingState::Upflap => sprites::BIRD_UPFLAP,
        WingState::Midflap => sprites::BIRD_MIDFLAP,
        WingState::Downflap => sprites::BIRD_DOWNFLAP,
    }
}

/// Build the draw list for the current state, back to front
pub fn build_scene(state: &GameState, scores: &ScoreBoard) -> Vec<DrawCommand> {
    let config = &state.config;
    let floor = config.playable_height();
    let mut commands = Vec::with_capacity(state.obstacles.len() * 2 + 4);

    commands.push(DrawCommand::sprite(
        sprites::BACKGROUND,
        Rect::new(0.0, 0.0, config.world_width, config.world_height),
    ));

    for obstacle in state.obstacles.iter() {
        commands.push(DrawCommand::Sprite {
            id: sprites::PIPE,
            rect: obstacle.upper_rect(),
            flip_y: true,
            rotation: 0.0,
        });
        commands.push(DrawCommand::sprite(sprites::PIPE, obstacle.lower_rect(floor)));
    }

    commands.push(DrawCommand::sprite(
        sprites::BASE,
        Rect::new(0.0, floor, config.world_width, config.ground_band_height),
    ));

    let actor = &state.actor;
    commands.push(DrawCommand::Sprite {
        id: actor_sprite(actor.wing),
        rect: actor.bounds(),
        flip_y: false,
        rotation: actor.tilt,
    });

    let center_x = config.world_width / 2.0;
    commands.push(DrawCommand::Text {
        text: state.score.to_string(),
        x: center_x,
        y: SCORE_LABEL_Y,
        size: SCORE_FONT_SIZE,
    });
    if !state.is_running() {
        commands.push(DrawCommand::Text {
            text: format!("Best {}", scores.high_score()),
            x: center_x,
            y: SCORE_LABEL_Y + SCORE_FONT_SIZE + 8.0,
            size: BEST_FONT_SIZE,
        });
    }

    commands
}

/// Clear the surface and draw the whole scene
pub fn render<S: RenderSurface + ?Sized>(state: &GameState, scores: &ScoreBoard, surface: &mut S) {
    surface.clear();
    for command in build_scene(state, scores) {
        surface.draw(&command);
    }
}

/// Surface that records the last frame; used headless and in tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub frames: u64,
    pub commands: Vec<DrawCommand>,
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.frames += 1;
        self.commands.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}
