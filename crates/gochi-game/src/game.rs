use gochi_engine::core::{App, AppControl, FrameCtx};
use gochi_engine::input::Key;
use gochi_engine::render::{Mesh, MeshRenderer, MeshStyle};
use gochi_geometry::BufferError;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ControlsConfig, GameConfig};
use crate::controls::Controls;
use crate::world::{FireCommand, StepReport, World};

/// Window title; the score is appended while playing.
pub const TITLE: &str = "GoChi";

/// Frame-loop glue: input to controls, controls to world, world to GPU.
///
/// Keys: arrows/WASD move, right mouse drag looks, wheel zooms, Space fires,
/// R resets, Escape quits.
pub struct Game {
    world: World,
    controls: Controls,
    renderer: MeshRenderer,
    rng: StdRng,
    shown_score: Option<u32>,
}

impl Game {
    pub fn new(config: GameConfig, controls: ControlsConfig) -> Self {
        Self::with_rng(config, controls, StdRng::from_entropy())
    }

    /// Uses a caller-provided RNG so runs can be replayed.
    pub fn with_rng(config: GameConfig, controls: ControlsConfig, rng: StdRng) -> Self {
        Self {
            world: World::new(config),
            controls: Controls::new(controls),
            renderer: MeshRenderer::new(MeshStyle::OPAQUE),
            rng,
            shown_score: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Steps the world by `dt`, firing from just in front of the camera when
    /// `fire` is held.
    ///
    /// Buffer edits mark the renderer stale; the upload happens on the next
    /// frame that actually draws.
    pub fn advance(&mut self, dt: f32, fire: bool) -> Result<StepReport, BufferError> {
        let commands = FireCommand {
            fire,
            origin: self.controls.position() + self.controls.direction() * 0.5,
            direction: self.controls.direction(),
        };
        let report = self.world.step(dt, &mut self.rng, commands)?;
        if self.world.take_dirty() {
            self.renderer.invalidate();
        }
        Ok(report)
    }
}

impl App for Game {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            log::info!("escape pressed; final score {}", self.world.score());
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::R) {
            self.world.reset();
        }

        let dt = ctx.time.dt;
        self.controls.update(ctx.input, ctx.input_frame, dt);

        if let Err(err) = self.advance(dt, ctx.input.key_down(Key::Space)) {
            log::error!("world bookkeeping failed: {err}");
            return AppControl::Exit;
        }

        let score = self.world.score();
        if self.shown_score != Some(score) {
            ctx.runtime.set_title(format!("{TITLE} | score {score}"));
            self.shown_score = Some(score);
        }

        let mvp = self.controls.view_projection(ctx.aspect());
        let clear = self.world.config().clear_color;

        let (world, renderer) = (&self.world, &mut self.renderer);
        ctx.render(clear, |rctx, target| {
            let buffer = world.buffer();
            let mesh = Mesh::new(buffer.positions(), buffer.colors());
            renderer.render(rctx, target, mvp, &mesh);
        })
    }
}
