use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::Gpu;
use lumen_engine::input::Action;
use lumen_engine::render::{QuadMesh, CLEAR_COLOR};
use lumen_engine::shader::{ShaderError, ShaderProgram};
use lumen_engine::window::RuntimeCtx;

use crate::config::ShellConfig;

/// Draws the configured shader pair over a full-screen quad.
///
/// GPU resources are created on the first frame, when the device exists.
pub struct QuadApp {
    config: ShellConfig,
    program: Option<ShaderProgram>,
    quad: Option<QuadMesh>,
    reload_pending: bool,
}

impl QuadApp {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            program: None,
            quad: None,
            reload_pending: false,
        }
    }

    fn ensure_resources(&mut self, gpu: &Gpu<'_>) -> Result<(), ShaderError> {
        if self.quad.is_none() {
            self.quad = Some(QuadMesh::new(gpu.device()));
        }

        if self.program.is_none() {
            let program = ShaderProgram::load(
                gpu.device(),
                gpu.surface_format(),
                self.config.shaders.clone(),
                self.config.uniform_layout()?,
            )?;
            log::info!(
                "shader program ready ({} + {})",
                self.config.shaders.vertex.display(),
                self.config.shaders.fragment.display()
            );
            self.program = Some(program);
            self.reload_pending = false;
        }

        Ok(())
    }

    fn reload_if_pending(&mut self, gpu: &Gpu<'_>) {
        if !std::mem::take(&mut self.reload_pending) {
            return;
        }
        let Some(program) = self.program.as_mut() else { return };
        if let Err(e) = program.reload(gpu.device()) {
            log::error!("shader reload failed, keeping previous program: {e}");
        }
    }
}

impl App for QuadApp {
    fn on_action(&mut self, action: Action, runtime: &mut RuntimeCtx) -> AppControl {
        if action == Action::ReloadShaders {
            self.reload_pending = true;
            runtime.invalidate();
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(e) = self.ensure_resources(ctx.gpu) {
            ctx.runtime.fail(anyhow::Error::new(e).context("failed to build shader program"));
            return AppControl::Exit;
        }
        self.reload_if_pending(ctx.gpu);

        let (Some(program), Some(quad)) = (self.program.as_mut(), self.quad.as_ref()) else {
            return AppControl::Continue;
        };

        let resolution = ctx.request.viewport.resolution();
        let frame_count = ctx.request.frame_count as f32;
        let set = program
            .set_vec2(&self.config.resolution_uniform, resolution)
            .and_then(|()| program.set_float(&self.config.frame_count_uniform, frame_count));
        // The layout is built from the same names, so this only fires if the
        // two ever diverge.
        if let Err(e) = set {
            log::warn!("uniform not set: {e}");
        }
        program.upload(ctx.gpu.queue());

        ctx.render(CLEAR_COLOR, |_rctx, target| {
            program.use_program(target.pass);
            quad.draw(target.pass);
        })
    }
}
