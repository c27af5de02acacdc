use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::gate::RedrawGate;
use crate::input::{translate_window_event, Action, InputEvent};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Raytracing".to_string(),
            initial_size: LogicalSize::new(540.0, 360.0),
        }
    }
}

/// Commands an application may issue from a callback.
///
/// They are buffered and applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Schedules one redraw even though the window was not resized.
    pub fn invalidate(&mut self) {
        self.commands.push(Command::Invalidate);
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    /// Exits and makes [`Runtime::run`] return `err`.
    ///
    /// Only the first reported error is kept.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.commands.push(Command::Fail(err));
    }

    fn into_outcome(self) -> CommandOutcome {
        let mut outcome = CommandOutcome::default();
        for cmd in self.commands {
            match cmd {
                Command::Invalidate => outcome.invalidate = true,
                Command::Exit => outcome.exit = true,
                Command::Fail(err) => {
                    outcome.exit = true;
                    if outcome.fatal.is_none() {
                        outcome.fatal = Some(err);
                    } else {
                        log::error!("additional fatal error: {err:#}");
                    }
                }
            }
        }
        outcome
    }
}

#[derive(Debug)]
enum Command {
    Invalidate,
    Exit,
    Fail(anyhow::Error),
}

/// Buffered commands folded into what the runtime has to do.
#[derive(Debug, Default)]
struct CommandOutcome {
    invalidate: bool,
    exit: bool,
    fatal: Option<anyhow::Error>,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and blocks until it is closed.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    gate: RedrawGate,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let viewport = Viewport::from(window.inner_size());
        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            gate: RedrawGate::new(viewport),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, runtime: RuntimeCtx) {
        let outcome = runtime.into_outcome();

        if outcome.invalidate {
            if let Some(entry) = self.window.as_mut() {
                entry.with_gate_mut(|g| g.invalidate());
                entry.with_window(|w| w.request_redraw());
            }
        }

        if let Some(err) = outcome.fatal {
            log::error!("{err:#}");
            self.fatal.get_or_insert(err);
        }
        if outcome.exit {
            self.exit_requested = true;
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, input: InputEvent) {
        let mut runtime = RuntimeCtx::default();

        let mut control = self.app.on_input(&input, &mut runtime);

        match Action::from_event(&input) {
            Some(Action::Close) => {
                log::debug!("close requested from keyboard");
                control = AppControl::Exit;
            }
            Some(action) => {
                if self.app.on_action(action, &mut runtime) == AppControl::Exit {
                    control = AppControl::Exit;
                }
            }
            None => match input {
                InputEvent::CursorMoved { x, y } => log::trace!("cursor at ({x:.1}, {y:.1})"),
                InputEvent::Scroll { dx, dy } => log::trace!("scroll ({dx}, {dy})"),
                InputEvent::Key { .. } => {}
            },
        }

        if control == AppControl::Exit {
            runtime.exit();
        }
        self.apply_commands(event_loop, runtime);
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        entry.with_gate_mut(|g| g.on_resize(new_size.width, new_size.height));
        entry.with_window(|w| w.request_redraw());
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let mut runtime = RuntimeCtx::default();
        let mut control = AppControl::Continue;

        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else { return };

        entry.with_mut(|fields| {
            let Some(request) = fields.gate.take_redraw() else {
                log::trace!("redraw skipped: gate is clean");
                return;
            };

            let time = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                request,
                time,
                runtime: &mut runtime,
            };

            control = app.on_frame(&mut ctx);
        });

        if control == AppControl::Exit {
            runtime.exit();
        }
        self.apply_commands(event_loop, runtime);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.fatal = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Sleep until the next event; drawing is driven by the gate only.
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Some(entry) = self.window.as_mut() {
            entry.with_gate_mut(|g| g.tick());
            if entry.with_gate(|g| g.wants_redraw()) {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        if let Some(input) = translate_window_event(&event) {
            self.handle_input(event_loop, input);
        }

        match &event {
            WindowEvent::CloseRequested => {
                // Dropping the entry releases the surface before the window.
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self
                    .window
                    .as_ref()
                    .map(|entry| entry.with_window(|w| w.inner_size()))
                {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.window.take() {
            let (frames, resizes) = entry.with_gate(|g| (g.frame_count(), g.resize_count()));
            log::debug!("shutting down after {frames} loop iterations, {resizes} resizes");
        }
    }
}
