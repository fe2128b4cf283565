use anyhow::{Context, Result};
use fitts_core::{ExactSurface, Participant, Point, SessionSummary};
use fitts_experiment::{
    ExperimentConfig, ExperimentEvent, ExperimentStateMachine, LabLayout, PointerInput,
};
use fitts_export::{FileSink, RecordSink};
use fitts_render::{LabRenderer, Scene};
use fitts_timing::HighPrecisionTimer;
use pixels::{Pixels, SurfaceTexture};
use rand::rngs::ThreadRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::cli::Cli;

pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<LabRenderer>,
    experiment: ExperimentStateMachine<HighPrecisionTimer, ThreadRng>,
    sink: FileSink,
    windowed: bool,
    scale_factor: f64,
    cursor: Option<Point>,
    banner_reset_at: Option<Instant>,
    exported: bool,
    should_exit: bool,
    failure: Option<anyhow::Error>,
}

impl App {
    pub fn new(participant: Participant, cli: &Cli) -> Result<Self> {
        let config = ExperimentConfig::default();
        let layout = LabLayout::new(0.0, 0.0, config.home_diameter_px);
        let experiment = ExperimentStateMachine::new(
            config,
            participant,
            layout,
            HighPrecisionTimer::new(),
            rand::rng(),
        )?;

        Ok(Self {
            window: None,
            pixels: None,
            renderer: None,
            experiment,
            sink: FileSink::new(cli.out_dir.clone()),
            windowed: cli.windowed,
            scale_factor: 1.0,
            cursor: None,
            banner_reset_at: None,
            exported: false,
            should_exit: false,
            failure: None,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        println!("=== FITTS'S LAW EXPERIMENT ===");
        println!("Platform: {}", std::env::consts::OS);
        println!(
            "Participant: {} ({})",
            self.experiment.participant().id(),
            self.experiment.participant().device()
        );
        println!("Press and hold the blue home circle, then release on the red target");
        println!("as quickly and accurately as you can. Press home again for the next trial.");
        println!("Press ESC to abort.\n");

        event_loop.run_app(&mut self)?;

        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut window_attributes = Window::default_attributes()
            .with_title("Fitts")
            .with_resizable(self.windowed);
        if self.windowed {
            window_attributes = window_attributes.with_inner_size(LogicalSize::new(1280.0, 800.0));
        } else {
            let monitor = event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next())
                .ok_or_else(|| anyhow::anyhow!("No monitor available"))?;
            window_attributes =
                window_attributes.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        }

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        self.scale_factor = window.scale_factor();

        info!(
            width = physical_size.width,
            height = physical_size.height,
            scale_factor = self.scale_factor,
            "display configured"
        );

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);
        let mut renderer = LabRenderer::new(
            physical_size.width,
            physical_size.height,
            self.experiment.config.home_diameter_px,
        )?;
        renderer.set_scale_factor(self.scale_factor);
        self.renderer = Some(renderer);
        self.update_layout(physical_size);

        window.set_title(&self.title());
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    /// Condition sizes are logical pixels, so the layout is too.
    fn update_layout(&mut self, size: PhysicalSize<u32>) {
        let size: LogicalSize<f64> = size.to_logical(self.scale_factor);
        self.experiment.set_layout(LabLayout::new(
            size.width,
            size.height,
            self.experiment.config.home_diameter_px,
        ));
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Point {
        let p: LogicalPosition<f64> = position.to_logical(self.scale_factor);
        Point::new(p.x, p.y)
    }

    fn title(&self) -> String {
        format!("Fitts · {}", self.experiment.status())
    }

    fn refresh(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.title());
            window.request_redraw();
        }
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };
        let scene = Scene {
            home_pressed: self.experiment.is_tracking(),
            show_home: !self.experiment.is_finished(),
            target: self.experiment.target(),
        };
        let stats = renderer.render_frame(&scene, pixels.frame_mut())?;
        pixels.render()?;
        trace!(
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            total_ms = stats.total.as_secs_f64() * 1e3,
            "frame"
        );
        Ok(())
    }

    fn dispatch(&mut self, input: PointerInput) -> Vec<ExperimentEvent> {
        match &self.renderer {
            Some(renderer) => self.experiment.handle_input(input, renderer),
            None => self.experiment.handle_input(input, &ExactSurface),
        }
    }

    fn handle_pointer(&mut self, input: PointerInput) {
        let events = self.dispatch(input);
        if events.is_empty() {
            return;
        }
        for event in events {
            match event {
                ExperimentEvent::TrialStarted { target, .. } => {
                    debug!(x = target.x, y = target.y, "target shown");
                }
                ExperimentEvent::TrialScored(_) => {
                    self.banner_reset_at = Some(Instant::now() + self.experiment.config.banner_reset());
                }
                ExperimentEvent::BlockStarted { block } => {
                    info!(block, "next block");
                }
                ExperimentEvent::TrialReady { .. } => {}
                ExperimentEvent::SessionComplete(summary) => {
                    self.complete(&summary, false);
                }
            }
        }
        self.refresh();
    }

    fn pointer_moved(&mut self, p: Point) {
        self.cursor = Some(p);
        if self.experiment.is_tracking() {
            self.dispatch(PointerInput::Moved(p));
        }
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        let Some(at) = self.cursor else {
            return;
        };
        match state {
            ElementState::Pressed => {
                if self.experiment.layout().contains_home(at) {
                    self.handle_pointer(PointerInput::HomePressed);
                }
            }
            ElementState::Released => {
                let input = PointerInput::released(at, self.experiment.layout());
                self.handle_pointer(input);
            }
        }
    }

    fn complete(&mut self, summary: &SessionSummary, partial: bool) {
        if self.exported {
            return;
        }
        self.exported = true;

        println!("\n{summary}");
        let records = self.experiment.records();
        if records.is_empty() {
            warn!("no completed trials, nothing exported");
        } else {
            match self
                .sink
                .consume(records, summary)
                .with_context(|| format!("exporting to {}", self.sink.dir().display()))
            {
                Ok(paths) => {
                    if partial {
                        warn!(trials = records.len(), "session aborted, partial export written");
                    }
                    println!("CSV:  {}", paths.csv.display());
                    println!("JSON: {}", paths.json.display());
                }
                Err(e) => {
                    error!("{e:#}");
                    self.failure = Some(e);
                }
            }
        }
        self.should_exit = true;
    }

    fn abort(&mut self) {
        if !self.experiment.is_finished() {
            let participant = self.experiment.participant();
            let summary = SessionSummary::from_records(
                participant.id(),
                participant.device(),
                self.experiment.records(),
            );
            self.complete(&summary, true);
        }
        self.should_exit = true;
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                error!("Failed to resize surface: {e}");
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                error!("Failed to resize buffer: {e}");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                error!("Failed to resize canvas: {e:#}");
            }
        }
        self.update_layout(new_size);
        info!(width = new_size.width, height = new_size.height, "display resized");
        self.refresh();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{e:#}");
        self.failure = Some(e);
        self.should_exit = true;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                self.fail(event_loop, e.context("Failed to create window and surface"));
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.abort(),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(self.to_logical(position));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(state, button);
            }
            WindowEvent::Touch(Touch {
                phase, location, ..
            }) => {
                self.pointer_moved(self.to_logical(location));
                match phase {
                    TouchPhase::Started => {
                        self.handle_mouse_button(ElementState::Pressed, MouseButton::Left)
                    }
                    TouchPhase::Ended => {
                        self.handle_mouse_button(ElementState::Released, MouseButton::Left)
                    }
                    TouchPhase::Moved | TouchPhase::Cancelled => {}
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() => {
                use winit::keyboard::{KeyCode, PhysicalKey};
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    self.abort();
                }
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = scale_factor;
                if let Some(renderer) = &mut self.renderer {
                    renderer.set_scale_factor(scale_factor);
                }
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
            return;
        }
        match self.banner_reset_at {
            Some(at) if Instant::now() >= at => {
                self.banner_reset_at = None;
                self.experiment.reset_banner();
                self.refresh();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
