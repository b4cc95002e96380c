//! winit host for the monogram.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::MonogramConfig;
use crate::driver::Monogram;
use crate::error::AppError;
use crate::input::Command;
use crate::render::GpuRenderer;
use crate::scene::Viewport;
use crate::time::SystemClock;

const TITLE: &str = "Monogram";

/// Open a window and play the monogram until it is closed.
pub fn run(config: MonogramConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

pub struct App {
    config: MonogramConfig,
    window: Option<Arc<Window>>,
    monogram: Option<Monogram<GpuRenderer, SystemClock>>,
}

impl App {
    pub fn new(config: MonogramConfig) -> Self {
        Self {
            config,
            window: None,
            monogram: None,
        }
    }

    fn handle_command(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        if command == Command::Quit {
            self.shutdown(event_loop);
            return;
        }
        let Some(monogram) = &mut self.monogram else {
            return;
        };
        match command.apply(monogram.config()) {
            Some(next) => {
                self.config = next.clone();
                monogram.on_config_change(next);
            }
            None => monogram.rearm_rotation(),
        }
    }

    fn update_title(&self) {
        if let (Some(window), Some(monogram)) = (&self.window, &self.monogram) {
            let time = monogram.time();
            if time.frame() % 30 == 0 {
                window.set_title(&format!(
                    "{} - {}/{} - {:.0} fps",
                    TITLE,
                    monogram.config().front_text,
                    monogram.config().back_text,
                    time.fps()
                ));
            }
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut monogram) = self.monogram.take() {
            monogram.teardown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("{}", AppError::from(e));
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuRenderer::new(window.clone())) {
            Ok(renderer) => {
                let monogram = Monogram::new(self.config.clone(), renderer, SystemClock::new());
                self.monogram = Some(monogram);
                window.request_redraw();
            }
            Err(e) => log::error!("{}, nothing will be drawn", AppError::from(e)),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(monogram) = &mut self.monogram {
                    monogram.resize(Viewport::new(physical_size.width, physical_size.height));
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = Command::from_key_event(&event) {
                    self.handle_command(command, event_loop);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(monogram) = &mut self.monogram else {
                    return;
                };
                if monogram.tick() {
                    self.update_title();
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                } else {
                    self.shutdown(event_loop);
                }
            }
            _ => {}
        }
    }
}
