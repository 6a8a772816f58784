// app.rs - Window, GL context and the event loop

use crate::config::AppConfig;
use crate::render::Renderer;
use crate::scene::Scene;
use crate::window::{centered_position, fraction_of};
use anyhow::{anyhow, Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::info;
use raw_window_handle::HasRawWindowHandle;
use std::{ffi::CString, num::NonZeroU32};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

pub struct App {
    // Dropped first: GL objects need the context alive.
    scene: Scene,
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<(Self, EventLoop<()>)> {
        info!("Initializing application...");

        let event_loop = EventLoopBuilder::new()
            .build()
            .context("Failed to create event loop")?;
        let (width, height) = config.window.size();
        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("Failed to build display: {e}"))?;

        let window = window.context("Display builder did not create a window")?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Compatibility)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => std::ptr::null(),
        });

        if config.window.vsync {
            if let Err(e) = gl_surface
                .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                log::warn!("Could not enable vsync: {}", e);
            }
        }

        Self::place_window(&window, config);

        let size = window.inner_size();
        Renderer::viewport(size.width, size.height);

        let scene = Scene::new(&config.rendering).context("Failed to set up scene")?;

        Ok((
            Self {
                scene,
                window,
                gl_context,
                gl_surface,
            },
            event_loop,
        ))
    }

    fn place_window(window: &Window, config: &AppConfig) {
        let Some(monitor) = window.current_monitor() else {
            return;
        };
        let monitor_size = monitor.size();
        let monitor_size = (monitor_size.width, monitor_size.height);

        if let Some(fraction) = config.window.monitor_fraction {
            let (w, h) = fraction_of(monitor_size, fraction);
            let _ = window.request_inner_size(PhysicalSize::new(w, h));
        }

        if config.window.center {
            let outer = window.outer_size();
            let (x, y) = centered_position(monitor_size, (outer.width, outer.height));
            let origin = monitor.position();
            window.set_outer_position(PhysicalPosition::new(origin.x + x, origin.y + y));
        }
    }

    /// Returns true when the window should close.
    fn handle_window_event(&mut self, event: &WindowEvent) -> Result<bool> {
        match event {
            WindowEvent::CloseRequested => return Ok(true),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => return Ok(true),
            WindowEvent::Resized(size) => {
                if let (Some(w), Some(h)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    self.gl_surface.resize(&self.gl_context, w, h);
                    Renderer::viewport(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.scene.render().context("Failed to render frame")?;
                self.gl_surface
                    .swap_buffers(&self.gl_context)
                    .context("Failed to swap buffers")?;
            }
            _ => {}
        }
        Ok(false)
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<()> {
        info!("Running exercise {:?}", self.scene.exercise());
        let mut failure = None;

        event_loop.run(|event, elwt| match event {
            Event::WindowEvent { event, .. } => match self.handle_window_event(&event) {
                Ok(false) => {}
                Ok(true) => elwt.exit(),
                Err(e) => {
                    failure = Some(e);
                    elwt.exit();
                }
            },
            Event::AboutToWait => self.window.request_redraw(),
            _ => (),
        })?;

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
