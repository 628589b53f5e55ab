//! Native window plus OpenGL context/surface and the input state they feed.

use std::ffi::CString;
use std::num::NonZeroU32;

use glow::HasContext;
use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Window};

use crate::input::{self, InputState};

/// One window, its current GL context and the loaded GL function table.
/// Window events are routed into the owned [`InputState`] by the event
/// handler that owns this instance; winit's per-window dispatch replaces
/// the global user-pointer dance of the classic GLFW setup.
pub struct GlWindow {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    gl: glow::Context,
    buffer_width: i32,
    buffer_height: i32,
    input: InputState,
}

impl GlWindow {
    /// Creates the window, a 3.3 core-profile context and the glow function
    /// table, enables depth testing, sets the viewport and grabs the cursor.
    /// Any step failing tears down what was built so far (dropped handles
    /// release their OS resources) and surfaces the failing step.
    pub fn initialize(
        event_loop: &ActiveEventLoop,
        width: u32,
        height: u32,
        title: &str,
    ) -> Result<Self, String> {
        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(width, height));

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, ConfigTemplateBuilder::new().with_depth_size(24), |mut configs| {
                configs.next().expect("no matching GL config")
            })
            .map_err(|e| format!("window creation failed: {e}"))?;
        let window = window.ok_or("display builder produced no window")?;

        let raw_handle = window
            .window_handle()
            .map_err(|e| format!("no native window handle: {e}"))?
            .as_raw();

        let display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| format!("GL context creation failed: {e}"))?;

        // The drawable surface may be larger than the requested logical
        // size (display scaling); its pixel size is what the viewport uses.
        let buffer_size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            NonZeroU32::new(buffer_size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(buffer_size.height).unwrap_or(NonZeroU32::MIN),
        );
        let gl_surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| format!("GL surface creation failed: {e}"))?;

        let gl_context = not_current
            .make_current(&gl_surface)
            .map_err(|e| format!("failed to make GL context current: {e}"))?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                display.get_proc_address(&CString::new(s).unwrap()) as *const _
            })
        };

        window.set_cursor_visible(false);
        let grab = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if grab.is_err() {
            log::warn!("cursor grab not supported on this platform");
        }

        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.viewport(0, 0, buffer_size.width as i32, buffer_size.height as i32);
        }

        log::info!(
            "window initialized: {}x{} requested, {}x{} framebuffer",
            width,
            height,
            buffer_size.width,
            buffer_size.height
        );

        Ok(Self {
            window,
            gl_context,
            gl_surface,
            gl,
            buffer_width: buffer_size.width as i32,
            buffer_height: buffer_size.height as i32,
            input: InputState::new(),
        })
    }

    /// Routes the window events this surface cares about into the input
    /// state and keeps surface/viewport in sync with resizes.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.input.request_close();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(code) = input::key_code(event.physical_key) {
                    self.input.handle_key(code, event.state.is_pressed());
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.handle_cursor_moved(position.x, position.y);
            }
            WindowEvent::Resized(size) => {
                self.resize(*size);
            }
            _ => {}
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.gl_surface.resize(
            &self.gl_context,
            NonZeroU32::new(size.width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(size.height).unwrap_or(NonZeroU32::MIN),
        );
        unsafe {
            self.gl.viewport(0, 0, size.width as i32, size.height as i32);
        }
        self.buffer_width = size.width as i32;
        self.buffer_height = size.height as i32;
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn buffer_width(&self) -> i32 {
        self.buffer_width
    }

    pub fn buffer_height(&self) -> i32 {
        self.buffer_height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.buffer_width as f32 / self.buffer_height as f32
    }

    pub fn should_close(&self) -> bool {
        self.input.close_requested()
    }

    /// Presents the finished frame.
    pub fn swap_buffers(&self) -> Result<(), String> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| format!("buffer swap failed: {e}"))
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
