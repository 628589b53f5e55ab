//! Windowed demo: two pyramids, a free-fly camera and a move/rotate/scale
//! animation driven by frame time.

use std::time::Instant;

use glow::HasContext;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

use glsketch::camera::Camera;
use glsketch::geometry::{PYRAMID_INDICES, PYRAMID_VERTICES};
use glsketch::math::{
    mat4x4_mul, mat4x4_perspective, mat4x4_rot_y, mat4x4_scale, mat4x4_translate, Mat4x4,
};
use glsketch::mesh::Mesh;
use glsketch::shader::ShaderProgram;
use glsketch::window::GlWindow;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const WINDOW_TITLE: &str = "glsketch";

const VERTEX_SHADER_PATH: &str = "assets/shaders/shader.vert";
const FRAGMENT_SHADER_PATH: &str = "assets/shaders/shader.frag";

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

/// Bounce/spin/pulse state for the first pyramid, advanced by wall-clock
/// frame time rather than per-frame constants.
struct Animation {
    offset: f32,
    offset_out: bool,
    angle: f32,
    size: f32,
    size_growing: bool,
}

impl Animation {
    const OFFSET_RATE: f32 = 0.48; // units per second
    const MAX_OFFSET: f32 = 0.7;
    const SPIN_RATE: f32 = 6.0; // degrees per second
    const SIZE_RATE: f32 = 0.06; // scale units per second
    const MIN_SIZE: f32 = 0.1;
    const MAX_SIZE: f32 = 0.8;

    fn new() -> Self {
        Self {
            offset: 0.0,
            offset_out: true,
            angle: 0.0,
            size: 0.4,
            size_growing: true,
        }
    }

    fn advance(&mut self, dt: f32) {
        let step = Self::OFFSET_RATE * dt;
        self.offset += if self.offset_out { step } else { -step };
        if self.offset.abs() >= Self::MAX_OFFSET {
            self.offset = self.offset.clamp(-Self::MAX_OFFSET, Self::MAX_OFFSET);
            self.offset_out = !self.offset_out;
        }

        self.angle = (self.angle + Self::SPIN_RATE * dt) % 360.0;

        let pulse = Self::SIZE_RATE * dt;
        self.size += if self.size_growing { pulse } else { -pulse };
        if self.size >= Self::MAX_SIZE || self.size <= Self::MIN_SIZE {
            self.size = self.size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
            self.size_growing = !self.size_growing;
        }
    }
}

/// Everything the frame loop owns besides the window itself. Meshes render
/// in insertion order.
struct Scene {
    meshes: Vec<Mesh>,
    shader: ShaderProgram,
    camera: Camera,
    projection: Mat4x4,
    animation: Animation,
}

impl Scene {
    fn create(window: &GlWindow) -> Result<Self, String> {
        let gl = window.gl();

        let mut meshes = Vec::new();
        for _ in 0..2 {
            let mut mesh = Mesh::new();
            mesh.upload(gl, &PYRAMID_VERTICES, &PYRAMID_INDICES)?;
            meshes.push(mesh);
        }

        let mut shader = ShaderProgram::new();
        shader.create_from_files(gl, VERTEX_SHADER_PATH, FRAGMENT_SHADER_PATH)?;

        let camera = Camera::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], -90.0, 0.0, 5.0, 0.2);
        let projection = mat4x4_perspective(
            FOV_Y_DEGREES.to_radians(),
            window.aspect_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        );

        Ok(Self {
            meshes,
            shader,
            camera,
            projection,
            animation: Animation::new(),
        })
    }

    fn release(&mut self, gl: &glow::Context) {
        for mesh in &mut self.meshes {
            mesh.release(gl);
        }
        self.shader.release(gl);
    }
}

#[derive(Default)]
struct App {
    window: Option<GlWindow>,
    scene: Option<Scene>,
    last_frame: Option<Instant>,
    fatal: Option<String>,
}

impl App {
    fn draw_frame(&mut self) {
        let (Some(window), Some(scene)) = (self.window.as_mut(), self.scene.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| (now - last).as_secs_f32())
            .unwrap_or(0.0)
            .max(0.0);
        self.last_frame = Some(now);

        let input = window.input_mut();
        let x_change = input.take_x_change();
        let y_change = input.take_y_change();
        scene.camera.key_control(window.input(), dt);
        scene.camera.mouse_control(x_change, y_change);
        scene.animation.advance(dt);

        let gl = window.gl();
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        scene.shader.activate(gl);
        scene.shader.set_projection(gl, &scene.projection);
        scene.shader.set_view(gl, &scene.camera.view_matrix());
        if cfg!(debug_assertions) {
            scene.shader.validate(gl);
        }

        let anim = &scene.animation;
        let model = mat4x4_mul(
            mat4x4_translate(anim.offset, 0.0, -2.5),
            mat4x4_mul(
                mat4x4_rot_y(anim.angle.to_radians()),
                mat4x4_scale(anim.size, anim.size, 1.0),
            ),
        );
        scene.shader.set_model(gl, &model);
        scene.meshes[0].render(gl);

        let model = mat4x4_mul(
            mat4x4_translate(0.0, 1.0, -2.5),
            mat4x4_scale(0.4, 0.4, 1.0),
        );
        scene.shader.set_model(gl, &model);
        scene.meshes[1].render(gl);

        scene.shader.deactivate(gl);

        if let Err(e) = window.swap_buffers() {
            log::error!("{e}");
        }
        window.request_redraw();
    }

    fn teardown(&mut self) {
        if let (Some(window), Some(mut scene)) = (self.window.as_ref(), self.scene.take()) {
            scene.release(window.gl());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window =
            match GlWindow::initialize(event_loop, WINDOW_WIDTH, WINDOW_HEIGHT, WINDOW_TITLE) {
                Ok(window) => window,
                Err(e) => {
                    log::error!("startup failed: {e}");
                    self.fatal = Some(e);
                    event_loop.exit();
                    return;
                }
            };

        match Scene::create(&window) {
            Ok(scene) => {
                self.scene = Some(scene);
            }
            Err(e) => {
                log::error!("startup failed: {e}");
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        }

        self.last_frame = Some(Instant::now());
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(window) = self.window.as_mut() {
            window.handle_window_event(&event);

            if window.should_close() {
                event_loop.exit();
                return;
            }
        }

        if let WindowEvent::RedrawRequested = event {
            self.draw_frame();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.fatal {
        anyhow::bail!(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_offset_bounces_within_bounds() {
        let mut anim = Animation::new();
        for _ in 0..10_000 {
            anim.advance(1.0 / 60.0);
            assert!(anim.offset.abs() <= Animation::MAX_OFFSET);
        }
    }

    #[test]
    fn animation_angle_wraps() {
        let mut anim = Animation::new();
        for _ in 0..10_000 {
            anim.advance(0.5);
            assert!((0.0..360.0).contains(&anim.angle));
        }
    }

    #[test]
    fn animation_size_pulses_within_bounds() {
        let mut anim = Animation::new();
        for _ in 0..10_000 {
            anim.advance(1.0 / 30.0);
            assert!(anim.size >= Animation::MIN_SIZE && anim.size <= Animation::MAX_SIZE);
        }
    }

    #[test]
    fn zero_dt_freezes_animation() {
        let mut anim = Animation::new();
        anim.advance(0.0);
        assert_eq!(anim.offset, 0.0);
        assert_eq!(anim.angle, 0.0);
        assert_eq!(anim.size, 0.4);
    }
}
