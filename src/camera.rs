//! Free-fly camera: yaw/pitch orientation plus kinematic WASD movement.

use crate::input::{KeyQuery, KEY_A, KEY_D, KEY_S, KEY_W};
use crate::math::{
    mat4x4_look_at, vec3_add, vec3_cross, vec3_normalize, vec3_scale, vec3_sub, Mat4x4, Vec3,
};

const PITCH_LIMIT_DEGREES: f32 = 89.0;

pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,

    /// Look angles in degrees. Yaw is unbounded, pitch stays clamped.
    yaw: f32,
    pitch: f32,

    movement_speed: f32,
    turn_speed: f32,
}

impl Camera {
    pub fn new(
        position: Vec3,
        world_up: Vec3,
        yaw_degrees: f32,
        pitch_degrees: f32,
        movement_speed: f32,
        turn_speed: f32,
    ) -> Self {
        let mut camera = Self {
            position,
            front: [0.0, 0.0, -1.0],
            up: world_up,
            right: [1.0, 0.0, 0.0],
            world_up,
            yaw: yaw_degrees,
            pitch: pitch_degrees,
            movement_speed,
            turn_speed,
        };
        camera.update_vectors();
        camera
    }

    /// Moves along the current front/right axes for whichever movement keys
    /// are held. Pure kinematic integration; `delta_time` is expected to be
    /// non-negative (the frame loop clamps it).
    pub fn key_control(&mut self, keys: &impl KeyQuery, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;

        if keys.is_pressed(KEY_W) {
            self.position = vec3_add(self.position, vec3_scale(self.front, velocity));
        }
        if keys.is_pressed(KEY_S) {
            self.position = vec3_sub(self.position, vec3_scale(self.front, velocity));
        }
        if keys.is_pressed(KEY_A) {
            self.position = vec3_sub(self.position, vec3_scale(self.right, velocity));
        }
        if keys.is_pressed(KEY_D) {
            self.position = vec3_add(self.position, vec3_scale(self.right, velocity));
        }
    }

    /// Applies a mouse delta to the look angles. Pitch is clamped short of
    /// straight up/down to avoid gimbal flip.
    pub fn mouse_control(&mut self, x_change: f32, y_change: f32) {
        self.yaw += x_change * self.turn_speed;
        self.pitch += y_change * self.turn_speed;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);

        self.update_vectors();
    }

    /// Look-at transform from the current position toward `position + front`.
    pub fn view_matrix(&self) -> Mat4x4 {
        mat4x4_look_at(self.position, vec3_add(self.position, self.front), self.up)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        self.front = vec3_normalize([
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        ]);
        self.right = vec3_normalize(vec3_cross(self.front, self.world_up));
        self.up = vec3_normalize(vec3_cross(self.right, self.front));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{mat4x4_transform_point, vec3_length};

    struct HeldKeys(Vec<u32>);

    impl KeyQuery for HeldKeys {
        fn is_pressed(&self, code: u32) -> bool {
            self.0.contains(&code)
        }
    }

    fn test_camera() -> Camera {
        Camera::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], -90.0, 0.0, 5.0, 0.2)
    }

    fn approx_vec3(a: Vec3, b: Vec3) -> bool {
        vec3_length(vec3_sub(a, b)) < 1e-5
    }

    #[test]
    fn initial_front_faces_negative_z() {
        let camera = test_camera();
        assert!(approx_vec3(camera.front(), [0.0, 0.0, -1.0]));
        assert!(approx_vec3(camera.right(), [1.0, 0.0, 0.0]));
        assert!(approx_vec3(camera.up(), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn forward_key_moves_along_front() {
        let mut camera = test_camera();
        camera.key_control(&HeldKeys(vec![KEY_W]), 2.0);
        assert!(approx_vec3(camera.position(), [0.0, 0.0, -10.0]));
    }

    #[test]
    fn opposing_keys_cancel_out() {
        let mut camera = test_camera();
        camera.key_control(&HeldKeys(vec![KEY_A, KEY_D]), 1.0);
        assert!(approx_vec3(camera.position(), [0.0, 0.0, 0.0]));
    }

    #[test]
    fn zero_dt_yields_no_motion() {
        let mut camera = test_camera();
        camera.key_control(&HeldKeys(vec![KEY_W, KEY_D]), 0.0);
        assert!(approx_vec3(camera.position(), [0.0, 0.0, 0.0]));
    }

    #[test]
    fn pitch_stays_clamped_under_any_input() {
        let mut camera = test_camera();
        for _ in 0..100 {
            camera.mouse_control(0.0, 1000.0);
        }
        assert!(camera.pitch_degrees() <= 89.0);

        for _ in 0..100 {
            camera.mouse_control(0.0, -1000.0);
        }
        assert!(camera.pitch_degrees() >= -89.0);
    }

    #[test]
    fn basis_stays_unit_length_after_updates() {
        let mut camera = test_camera();
        for i in 0..50 {
            camera.mouse_control(37.0 * i as f32, -13.0 * i as f32);
            assert!((vec3_length(camera.front()) - 1.0).abs() < 1e-4);
            assert!((vec3_length(camera.right()) - 1.0).abs() < 1e-4);
            assert!((vec3_length(camera.up()) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn yaw_turn_rotates_front() {
        let mut camera = test_camera();
        // turn_speed 0.2 deg/px, so 450 px of mouse travel is a 90 degree turn.
        camera.mouse_control(450.0, 0.0);
        assert!(approx_vec3(camera.front(), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn view_matrix_maps_position_to_origin() {
        let mut camera = Camera::new([3.0, 1.0, -4.0], [0.0, 1.0, 0.0], -90.0, 0.0, 5.0, 0.2);
        camera.mouse_control(123.0, -45.0);

        let mapped = mat4x4_transform_point(&camera.view_matrix(), camera.position());
        assert!(approx_vec3(mapped, [0.0, 0.0, 0.0]));
    }
}
