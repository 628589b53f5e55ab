//! Keyboard/mouse state shared between the window and the camera.
//!
//! Key codes follow the GLFW numbering the original tutorial family uses
//! (letters map to their ASCII uppercase value, Escape is 256), so the key
//! table stays a plain array indexed by code.

use winit::keyboard::{KeyCode, PhysicalKey};

pub const KEY_TABLE_SIZE: usize = 1024;

pub const KEY_A: u32 = 65;
pub const KEY_D: u32 = 68;
pub const KEY_S: u32 = 83;
pub const KEY_W: u32 = 87;
pub const KEY_ESCAPE: u32 = 256;
pub const KEY_RIGHT: u32 = 262;
pub const KEY_LEFT: u32 = 263;
pub const KEY_DOWN: u32 = 264;
pub const KEY_UP: u32 = 265;

/// Narrow capability the camera needs from the input layer: a queryable
/// boolean key state, nothing more.
pub trait KeyQuery {
    fn is_pressed(&self, code: u32) -> bool;
}

/// Translates a winit physical key into the integer code used by the key
/// table. Keys the application does not care about map to `None`.
pub fn key_code(key: PhysicalKey) -> Option<u32> {
    let code = match key {
        PhysicalKey::Code(KeyCode::KeyA) => KEY_A,
        PhysicalKey::Code(KeyCode::KeyD) => KEY_D,
        PhysicalKey::Code(KeyCode::KeyS) => KEY_S,
        PhysicalKey::Code(KeyCode::KeyW) => KEY_W,
        PhysicalKey::Code(KeyCode::Escape) => KEY_ESCAPE,
        PhysicalKey::Code(KeyCode::ArrowRight) => KEY_RIGHT,
        PhysicalKey::Code(KeyCode::ArrowLeft) => KEY_LEFT,
        PhysicalKey::Code(KeyCode::ArrowDown) => KEY_DOWN,
        PhysicalKey::Code(KeyCode::ArrowUp) => KEY_UP,
        _ => return None,
    };
    Some(code)
}

/// Keyboard table plus relative mouse movement, written by the window's
/// event handling and read by the camera once per frame.
pub struct InputState {
    keys: [bool; KEY_TABLE_SIZE],
    last_x: f64,
    last_y: f64,
    x_change: f32,
    y_change: f32,
    mouse_first_moved: bool,
    close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_TABLE_SIZE],
            last_x: 0.0,
            last_y: 0.0,
            x_change: 0.0,
            y_change: 0.0,
            mouse_first_moved: true,
            close_requested: false,
        }
    }

    /// Flips the key table entry for `code`. Escape presses additionally
    /// request window close. Codes outside the table are ignored.
    pub fn handle_key(&mut self, code: u32, pressed: bool) {
        if code == KEY_ESCAPE && pressed {
            self.close_requested = true;
        }

        if let Some(entry) = self.keys.get_mut(code as usize) {
            *entry = pressed;
        }
    }

    /// Accumulates the cursor delta relative to the previous sample. The
    /// very first sample only seeds the reference point, so a window that
    /// opens with the cursor far from the origin does not register a jump.
    /// Vertical movement is inverted: upward motion yields a positive dy.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        if self.mouse_first_moved {
            self.last_x = x;
            self.last_y = y;
            self.mouse_first_moved = false;
        }

        self.x_change += (x - self.last_x) as f32;
        self.y_change += (self.last_y - y) as f32;

        self.last_x = x;
        self.last_y = y;
    }

    /// Returns the horizontal mouse delta accumulated since the last call
    /// and resets it.
    pub fn take_x_change(&mut self) -> f32 {
        std::mem::take(&mut self.x_change)
    }

    /// Returns the vertical mouse delta accumulated since the last call
    /// and resets it.
    pub fn take_y_change(&mut self) -> f32 {
        std::mem::take(&mut self.y_change)
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl KeyQuery for InputState {
    fn is_pressed(&self, code: u32) -> bool {
        self.keys.get(code as usize).copied().unwrap_or(false)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_flip_key_state() {
        let mut input = InputState::new();
        assert!(!input.is_pressed(KEY_W));

        input.handle_key(KEY_W, true);
        assert!(input.is_pressed(KEY_W));

        input.handle_key(KEY_W, false);
        assert!(!input.is_pressed(KEY_W));
    }

    #[test]
    fn out_of_range_codes_never_alter_state() {
        let mut input = InputState::new();
        input.handle_key(1024, true);
        input.handle_key(4096, true);

        assert!(!input.is_pressed(1024));
        assert!(!input.is_pressed(4096));
        for code in 0..KEY_TABLE_SIZE as u32 {
            assert!(!input.is_pressed(code));
        }
    }

    #[test]
    fn escape_press_requests_close() {
        let mut input = InputState::new();
        assert!(!input.close_requested());

        input.handle_key(KEY_ESCAPE, true);
        assert!(input.close_requested());
    }

    #[test]
    fn escape_release_does_not_request_close() {
        let mut input = InputState::new();
        input.handle_key(KEY_ESCAPE, false);
        assert!(!input.close_requested());
    }

    #[test]
    fn first_mouse_sample_seeds_without_delta() {
        let mut input = InputState::new();
        input.handle_cursor_moved(640.0, 360.0);

        assert_eq!(input.take_x_change(), 0.0);
        assert_eq!(input.take_y_change(), 0.0);
    }

    #[test]
    fn mouse_delta_is_relative_with_inverted_y() {
        let mut input = InputState::new();
        input.handle_cursor_moved(100.0, 100.0);
        input.handle_cursor_moved(110.0, 95.0);

        assert_eq!(input.take_x_change(), 10.0);
        assert_eq!(input.take_y_change(), 5.0);
    }

    #[test]
    fn mouse_delta_accumulates_between_reads() {
        let mut input = InputState::new();
        input.handle_cursor_moved(0.0, 0.0);
        input.handle_cursor_moved(3.0, 0.0);
        input.handle_cursor_moved(7.0, 0.0);

        assert_eq!(input.take_x_change(), 7.0);
    }

    #[test]
    fn reading_twice_yields_zero_the_second_time() {
        let mut input = InputState::new();
        input.handle_cursor_moved(0.0, 0.0);
        input.handle_cursor_moved(5.0, -5.0);

        assert_eq!(input.take_x_change(), 5.0);
        assert_eq!(input.take_x_change(), 0.0);
        assert_eq!(input.take_y_change(), 5.0);
        assert_eq!(input.take_y_change(), 0.0);
    }

    #[test]
    fn wasd_translation_from_winit_codes() {
        assert_eq!(key_code(PhysicalKey::Code(KeyCode::KeyW)), Some(KEY_W));
        assert_eq!(key_code(PhysicalKey::Code(KeyCode::Escape)), Some(KEY_ESCAPE));
        assert_eq!(key_code(PhysicalKey::Code(KeyCode::F24)), None);
    }
}
