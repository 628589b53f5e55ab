//! GLSL shader program wrapper with cached transform uniform locations.

use std::path::Path;

use glow::HasContext;

use crate::math::Mat4x4;

/// Compiled and linked vertex+fragment program. Uniform locations for
/// `model`, `view` and `projection` are resolved once at link time; a name
/// the shader text does not declare stays `None` and writes to it are
/// silently skipped.
pub struct ShaderProgram {
    program: Option<glow::Program>,
    uniform_model: Option<glow::UniformLocation>,
    uniform_view: Option<glow::UniformLocation>,
    uniform_projection: Option<glow::UniformLocation>,
}

impl ShaderProgram {
    pub fn new() -> Self {
        Self {
            program: None,
            uniform_model: None,
            uniform_view: None,
            uniform_projection: None,
        }
    }

    /// Builds the program from raw GLSL text. On any stage-compile or link
    /// failure the driver's info log is returned and the program stays
    /// unusable; it is never partially linked.
    pub fn create_from_source(
        &mut self,
        gl: &glow::Context,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), String> {
        self.release(gl);

        let program = unsafe {
            let program = gl.create_program()?;

            let vs = match compile_stage(gl, glow::VERTEX_SHADER, vertex_source) {
                Ok(vs) => vs,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };
            let fs = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_source) {
                Ok(fs) => fs,
                Err(e) => {
                    gl.delete_shader(vs);
                    gl.delete_program(program);
                    return Err(e);
                }
            };

            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);

            // Stage objects are no longer needed once the program exists.
            gl.delete_shader(vs);
            gl.delete_shader(fs);

            if !gl.get_program_link_status(program) {
                let info_log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("error linking program: {info_log}"));
            }

            program
        };

        unsafe {
            self.uniform_model = gl.get_uniform_location(program, "model");
            self.uniform_view = gl.get_uniform_location(program, "view");
            self.uniform_projection = gl.get_uniform_location(program, "projection");
        }
        self.program = Some(program);

        Ok(())
    }

    /// Equivalent to [`ShaderProgram::create_from_source`] with the two
    /// stages read from disk. A missing file degrades to empty source (with
    /// a logged warning), which then fails compilation downstream.
    pub fn create_from_files(
        &mut self,
        gl: &glow::Context,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<(), String> {
        let vertex_source = read_source(vertex_path.as_ref());
        let fragment_source = read_source(fragment_path.as_ref());
        self.create_from_source(gl, &vertex_source, &fragment_source)
    }

    /// Binds the program for subsequent draws.
    pub fn activate(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(self.program);
        }
    }

    /// Restores the no-program state.
    pub fn deactivate(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(None);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    pub fn set_model(&self, gl: &glow::Context, matrix: &Mat4x4) {
        set_matrix(gl, self.uniform_model.as_ref(), matrix);
    }

    pub fn set_view(&self, gl: &glow::Context, matrix: &Mat4x4) {
        set_matrix(gl, self.uniform_view.as_ref(), matrix);
    }

    pub fn set_projection(&self, gl: &glow::Context, matrix: &Mat4x4) {
        set_matrix(gl, self.uniform_projection.as_ref(), matrix);
    }

    pub fn model_location(&self) -> Option<&glow::UniformLocation> {
        self.uniform_model.as_ref()
    }

    pub fn view_location(&self) -> Option<&glow::UniformLocation> {
        self.uniform_view.as_ref()
    }

    pub fn projection_location(&self) -> Option<&glow::UniformLocation> {
        self.uniform_projection.as_ref()
    }

    /// Single-float setter for the older one-uniform shader variants
    /// (e.g. `xMove`). Looks the name up on demand; missing names are
    /// skipped like any other absent uniform.
    pub fn set_float(&self, gl: &glow::Context, name: &str, value: f32) {
        let Some(program) = self.program else {
            return;
        };
        unsafe {
            if let Some(location) = gl.get_uniform_location(program, name) {
                gl.uniform_1_f32(Some(&location), value);
            }
        }
    }

    /// Asks the driver whether the program would run against the current GL
    /// state and logs whatever it has to say. Diagnostic only; rendering is
    /// never aborted over it.
    pub fn validate(&self, gl: &glow::Context) {
        let Some(program) = self.program else {
            return;
        };
        unsafe {
            gl.validate_program(program);
            let info_log = gl.get_program_info_log(program);
            if !info_log.is_empty() {
                log::debug!("program validation: {info_log}");
            }
        }
    }

    /// Deletes the GL program and forgets the cached uniform locations.
    /// Safe to call repeatedly.
    pub fn release(&mut self, gl: &glow::Context) {
        if let Some(program) = self.program.take() {
            unsafe {
                gl.delete_program(program);
            }
        }
        self.uniform_model = None;
        self.uniform_view = None;
        self.uniform_projection = None;
    }
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::new()
    }
}

fn set_matrix(gl: &glow::Context, location: Option<&glow::UniformLocation>, matrix: &Mat4x4) {
    // Absent uniform: skip the write rather than fail.
    if location.is_some() {
        unsafe {
            // Our matrices are row-major, hence the transpose flag.
            gl.uniform_matrix_4_f32_slice(location, true, matrix);
        }
    }
}

fn compile_stage(gl: &glow::Context, stage: u32, source: &str) -> Result<glow::Shader, String> {
    unsafe {
        let shader = gl.create_shader(stage)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let info_log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            let stage_name = match stage {
                glow::VERTEX_SHADER => "vertex",
                glow::FRAGMENT_SHADER => "fragment",
                _ => "unknown",
            };
            return Err(format!("error compiling {stage_name} shader: {info_log}"));
        }

        Ok(shader)
    }
}

/// Reads a whole shader source file. A missing or unreadable file is
/// reported and treated as empty source so the failure surfaces as a
/// compile error rather than an I/O one.
fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            log::warn!("failed to read shader source {}: {e}", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_program_is_invalid_until_built() {
        let shader = ShaderProgram::new();
        assert!(!shader.is_valid());
        assert!(shader.model_location().is_none());
        assert!(shader.view_location().is_none());
        assert!(shader.projection_location().is_none());
    }

    #[test]
    fn missing_source_file_reads_as_empty() {
        let source = read_source(Path::new("no/such/shader.vert"));
        assert!(source.is_empty());
    }

    #[test]
    fn existing_source_file_reads_verbatim() {
        let dir = std::env::temp_dir();
        let path = dir.join("glsketch_shader_read_test.vert");
        let text = "#version 330\nvoid main() {}\n";
        std::fs::write(&path, text).unwrap();

        assert_eq!(read_source(&path), text);
        let _ = std::fs::remove_file(&path);
    }
}
