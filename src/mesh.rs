//! GPU mesh wrapper: one vertex buffer, one index buffer, one VAO.

use glow::HasContext;

/// Owns the GL objects for one indexed triangle mesh. Handles stay `None`
/// until [`Mesh::upload`] and return to `None` on [`Mesh::release`].
pub struct Mesh {
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    ibo: Option<glow::Buffer>,
    index_count: i32,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vao: None,
            vbo: None,
            ibo: None,
            index_count: 0,
        }
    }

    /// Uploads positions (three floats per vertex, tightly packed at
    /// attribute 0) and triangle-list indices to freshly allocated buffers.
    /// Any previous allocation is released first, so re-upload never leaks.
    pub fn upload(
        &mut self,
        gl: &glow::Context,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<(), String> {
        self.release(gl);

        unsafe {
            let vao = gl.create_vertex_array()?;
            gl.bind_vertex_array(Some(vao));

            let ibo = gl.create_buffer()?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                glow::STATIC_DRAW,
            );

            let vbo = gl.create_buffer()?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(0);

            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
            // The element buffer binding is part of VAO state; unbind it
            // only after the VAO so the association sticks.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            self.vao = Some(vao);
            self.vbo = Some(vbo);
            self.ibo = Some(ibo);
        }

        self.index_count = indices.len() as i32;
        Ok(())
    }

    /// Issues one indexed triangle-list draw covering the uploaded indices.
    /// A mesh that has not been uploaded is skipped with a warning.
    pub fn render(&self, gl: &glow::Context) {
        let Some(vao) = self.vao else {
            log::warn!("mesh render skipped: no geometry uploaded");
            return;
        };

        unsafe {
            gl.bind_vertex_array(Some(vao));
            gl.draw_elements(glow::TRIANGLES, self.index_count, glow::UNSIGNED_INT, 0);
            gl.bind_vertex_array(None);
        }
    }

    /// Frees every GL object this mesh still holds. Safe to call repeatedly;
    /// each handle is taken before deletion.
    pub fn release(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(ibo) = self.ibo.take() {
                gl.delete_buffer(ibo);
            }
            if let Some(vbo) = self.vbo.take() {
                gl.delete_buffer(vbo);
            }
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
            }
        }

        self.index_count = 0;
    }

    pub fn is_uploaded(&self) -> bool {
        self.vao.is_some()
    }

    /// Number of indices covered by one [`Mesh::render`] call.
    pub fn index_count(&self) -> i32 {
        self.index_count
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mesh_owns_nothing() {
        let mesh = Mesh::new();
        assert!(!mesh.is_uploaded());
        assert_eq!(mesh.index_count(), 0);
    }
}
