pub mod camera;
pub mod geometry;
pub mod input;
pub mod math;
pub mod mesh;
pub mod shader;
pub mod window;

pub use camera::Camera;
pub use input::{InputState, KeyQuery};
pub use mesh::Mesh;
pub use shader::ShaderProgram;
pub use window::GlWindow;
