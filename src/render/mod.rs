pub mod buffers;
pub mod debug;
pub mod renderer;
pub mod shaders;
pub mod source;

pub use buffers::{IndexBuffer, VertexArray, VertexBuffer, VertexLayout};
pub use debug::{guarded_call, ErrorQueue, GlCallError, GlErrorKind, GlErrorQueue};
pub use renderer::Renderer;
pub use shaders::{ShaderError, ShaderProgram};
pub use source::{ShaderSource, ShaderStage, SourceError, SplitPolicy};
