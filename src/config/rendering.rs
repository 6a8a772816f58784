use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The steps of the walkthrough, each adding one thing to the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Exercise {
    /// Open a window and clear it.
    Clear,
    /// Draw a triangle from a vertex buffer.
    Triangle,
    /// Draw a quad through an index buffer.
    IndexedQuad,
    /// Same quad, shaded by a program loaded from a tagged shader file.
    ShaderFile,
    /// Shader file plus a `u_Color` uniform animated every frame.
    #[default]
    AnimatedColor,
}

impl Exercise {
    pub fn needs_shader(self) -> bool {
        matches!(self, Exercise::ShaderFile | Exercise::AnimatedColor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub exercise: Exercise,
    pub shader_path: PathBuf,
    pub clear_color: [f32; 4],
    /// Per-frame change of the animated red channel.
    pub color_step: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            exercise: Exercise::default(),
            shader_path: PathBuf::from("res/shaders/basic.shader"),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            color_step: 0.05,
        }
    }
}
