// scene.rs - One scene per exercise, each building on the last

use crate::animation::ColorPulse;
use crate::config::{Exercise, RenderConfig};
use crate::render::{
    IndexBuffer, Renderer, ShaderError, ShaderProgram, VertexArray, VertexBuffer, VertexLayout,
};

/// Name of the color uniform in the tagged shader file.
pub const COLOR_UNIFORM: &str = "u_Color";

/// Corners of a triangle covering the bottom edge and top centre of clip space.
pub const TRIANGLE_POSITIONS: [f32; 6] = [
    -1.0, -1.0, //
    0.0, 1.0, //
    1.0, -1.0,
];

pub const QUAD_POSITIONS: [f32; 8] = [
    -0.5, -0.5, //
    0.5, -0.5, //
    0.5, 0.5, //
    -0.5, 0.5,
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

struct Geometry {
    // Field order is drop order: the array goes before its buffers.
    vertex_array: VertexArray,
    _vertex_buffer: VertexBuffer,
    index_buffer: Option<IndexBuffer>,
    vertex_count: usize,
}

impl Geometry {
    fn new(positions: &[f32], indices: Option<&[u32]>) -> Self {
        let layout = VertexLayout::new().push_f32(2);
        let vertex_array = VertexArray::new();
        let vertex_buffer = VertexBuffer::new(positions);
        vertex_array.add_buffer(&vertex_buffer, &layout);
        let index_buffer = indices.map(IndexBuffer::new);

        vertex_array.unbind();
        vertex_buffer.unbind();
        if let Some(ib) = &index_buffer {
            ib.unbind();
        }

        Self {
            vertex_count: positions.len() / layout.floats_per_vertex(),
            vertex_array,
            _vertex_buffer: vertex_buffer,
            index_buffer,
        }
    }

    fn draw(&self, program: Option<&ShaderProgram>) {
        match &self.index_buffer {
            Some(ib) => Renderer::draw_indexed(&self.vertex_array, ib, program),
            None => {
                if let Some(program) = program {
                    program.bind();
                }
                Renderer::draw_arrays(&self.vertex_array, self.vertex_count)
            }
        }
    }
}

pub struct Scene {
    exercise: Exercise,
    clear_color: [f32; 4],
    geometry: Option<Geometry>,
    program: Option<ShaderProgram>,
    pulse: Option<ColorPulse>,
}

impl Scene {
    /// Builds the GL objects `exercise` needs. Requires a current GL context.
    pub fn new(config: &RenderConfig) -> Result<Self, ShaderError> {
        let exercise = config.exercise;
        log::info!("Setting up exercise {:?}", exercise);

        let geometry = match exercise {
            Exercise::Clear => None,
            Exercise::Triangle => Some(Geometry::new(&TRIANGLE_POSITIONS, None)),
            Exercise::IndexedQuad | Exercise::ShaderFile | Exercise::AnimatedColor => {
                Some(Geometry::new(&QUAD_POSITIONS, Some(&QUAD_INDICES)))
            }
        };

        let program = if exercise.needs_shader() {
            Some(ShaderProgram::from_path(&config.shader_path)?)
        } else {
            None
        };

        let pulse = match exercise {
            Exercise::AnimatedColor => Some(ColorPulse::new(0.0, config.color_step)),
            _ => None,
        };

        let mut scene = Self {
            exercise,
            clear_color: config.clear_color,
            geometry,
            program,
            pulse,
        };
        scene.set_initial_uniforms()?;
        Ok(scene)
    }

    fn set_initial_uniforms(&mut self) -> Result<(), ShaderError> {
        if let (Some(program), Some(pulse)) = (&mut self.program, &self.pulse) {
            program.set_uniform_4f(COLOR_UNIFORM, pulse.rgba())?;
        } else if let Some(program) = &mut self.program {
            program.set_uniform_4f(COLOR_UNIFORM, [0.2, 0.3, 0.8, 1.0])?;
        }
        if let Some(program) = &self.program {
            program.unbind();
        }
        Ok(())
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    /// Draws one frame into the current framebuffer.
    pub fn render(&mut self) -> Result<(), ShaderError> {
        Renderer::set_clear_color(self.clear_color);
        Renderer::clear();

        if let (Some(program), Some(pulse)) = (&mut self.program, &mut self.pulse) {
            program.set_uniform_4f(COLOR_UNIFORM, pulse.rgba())?;
            pulse.advance();
        }

        if let Some(geometry) = &self.geometry {
            geometry.draw(self.program.as_ref());
        }
        Ok(())
    }
}
