use crate::gl_call;
use crate::render::buffers::{IndexBuffer, VertexArray};
use crate::render::shaders::ShaderProgram;
use gl::types::*;
use std::ptr;

/// Frame-level GL state and draw submission.
pub struct Renderer;

impl Renderer {
    pub fn set_clear_color(color: [f32; 4]) {
        let [r, g, b, a] = color;
        gl_call!(gl::ClearColor(r, g, b, a));
    }

    pub fn clear() {
        gl_call!(gl::Clear(gl::COLOR_BUFFER_BIT));
    }

    pub fn viewport(width: u32, height: u32) {
        gl_call!(gl::Viewport(0, 0, width as GLsizei, height as GLsizei));
    }

    pub fn draw_arrays(vertex_array: &VertexArray, vertex_count: usize) {
        vertex_array.bind();
        gl_call!(gl::DrawArrays(gl::TRIANGLES, 0, vertex_count as GLsizei));
    }

    pub fn draw_indexed(
        vertex_array: &VertexArray,
        index_buffer: &IndexBuffer,
        program: Option<&ShaderProgram>,
    ) {
        if let Some(program) = program {
            program.bind();
        }
        vertex_array.bind();
        index_buffer.bind();
        gl_call!(gl::DrawElements(
            gl::TRIANGLES,
            index_buffer.count() as GLsizei,
            gl::UNSIGNED_INT,
            ptr::null(),
        ));
    }
}
