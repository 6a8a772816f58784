use crate::gl_call;
use gl::types::*;
use std::mem::size_of;

/// Vertex data uploaded once with `STATIC_DRAW`.
pub struct VertexBuffer {
    id: GLuint,
}

impl VertexBuffer {
    pub fn new(data: &[f32]) -> Self {
        let mut id = 0;
        gl_call!(gl::GenBuffers(1, &mut id));
        gl_call!(gl::BindBuffer(gl::ARRAY_BUFFER, id));
        gl_call!(gl::BufferData(
            gl::ARRAY_BUFFER,
            (data.len() * size_of::<f32>()) as GLsizeiptr,
            data.as_ptr() as *const _,
            gl::STATIC_DRAW,
        ));
        Self { id }
    }

    pub fn bind(&self) {
        gl_call!(gl::BindBuffer(gl::ARRAY_BUFFER, self.id));
    }

    pub fn unbind(&self) {
        gl_call!(gl::BindBuffer(gl::ARRAY_BUFFER, 0));
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        let id = self.id;
        gl_call!(gl::DeleteBuffers(1, &id));
    }
}

/// Element indices, always `u32`.
pub struct IndexBuffer {
    id: GLuint,
    count: usize,
}

impl IndexBuffer {
    pub fn new(indices: &[u32]) -> Self {
        let mut id = 0;
        gl_call!(gl::GenBuffers(1, &mut id));
        gl_call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id));
        gl_call!(gl::BufferData(
            gl::ELEMENT_ARRAY_BUFFER,
            (indices.len() * size_of::<u32>()) as GLsizeiptr,
            indices.as_ptr() as *const _,
            gl::STATIC_DRAW,
        ));
        Self {
            id,
            count: indices.len(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn bind(&self) {
        gl_call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, self.id));
    }

    pub fn unbind(&self) {
        gl_call!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0));
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        let id = self.id;
        gl_call!(gl::DeleteBuffers(1, &id));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub index: GLuint,
    pub components: GLint,
    pub offset: usize,
}

/// Interleaved float attributes, in push order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_f32(mut self, components: usize) -> Self {
        self.attributes.push(VertexAttribute {
            index: self.attributes.len() as GLuint,
            components: components as GLint,
            offset: self.stride,
        });
        self.stride += components * size_of::<f32>();
        self
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Floats per vertex.
    pub fn floats_per_vertex(&self) -> usize {
        self.stride / size_of::<f32>()
    }
}

pub struct VertexArray {
    id: GLuint,
}

impl VertexArray {
    pub fn new() -> Self {
        let mut id = 0;
        gl_call!(gl::GenVertexArrays(1, &mut id));
        Self { id }
    }

    pub fn add_buffer(&self, buffer: &VertexBuffer, layout: &VertexLayout) {
        self.bind();
        buffer.bind();
        let stride = layout.stride() as GLsizei;
        for attribute in layout.attributes() {
            gl_call!(gl::EnableVertexAttribArray(attribute.index));
            gl_call!(gl::VertexAttribPointer(
                attribute.index,
                attribute.components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                attribute.offset as *const GLvoid,
            ));
        }
    }

    pub fn bind(&self) {
        gl_call!(gl::BindVertexArray(self.id));
    }

    pub fn unbind(&self) {
        gl_call!(gl::BindVertexArray(0));
    }
}

impl Default for VertexArray {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        let id = self.id;
        gl_call!(gl::DeleteVertexArrays(1, &id));
    }
}
