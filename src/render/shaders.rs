// shaders.rs - Shader program compilation and uniforms

use crate::gl_call;
use crate::render::source::{ShaderSource, ShaderStage, SourceError};
use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::path::Path;
use std::ptr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// A linked vertex + fragment program.
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    /// Loads a tagged shader file and builds a program from it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let source = ShaderSource::from_path(path)?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &ShaderSource) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile_shader(ShaderStage::Vertex, source.vertex())?;
        let fragment_shader = match Self::compile_shader(ShaderStage::Fragment, source.fragment()) {
            Ok(shader) => shader,
            Err(e) => {
                gl_call!(gl::DeleteShader(vertex_shader));
                return Err(e);
            }
        };

        let program = gl_call!(gl::CreateProgram());
        gl_call!(gl::AttachShader(program, vertex_shader));
        gl_call!(gl::AttachShader(program, fragment_shader));
        gl_call!(gl::LinkProgram(program));
        gl_call!(gl::ValidateProgram(program));
        gl_call!(gl::DeleteShader(vertex_shader));
        gl_call!(gl::DeleteShader(fragment_shader));

        let mut success = 1;
        gl_call!(gl::GetProgramiv(program, gl::LINK_STATUS, &mut success));

        if success == 0 {
            let mut len = 0;
            gl_call!(gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len));

            let error = create_whitespace_cstring_with_len(len as usize);
            gl_call!(gl::GetProgramInfoLog(
                program,
                len,
                ptr::null_mut(),
                error.as_ptr() as *mut GLchar,
            ));
            gl_call!(gl::DeleteProgram(program));

            return Err(ShaderError::Linking(error.to_string_lossy().into_owned()));
        }

        log::info!("Linked shader program {}", program);
        Ok(ShaderProgram {
            id: program,
            uniforms: HashMap::new(),
        })
    }

    fn compile_shader(stage: ShaderStage, source: &str) -> Result<GLuint, ShaderError> {
        let source_cstring = CString::new(source.as_bytes())?;

        let shader = gl_call!(gl::CreateShader(stage.gl_kind()));
        gl_call!(gl::ShaderSource(shader, 1, &source_cstring.as_ptr(), ptr::null()));
        gl_call!(gl::CompileShader(shader));

        let mut success = 1;
        gl_call!(gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success));

        if success == 0 {
            let mut len = 0;
            gl_call!(gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len));

            let error = create_whitespace_cstring_with_len(len as usize);
            gl_call!(gl::GetShaderInfoLog(
                shader,
                len,
                ptr::null_mut(),
                error.as_ptr() as *mut GLchar,
            ));
            gl_call!(gl::DeleteShader(shader));

            let log = error.to_string_lossy().into_owned();
            log::error!("Failed to compile {} shader: {}", stage, log);
            return Err(ShaderError::Compilation { stage, log });
        }

        Ok(shader)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        gl_call!(gl::UseProgram(self.id));
    }

    pub fn unbind(&self) {
        gl_call!(gl::UseProgram(0));
    }

    pub fn uniform_location(&mut self, name: &str) -> Result<GLint, ShaderError> {
        if let Some(location) = self.uniforms.get(name) {
            return Ok(*location);
        }

        let cname = CString::new(name)?;
        let id = self.id;
        let location = gl_call!(gl::GetUniformLocation(id, cname.as_ptr()));

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        Ok(location)
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.bind();
        let location = self.uniform_location(name)?;
        gl_call!(gl::Uniform1f(location, value));
        Ok(())
    }

    pub fn set_uniform_4f(&mut self, name: &str, value: [f32; 4]) -> Result<(), ShaderError> {
        self.bind();
        let location = self.uniform_location(name)?;
        let [x, y, z, w] = value;
        gl_call!(gl::Uniform4f(location, x, y, z, w));
        Ok(())
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        let id = self.id;
        gl_call!(gl::DeleteProgram(id));
    }
}

fn create_whitespace_cstring_with_len(len: usize) -> CString {
    let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
    buffer.extend([b' '].iter().cycle().take(len));
    // No interior nulls: the buffer is all spaces
    unsafe { CString::from_vec_unchecked(buffer) }
}
