use std::ffi::CString;
use gl::types::{GLuint, GLint, GLchar, GLenum, GLsizei, GLsizeiptr, GLvoid};

use crate::buffer::*;
use crate::color::Color;
use crate::error::*;
use crate::renderer::*;

const POSITION_ATTRIBUTE: &str = "posIn";
const COLOR_UNIFORM: &str = "color";

///
/// Draws stroke meshes with OpenGL 3.2.
///
/// Needs a current GL context with loaded function pointers for its whole lifetime; every GL
/// object it creates is released when it is dropped.
///
pub struct GlRenderer {
    prog: Program,
    vertex_array: VertexArray,
    vertices: GrowableBuffer<ArrayBuffer>,
    color_location: GLint,
}

impl GlRenderer {
    pub fn new() -> Result<GlRenderer, GlError> {
        let prog = Program::new(include_str!("../shader/stroke.vert"), include_str!("../shader/plain.frag"))?;
        let position_location = prog.attribute(POSITION_ATTRIBUTE)?;
        let color_location = prog.uniform(COLOR_UNIFORM)?;

        let vertex_array = VertexArray::new();
        let vertices = ArrayBuffer::new();
        unsafe {
            gl::BindVertexArray(vertex_array.id);
            gl::BindBuffer(gl::ARRAY_BUFFER, vertices.id);
            // tightly packed pairs of floats
            gl::VertexAttribPointer(position_location, 2, gl::FLOAT, gl::FALSE, 0, std::ptr::null());
            gl::EnableVertexAttribArray(position_location);
            gl::BindVertexArray(0);

            gl::Enable(gl::MULTISAMPLE);
        }
        check_gl_errors("creating renderer");

        log::info!("created OpenGL renderer (program {}, vertex array {})", prog.id, vertex_array.id);

        Ok(GlRenderer {
            prog,
            vertex_array,
            vertices: GrowableBuffer::new(vertices),
            color_location,
        })
    }
}

impl Renderer for GlRenderer {
    fn clear(&mut self, col: Color) {
        unsafe {
            gl::ClearColor(col.r, col.g, col.b, col.a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn upload(&mut self, vertices: &[u8]) {
        self.vertices.upload(vertices);
    }

    fn draw(&mut self, draws: &[DrawCall]) {
        unsafe {
            gl::BindVertexArray(self.vertex_array.id);
            gl::UseProgram(self.prog.id);

            for draw in draws {
                let col = draw.color;
                gl::Uniform4f(self.color_location, col.r, col.g, col.b, col.a);
                gl::DrawArrays(gl::TRIANGLES, draw.first as GLint, draw.count as GLsizei);
            }

            gl::BindVertexArray(0);
        }
        check_gl_errors("drawing strokes");
    }
}

/// Logs every error queued on the current context.
fn check_gl_errors(context: &str) {
    loop {
        let error = unsafe { gl::GetError() };
        if error == gl::NO_ERROR {
            break;
        }
        log::error!("{}: OpenGL error 0x{:04x}", context, error);
    }
}

struct Program {
    id: GLuint,
}

impl Program {
    fn new(vert_src: &str, frag_src: &str) -> Result<Program, GlError> {
        let vert = shader(vert_src, ShaderStage::Vertex)?;
        let frag = match shader(frag_src, ShaderStage::Fragment) {
            Ok(frag) => frag,
            Err(error) => {
                unsafe { gl::DeleteShader(vert); }
                return Err(error);
            }
        };

        unsafe {
            let prog = gl::CreateProgram();
            gl::AttachShader(prog, vert);
            gl::AttachShader(prog, frag);
            gl::LinkProgram(prog);

            gl::DetachShader(prog, vert);
            gl::DetachShader(prog, frag);
            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            let mut valid: GLint = 1;
            gl::GetProgramiv(prog, gl::LINK_STATUS, &mut valid);
            if valid == 0 {
                let mut len: GLint = 0;
                gl::GetProgramiv(prog, gl::INFO_LOG_LENGTH, &mut len);
                let mut log = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(prog, len, std::ptr::null_mut(), log.as_mut_ptr() as *mut GLchar);
                gl::DeleteProgram(prog);
                return Err(GlError::Link(info_log(log)));
            }

            Ok(Program { id: prog })
        }
    }

    fn attribute(&self, name: &'static str) -> Result<GLuint, GlError> {
        let c_name = CString::new(name)?;
        let location = unsafe { gl::GetAttribLocation(self.id, c_name.as_ptr()) };
        if location < 0 {
            return Err(GlError::MissingAttribute(name));
        }
        Ok(location as GLuint)
    }

    fn uniform(&self, name: &'static str) -> Result<GLint, GlError> {
        let c_name = CString::new(name)?;
        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };
        if location < 0 {
            return Err(GlError::MissingUniform(name));
        }
        Ok(location)
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id); }
    }
}

fn shader(shader_src: &str, stage: ShaderStage) -> Result<GLuint, GlError> {
    let shader_src = CString::new(shader_src)?;
    let shader_type: GLenum = match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    };

    unsafe {
        let shader: GLuint = gl::CreateShader(shader_type);
        gl::ShaderSource(shader, 1, &shader_src.as_ptr(), std::ptr::null());
        gl::CompileShader(shader);

        let mut valid: GLint = 1;
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut valid);
        if valid == 0 {
            let mut len: GLint = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut log = vec![0u8; len.max(1) as usize];
            gl::GetShaderInfoLog(shader, len, std::ptr::null_mut(), log.as_mut_ptr() as *mut GLchar);
            gl::DeleteShader(shader);
            return Err(GlError::Compile { stage, log: info_log(log) });
        }

        Ok(shader)
    }
}

fn info_log(mut log: Vec<u8>) -> String {
    if let Some(end) = log.iter().position(|&c| c == 0) {
        log.truncate(end);
    }
    String::from_utf8_lossy(&log).into_owned()
}

struct VertexArray {
    id: GLuint,
}

impl VertexArray {
    fn new() -> VertexArray {
        let mut id: GLuint = 0;
        unsafe { gl::GenVertexArrays(1, &mut id); }
        VertexArray { id }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe { gl::DeleteVertexArrays(1, &self.id); }
    }
}

struct ArrayBuffer {
    id: GLuint,
}

impl ArrayBuffer {
    fn new() -> ArrayBuffer {
        let mut id: GLuint = 0;
        unsafe { gl::GenBuffers(1, &mut id); }
        ArrayBuffer { id }
    }
}

impl BufferStorage for ArrayBuffer {
    fn reallocate(&mut self, data: &[u8]) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.id);
            gl::BufferData(gl::ARRAY_BUFFER, data.len() as GLsizeiptr, data.as_ptr() as *const GLvoid, gl::DYNAMIC_DRAW);
        }
    }

    fn write(&mut self, data: &[u8]) {
        unsafe {
            gl::BindBuffer(gl::ARRAY_BUFFER, self.id);
            gl::BufferSubData(gl::ARRAY_BUFFER, 0, data.len() as GLsizeiptr, data.as_ptr() as *const GLvoid);
        }
    }
}

impl Drop for ArrayBuffer {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.id); }
    }
}
