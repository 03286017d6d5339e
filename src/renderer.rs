//! WebGL2 renderer for the browser canvas.
//!
//! One shader program, one unit-quad VAO; every draw item is the quad scaled
//! and offset by uniforms. Coordinates are artboard pixels; the vertex shader
//! maps them to clip space with a Y flip so the origin is top-left like the
//! DOM.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::color::Color;
use crate::geometry::Rect;
use crate::scene::Scene;

const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
uniform vec2 u_origin;
uniform vec2 u_size;
uniform vec2 u_resolution;
void main() {
  vec2 position = u_origin + (a_position * u_size);
  vec2 zero_to_one = position / u_resolution;
  vec2 clip = zero_to_one * 2.0 - 1.0;
  gl_Position = vec4(clip.x, -clip.y, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 out_color;
void main() {
  out_color = u_color;
}
"#;

const CLEAR_COLOR: Color = Color::rgba(0.06, 0.07, 0.08, 1.0);
const OUTLINE_COLOR: Color = Color::rgba(0.98, 0.94, 0.9, 1.0);
const HANDLE_COLOR: Color = Color::rgba(0.98, 0.96, 0.93, 1.0);
const HANDLE_SIZE: f32 = 24.0;

pub struct Renderer {
    gl: WebGl2RenderingContext,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    #[allow(dead_code)]
    vertex_buffer: WebGlBuffer,
    #[allow(dead_code)]
    index_buffer: WebGlBuffer,
    uniform_resolution: Option<WebGlUniformLocation>,
    uniform_origin: Option<WebGlUniformLocation>,
    uniform_size: Option<WebGlUniformLocation>,
    uniform_color: Option<WebGlUniformLocation>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("missing document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()?;

        let options = js_sys::Object::new();
        for key in ["alpha", "antialias", "depth", "stencil", "preserveDrawingBuffer"] {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), &JsValue::FALSE)?;
        }
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("powerPreference"),
            &JsValue::from_str("high-performance"),
        )?;

        let gl = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or_else(|| JsValue::from_str("WebGL2 not supported"))?
            .dyn_into::<WebGl2RenderingContext>()?;

        let program = link_program(&gl)?;

        let vertex_buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("failed to create vertex buffer"))?;
        let index_buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("failed to create index buffer"))?;
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| JsValue::from_str("failed to create vertex array"))?;

        gl.bind_vertex_array(Some(&vao));

        // Unit quad; index order doubles as a LINE_LOOP perimeter.
        let vertices: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let vertex_array = js_sys::Float32Array::from(vertices.as_ref());
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
        gl.buffer_data_with_array_buffer_view(
            WebGl2RenderingContext::ARRAY_BUFFER,
            &vertex_array,
            WebGl2RenderingContext::STATIC_DRAW,
        );
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, WebGl2RenderingContext::FLOAT, false, 0, 0);

        let indices: [u16; 4] = [0, 1, 3, 2];
        let index_array = js_sys::Uint16Array::from(indices.as_ref());
        gl.bind_buffer(
            WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
            Some(&index_buffer),
        );
        gl.buffer_data_with_array_buffer_view(
            WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER,
            &index_array,
            WebGl2RenderingContext::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, None);

        gl.use_program(Some(&program));
        let uniform_resolution = gl.get_uniform_location(&program, "u_resolution");
        let uniform_origin = gl.get_uniform_location(&program, "u_origin");
        let uniform_size = gl.get_uniform_location(&program, "u_size");
        let uniform_color = gl.get_uniform_location(&program, "u_color");

        gl.disable(WebGl2RenderingContext::DEPTH_TEST);
        gl.disable(WebGl2RenderingContext::CULL_FACE);
        gl.clear_color(CLEAR_COLOR.r, CLEAR_COLOR.g, CLEAR_COLOR.b, CLEAR_COLOR.a);

        Ok(Self {
            gl,
            program,
            vao,
            vertex_buffer,
            index_buffer,
            uniform_resolution,
            uniform_origin,
            uniform_size,
            uniform_color,
            width: 0,
            height: 0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    /// Draw one frame. A zero-sized viewport clears and returns.
    ///
    /// All draw kinds currently go through the quad pipeline.
    /// TODO: tessellate Oval and Diamond draw kinds instead of quads.
    pub fn render(&self, scene: &Scene) {
        self.gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
        if self.width == 0 || self.height == 0 {
            return;
        }

        self.gl.use_program(Some(&self.program));
        self.gl.bind_vertex_array(Some(&self.vao));
        self.set_resolution();

        for shape in &scene.shapes {
            if !shape.rect.is_drawable() {
                continue;
            }
            self.set_rect(&shape.rect);
            self.set_color(shape.color);
            self.gl
                .draw_arrays(WebGl2RenderingContext::TRIANGLE_STRIP, 0, 4);
        }

        if let Some(rect) = scene.selection {
            if rect.is_drawable() {
                self.draw_selection(&rect);
            }
        }

        self.gl.bind_vertex_array(None);
    }

    fn set_resolution(&self) {
        if let Some(loc) = &self.uniform_resolution {
            self.gl
                .uniform2f(Some(loc), self.width as f32, self.height as f32);
        }
    }

    fn set_rect(&self, rect: &Rect) {
        if let Some(loc) = &self.uniform_origin {
            self.gl.uniform2f(Some(loc), rect.x, rect.y);
        }
        if let Some(loc) = &self.uniform_size {
            self.gl.uniform2f(Some(loc), rect.width, rect.height);
        }
    }

    fn set_color(&self, color: Color) {
        if let Some(loc) = &self.uniform_color {
            self.gl
                .uniform4f(Some(loc), color.r, color.g, color.b, color.a);
        }
    }

    /// Outline plus four corner handles around the selected rect.
    fn draw_selection(&self, rect: &Rect) {
        self.set_rect(rect);
        self.set_color(OUTLINE_COLOR);
        self.gl.line_width(1.0);
        self.gl.draw_elements_with_i32(
            WebGl2RenderingContext::LINE_LOOP,
            4,
            WebGl2RenderingContext::UNSIGNED_SHORT,
            0,
        );

        let half = HANDLE_SIZE * 0.5;
        let corners = [
            (rect.x, rect.y),
            (rect.x + rect.width, rect.y),
            (rect.x + rect.width, rect.y + rect.height),
            (rect.x, rect.y + rect.height),
        ];

        self.set_color(HANDLE_COLOR);
        for (cx, cy) in corners {
            let handle = Rect::new(cx - half, cy - half, HANDLE_SIZE, HANDLE_SIZE);
            self.set_rect(&handle);
            self.gl
                .draw_arrays(WebGl2RenderingContext::TRIANGLE_STRIP, 0, 4);
        }
    }
}

fn link_program(gl: &WebGl2RenderingContext) -> Result<WebGlProgram, JsValue> {
    let vertex = compile_shader(gl, WebGl2RenderingContext::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = compile_shader(gl, WebGl2RenderingContext::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("failed to create program"))?;
    gl.bind_attrib_location(&program, 0, "a_position");
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, WebGl2RenderingContext::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program link error".to_string());
        Err(JsValue::from_str(&log))
    }
}

fn compile_shader(
    gl: &WebGl2RenderingContext,
    shader_type: u32,
    source: &str,
) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| JsValue::from_str("failed to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, WebGl2RenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader compile error".to_string());
        Err(JsValue::from_str(&log))
    }
}
