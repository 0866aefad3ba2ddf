use macroquad::miniquad::{BlendFactor, BlendState, BlendValue, Equation, PipelineParams};
use macroquad::prelude::*;

use crate::fire::{BlendMode, RenderSurface};

const FIRE_VERT: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 color0;
varying lowp vec2 uv;
varying lowp vec4 color;
uniform mat4 Model;
uniform mat4 Projection;
void main() {
    gl_Position = Projection * Model * vec4(position, 1);
    color = color0 / 255.0;
    uv = texcoord;
}
"#;

const FIRE_FRAG: &str = r#"#version 100
precision lowp float;
varying lowp vec2 uv;
varying lowp vec4 color;
uniform sampler2D Texture;
void main() {
    gl_FragColor = color * texture2D(Texture, uv);
}
"#;

/// Offscreen canvas the fire draws into. Keeps its contents between frames
/// so the trail overlay can fade them.
pub struct FireCanvas {
    target: RenderTarget,
    camera: Camera2D,
    additive: Material,
    size: Vec2,
}

impl FireCanvas {
    /// `None` when the GPU side cannot be set up; the fire loop then stops.
    pub fn new(size: Vec2) -> Option<Self> {
        let target = render_target(size.x as u32, size.y as u32);
        target.texture.set_filter(FilterMode::Linear);

        let additive = load_material(
            ShaderSource::Glsl {
                vertex: FIRE_VERT,
                fragment: FIRE_FRAG,
            },
            MaterialParams {
                pipeline_params: PipelineParams {
                    color_blend: Some(BlendState::new(
                        Equation::Add,
                        BlendFactor::Value(BlendValue::SourceAlpha),
                        BlendFactor::One,
                    )),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .ok()?;

        let camera = Camera2D {
            render_target: Some(target.clone()),
            ..Camera2D::from_display_rect(Rect::new(0.0, 0.0, size.x, size.y))
        };

        set_camera(&camera);
        clear_background(Color::new(0.0, 0.0, 0.0, 0.0));
        set_default_camera();

        Some(Self {
            target,
            camera,
            additive,
            size,
        })
    }

    /// Composite onto the screen additively so the dark trail never hides
    /// what lies underneath.
    pub fn present(&self, top_left: Vec2) {
        gl_use_material(&self.additive);
        draw_texture_ex(
            &self.target.texture,
            top_left.x,
            top_left.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(self.size),
                flip_y: true,
                ..Default::default()
            },
        );
        gl_use_default_material();
    }
}

impl RenderSurface for FireCanvas {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn set_blend(&mut self, mode: BlendMode) {
        match mode {
            BlendMode::SourceOver => gl_use_default_material(),
            BlendMode::Additive => gl_use_material(&self.additive),
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        draw_rectangle(origin.x, origin.y, size.x, size.y, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_circle(center.x, center.y, radius, color);
    }

    fn begin_frame(&mut self) {
        set_camera(&self.camera);
    }

    fn end_frame(&mut self) {
        gl_use_default_material();
        set_default_camera();
    }
}
