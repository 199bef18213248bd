//! The render loop: one textured quad, moved with the arrow keys.

use std::path::PathBuf;

use anyhow::{Context, Result};
use learngl_engine::core::{App, AppControl, FrameCtx};
use learngl_engine::device::GlDevice;
use learngl_engine::render::{IndexedMesh, PixelFormat, ShaderProgram, TextureParams, VertexAttribute, WrapMode};

use crate::controls::FrameInput;
use crate::scene::{RenderState, SceneState, Transforms, QUAD_INDICES, QUAD_VERTICES};
use crate::textures::{load_texture_slot, TextureSlot};

/// Files read at startup, relative to the working directory.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub base_texture: PathBuf,
    pub overlay_texture: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            vertex_shader: "assets/texture_sh.vert".into(),
            fragment_shader: "assets/texture_sh.frag".into(),
            base_texture: "assets/container.jpg".into(),
            overlay_texture: "assets/bloodtrail.png".into(),
        }
    }
}

const QUAD_LAYOUT: [VertexAttribute; 2] = [
    VertexAttribute::new(0, 3), // position
    VertexAttribute::new(1, 2), // texcoord
];

/// GL objects owned by the scene. Dropped in `on_exit`.
struct Resources {
    program: ShaderProgram,
    quad: IndexedMesh,
    textures: [TextureSlot; 2],
}

pub struct QuadApp {
    assets: AssetPaths,
    render: RenderState,
    scene: SceneState,
    resources: Option<Resources>,
}

impl QuadApp {
    pub fn new(assets: AssetPaths, render: RenderState) -> Self {
        Self {
            assets,
            render,
            scene: SceneState::default(),
            resources: None,
        }
    }
}

impl App for QuadApp {
    fn init(&mut self, device: &GlDevice) -> Result<()> {
        let gl = device.gl();

        let program = ShaderProgram::from_files(gl, &self.assets.vertex_shader, &self.assets.fragment_shader)
            .context("failed to build texture shader")?;

        let quad = IndexedMesh::new(gl, &QUAD_VERTICES, &QUAD_INDICES, &QUAD_LAYOUT)
            .context("failed to create quad mesh")?;

        let textures = [
            load_texture_slot(
                gl,
                &self.assets.base_texture,
                &TextureParams::new(WrapMode::ClampToEdge, PixelFormat::Rgb, PixelFormat::Rgb),
            ),
            load_texture_slot(
                gl,
                &self.assets.overlay_texture,
                &TextureParams::new(WrapMode::Repeat, PixelFormat::Rgba, PixelFormat::Rgba),
            ),
        ];
        for slot in &textures {
            if let TextureSlot::Missing { path } = slot {
                log::warn!("rendering without {}", path.display());
            }
        }

        program.use_program();
        program.set_int("texture1", 0);
        program.set_int("texture2", 1);

        self.resources = Some(Resources { program, quad, textures });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let input = FrameInput::sample(ctx.input, ctx.input_frame);
        if input.control() == AppControl::Exit {
            return AppControl::Exit;
        }

        let Some(res) = &self.resources else {
            return AppControl::Continue;
        };
        let Some(aspect) = ctx.device.aspect_ratio() else {
            return AppControl::Continue;
        };

        self.scene.advance(&input, ctx.time.dt);
        let transforms = Transforms::compose(&self.render, &self.scene, aspect);
        let render = self.render;

        ctx.render(render.clear_color, |gl| {
            for (unit, slot) in res.textures.iter().enumerate() {
                slot.bind(gl, unit as u32);
            }

            res.program.use_program();
            res.program.set_float("mixValue", render.mix_value);
            res.program.set_mat4("model", &transforms.model);
            res.program.set_mat4("view", &transforms.view);
            res.program.set_mat4("projection", &transforms.projection);

            res.quad.draw();
        })
    }

    fn on_exit(&mut self) {
        if self.resources.take().is_some() {
            log::debug!("released scene resources");
        }
    }
}
