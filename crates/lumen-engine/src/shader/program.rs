use std::num::NonZeroU64;

use crate::render::{QuadVertex, QUAD_TOPOLOGY};

use super::error::{ShaderError, Stage};
use super::source::{ShaderPaths, ShaderSources};
use super::uniforms::{UniformBlock, UniformLayout};

/// Entry point the vertex source must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point the fragment source must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Compiled vertex/fragment pair plus its uniform buffer.
///
/// Uniform setters only touch the CPU copy; [`ShaderProgram::upload`] pushes
/// pending changes before the pass is recorded.
pub struct ShaderProgram {
    paths: Option<ShaderPaths>,
    format: wgpu::TextureFormat,

    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    uniform_ubo: wgpu::Buffer,

    uniforms: UniformBlock,
    generation: u64,
}

impl ShaderProgram {
    /// Reads both stages from disk and compiles them.
    ///
    /// The paths are remembered for [`ShaderProgram::reload`].
    pub fn load(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        paths: ShaderPaths,
        layout: UniformLayout,
    ) -> Result<Self, ShaderError> {
        let sources = ShaderSources::load(&paths)?;
        let mut program = Self::from_sources(device, format, &sources, layout)?;
        program.paths = Some(paths);
        Ok(program)
    }

    pub fn from_sources(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sources: &ShaderSources,
        layout: UniformLayout,
    ) -> Result<Self, ShaderError> {
        let uniforms = UniformBlock::new(layout);
        let ubo_size = uniforms.layout().size() as u64;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen program bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(ubo_size),
                },
                count: None,
            }],
        });

        let pipeline = compile(device, format, sources, &bind_group_layout)?;

        let uniform_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen program uniforms"),
            size: ubo_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen program bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        Ok(Self {
            paths: None,
            format,
            pipeline,
            bind_group_layout,
            bind_group,
            uniform_ubo,
            uniforms,
            generation: 0,
        })
    }

    pub fn paths(&self) -> Option<&ShaderPaths> {
        self.paths.as_ref()
    }

    /// Number of successful reloads since the program was built.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Re-reads and recompiles both stages.
    ///
    /// On error the current pipeline stays in use. Uniform values survive the
    /// reload since the buffer and layout are unchanged.
    pub fn reload(&mut self, device: &wgpu::Device) -> Result<(), ShaderError> {
        let Some(paths) = self.paths.as_ref() else {
            log::debug!("program was built from in-memory sources; nothing to reload");
            return Ok(());
        };

        let sources = ShaderSources::load(paths)?;
        self.pipeline = compile(device, self.format, &sources, &self.bind_group_layout)?;
        self.generation += 1;
        log::info!(
            "reloaded shaders {} + {}",
            paths.vertex.display(),
            paths.fragment.display()
        );
        Ok(())
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.uniforms.set_float(name, value)
    }

    pub fn set_vec2(&mut self, name: &str, value: [f32; 2]) -> Result<(), ShaderError> {
        self.uniforms.set_vec2(name, value)
    }

    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) -> Result<(), ShaderError> {
        self.uniforms.set_vec3(name, value)
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) -> Result<(), ShaderError> {
        self.uniforms.set_vec4(name, value)
    }

    /// Writes pending uniform changes to the GPU buffer.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        if let Some(bytes) = self.uniforms.take_changed() {
            queue.write_buffer(&self.uniform_ubo, 0, bytes);
        }
    }

    /// Binds the pipeline and uniforms on `rpass`.
    pub fn use_program(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
    }
}

fn compile(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    sources: &ShaderSources,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    // Invalid WGSL would otherwise reach the uncaptured-error handler and abort.
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let vs = create_module(device, Stage::Vertex, sources);
    let fs = create_module(device, Stage::Fragment, sources);

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("lumen program pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("lumen program pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &vs,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &fs,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: QUAD_TOPOLOGY,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    let scope_error = pollster::block_on(scope.pop());

    // Per-stage diagnostics carry line numbers; prefer them over the scope error.
    for (stage, module) in [(Stage::Vertex, &vs), (Stage::Fragment, &fs)] {
        let info = pollster::block_on(module.get_compilation_info());
        if let Some(message) = compile_errors(&info) {
            return Err(ShaderError::Compile { stage, message });
        }
    }

    if let Some(err) = scope_error {
        return Err(ShaderError::Link(err.to_string()));
    }

    Ok(pipeline)
}

fn create_module(device: &wgpu::Device, stage: Stage, sources: &ShaderSources) -> wgpu::ShaderModule {
    let label = match stage {
        Stage::Vertex => "lumen vertex shader",
        Stage::Fragment => "lumen fragment shader",
    };
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(sources.get(stage).into()),
    })
}

/// Joins the error messages; naga already renders the source location into each.
fn compile_errors(info: &wgpu::CompilationInfo) -> Option<String> {
    let lines: Vec<&str> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| m.message.as_str())
        .collect();

    if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    const VERT: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.pos = vec4<f32>(pos, 1.0);
    return out;
}
"#;

    const FRAG: &str = r#"
struct Uniforms {
    iResolution: vec2<f32>,
    frameCount: f32,
};

@group(0) @binding(0) var<uniform> u: Uniforms;

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    let uv = pos.xy / u.iResolution;
    return vec4<f32>(uv, fract(u.frameCount * 0.01), 1.0);
}
"#;

    // Declares 32 bytes of uniforms against a 16-byte binding.
    const FRAG_OVERSIZED_UNIFORMS: &str = r#"
struct Uniforms {
    iResolution: vec2<f32>,
    frameCount: f32,
    tint: vec4<f32>,
};

@group(0) @binding(0) var<uniform> u: Uniforms;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return u.tint;
}
"#;

    const FRAG_BROKEN: &str = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0 }";

    fn noop_device() -> wgpu::Device {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::NOOP,
            backend_options: wgpu::BackendOptions {
                noop: wgpu::NoopBackendOptions { enable: true },
                ..Default::default()
            },
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
            .expect("noop adapter");
        let (device, _queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
            .expect("noop device");
        device
    }

    fn layout() -> UniformLayout {
        UniformLayout::builder()
            .vec2("iResolution")
            .float("frameCount")
            .build()
            .unwrap()
    }

    fn sources(vertex: &str, fragment: &str) -> ShaderSources {
        ShaderSources::new(vertex, fragment)
    }

    struct TempShaders {
        dir: PathBuf,
        paths: ShaderPaths,
    }

    impl TempShaders {
        fn new(tag: &str, vertex: &str, fragment: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("lumen-program-{tag}-{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            let paths = ShaderPaths {
                vertex: dir.join("vert.wgsl"),
                fragment: dir.join("frag.wgsl"),
            };
            std::fs::write(&paths.vertex, vertex).unwrap();
            std::fs::write(&paths.fragment, fragment).unwrap();
            Self { dir, paths }
        }

        fn write_fragment(&self, fragment: &str) {
            std::fs::write(&self.paths.fragment, fragment).unwrap();
        }
    }

    impl Drop for TempShaders {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn valid_pair_builds() {
        let device = noop_device();
        let program = ShaderProgram::from_sources(&device, FORMAT, &sources(VERT, FRAG), layout()).unwrap();
        assert_eq!(program.generation(), 0);
        assert!(program.paths().is_none());
    }

    #[test]
    fn syntax_error_is_a_fragment_compile_error() {
        let device = noop_device();
        let err = ShaderProgram::from_sources(&device, FORMAT, &sources(VERT, FRAG_BROKEN), layout())
            .err()
            .expect("broken fragment must not build");
        match err {
            ShaderError::Compile { stage, message } => {
                assert_eq!(stage, Stage::Fragment);
                assert!(!message.is_empty());
            }
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn binding_size_mismatch_is_a_link_error() {
        let device = noop_device();
        let err = ShaderProgram::from_sources(&device, FORMAT, &sources(VERT, FRAG_OVERSIZED_UNIFORMS), layout())
            .err()
            .expect("oversized uniform struct must not link");
        assert!(matches!(err, ShaderError::Link(_)), "got {err:?}");
    }

    #[test]
    fn missing_entry_point_is_a_link_error() {
        let device = noop_device();
        let renamed = FRAG.replace("fn fs_main", "fn main_image");
        let err = ShaderProgram::from_sources(&device, FORMAT, &sources(VERT, &renamed), layout())
            .err()
            .expect("missing fs_main must not link");
        assert!(matches!(err, ShaderError::Link(_)), "got {err:?}");
    }

    // ── reload ────────────────────────────────────────────────────────────

    #[test]
    fn failed_reload_keeps_program_then_recovers() {
        let device = noop_device();
        let files = TempShaders::new("reload", VERT, FRAG);
        let mut program = ShaderProgram::load(&device, FORMAT, files.paths.clone(), layout()).unwrap();
        program.set_float("frameCount", 7.0).unwrap();

        files.write_fragment(FRAG_BROKEN);
        let err = program.reload(&device).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Fragment, .. }));
        assert_eq!(program.generation(), 0, "failed reload must not swap the pipeline");

        files.write_fragment(FRAG);
        program.reload(&device).unwrap();
        assert_eq!(program.generation(), 1);
        assert_eq!(program.uniforms().get("frameCount").unwrap(), vec![7.0]);
    }

    #[test]
    fn reload_of_deleted_file_is_an_io_error() {
        let device = noop_device();
        let files = TempShaders::new("deleted", VERT, FRAG);
        let mut program = ShaderProgram::load(&device, FORMAT, files.paths.clone(), layout()).unwrap();

        std::fs::remove_file(&files.paths.vertex).unwrap();
        let err = program.reload(&device).unwrap_err();
        assert!(matches!(err, ShaderError::Io { stage: Stage::Vertex, .. }));
        assert_eq!(program.generation(), 0);
    }

    #[test]
    fn in_memory_program_reload_is_a_no_op() {
        let device = noop_device();
        let mut program = ShaderProgram::from_sources(&device, FORMAT, &sources(VERT, FRAG), layout()).unwrap();
        program.reload(&device).unwrap();
        assert_eq!(program.generation(), 0);
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    fn message(text: &str, message_type: wgpu::CompilationMessageType) -> wgpu::CompilationMessage {
        wgpu::CompilationMessage {
            message: text.to_string(),
            message_type,
            location: Some(wgpu::SourceLocation {
                line_number: 3,
                line_position: 14,
                offset: 40,
                length: 1,
            }),
        }
    }

    #[test]
    fn diagnostics_keep_only_errors_verbatim() {
        let info = wgpu::CompilationInfo {
            messages: vec![
                message("unused variable", wgpu::CompilationMessageType::Warning),
                message("expected ')', found '}'", wgpu::CompilationMessageType::Error),
            ],
        };
        assert_eq!(compile_errors(&info).as_deref(), Some("expected ')', found '}'"));
    }

    #[test]
    fn no_errors_means_no_diagnostics() {
        let info = wgpu::CompilationInfo {
            messages: vec![message("unused variable", wgpu::CompilationMessageType::Warning)],
        };
        assert!(compile_errors(&info).is_none());
    }
}
