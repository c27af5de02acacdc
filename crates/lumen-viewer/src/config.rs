use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use lumen_engine::shader::{ShaderError, ShaderPaths, UniformLayout};
use lumen_engine::window::RuntimeConfig;

/// Shaders shipped with the viewer, used when the working directory has none.
///
/// This is the crate's source directory at build time, so the fallback only
/// resolves for binaries run from the build tree (`cargo run`).
const BUNDLED_SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

pub const USAGE: &str = "usage: lumen [VERTEX.wgsl FRAGMENT.wgsl]";

/// Everything the viewer needs before the window opens.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub runtime: RuntimeConfig,
    pub shaders: ShaderPaths,

    /// `vec2<f32>` uniform receiving the viewport size in pixels.
    pub resolution_uniform: String,

    /// `f32` uniform receiving the loop-iteration counter.
    pub frame_count_uniform: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            shaders: ShaderPaths::default(),
            resolution_uniform: "iResolution".to_string(),
            frame_count_uniform: "frameCount".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parses the positional arguments (program name already stripped).
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let mut config = Self::default();

        match args.as_slice() {
            [] => config.shaders = default_shader_paths(Path::new(".")),
            [vertex, fragment] => config.shaders = ShaderPaths::new(vertex, fragment),
            _ => bail!("expected zero or two shader paths, got {}\n{USAGE}", args.len()),
        }

        Ok(config)
    }

    /// Uniform block both shader stages are expected to declare.
    pub fn uniform_layout(&self) -> Result<UniformLayout, ShaderError> {
        UniformLayout::builder()
            .vec2(self.resolution_uniform.as_str())
            .float(self.frame_count_uniform.as_str())
            .build()
    }
}

/// `vert.wgsl`/`frag.wgsl` in `dir` if both exist, otherwise the bundled pair.
fn default_shader_paths(dir: &Path) -> ShaderPaths {
    let local = ShaderPaths::new(dir.join("vert.wgsl"), dir.join("frag.wgsl"));
    if local.vertex.is_file() && local.fragment.is_file() {
        return local;
    }
    let bundled = PathBuf::from(BUNDLED_SHADER_DIR);
    ShaderPaths::new(bundled.join("vert.wgsl"), bundled.join("frag.wgsl"))
}
