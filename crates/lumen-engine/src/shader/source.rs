use std::path::{Path, PathBuf};

use super::error::{ShaderError, Stage};

/// Locations of the vertex and fragment sources.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self::new("./vert.wgsl", "./frag.wgsl")
    }
}

/// WGSL text for both stages.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Reads both files. The first failure is returned with its stage and path.
    pub fn load(paths: &ShaderPaths) -> Result<Self, ShaderError> {
        let vertex = read_stage(Stage::Vertex, &paths.vertex)?;
        let fragment = read_stage(Stage::Fragment, &paths.fragment)?;
        log::debug!(
            "loaded shaders {} ({} bytes), {} ({} bytes)",
            paths.vertex.display(),
            vertex.len(),
            paths.fragment.display(),
            fragment.len()
        );
        Ok(Self { vertex, fragment })
    }

    pub fn get(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }
}

fn read_stage(stage: Stage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_both_stages() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("v.wgsl"), "// vertex").unwrap();
        std::fs::write(dir.join("f.wgsl"), "// fragment").unwrap();

        let src = ShaderSources::load(&ShaderPaths::new(dir.join("v.wgsl"), dir.join("f.wgsl")))
            .unwrap();
        assert_eq!(src.get(Stage::Vertex), "// vertex");
        assert_eq!(src.get(Stage::Fragment), "// fragment");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_fragment_reports_stage_and_path() {
        let dir = scratch_dir("missing");
        std::fs::write(dir.join("v.wgsl"), "// vertex").unwrap();
        let frag = dir.join("nope.wgsl");

        let err = ShaderSources::load(&ShaderPaths::new(dir.join("v.wgsl"), &frag)).unwrap_err();
        match err {
            ShaderError::Io { stage, path, .. } => {
                assert_eq!(stage, Stage::Fragment);
                assert_eq!(path, frag);
            }
            other => panic!("unexpected error: {other}"),
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn default_paths_are_cwd_relative() {
        let p = ShaderPaths::default();
        assert_eq!(p.vertex, PathBuf::from("./vert.wgsl"));
        assert_eq!(p.fragment, PathBuf::from("./frag.wgsl"));
    }
}
