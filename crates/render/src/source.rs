use std::fmt;
use std::path::{Path, PathBuf};

use crate::variant::{ShaderVariant, VERTEX_FILE};

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised while loading, compiling or linking shader sources.
///
/// Any of these aborts startup; the viewer cannot run without its program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} does not declare input `{name}`", path.display())]
    MissingInput { path: PathBuf, name: &'static str },
    #[error("{stage} shader {} failed to compile:\n{message}", path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        message: String,
    },
    #[error("shader program failed to link:\n{message}")]
    Link { message: String },
}

/// One shader file and its text.
#[derive(Debug, Clone)]
pub struct ShaderFile {
    pub path: PathBuf,
    pub text: String,
}

impl ShaderFile {
    pub fn read(path: PathBuf) -> Result<Self, ShaderError> {
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Self { path, text }),
            Err(source) => Err(ShaderError::Read { path, source }),
        }
    }

    /// True when `ident` appears as a whole identifier in the source.
    pub fn mentions(&self, ident: &str) -> bool {
        let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
        self.text.match_indices(ident).any(|(at, _)| {
            let before = self.text[..at].chars().next_back();
            let after = self.text[at + ident.len()..].chars().next();
            !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
        })
    }
}

/// Vertex and fragment sources for one shader variant.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: ShaderFile,
    pub fragment: ShaderFile,
}

impl ShaderSources {
    /// Reads the shared vertex stage and the variant's fragment stage from
    /// `dir`.
    pub fn load(dir: &Path, variant: ShaderVariant) -> Result<Self, ShaderError> {
        let vertex = ShaderFile::read(dir.join(VERTEX_FILE))?;
        let fragment = ShaderFile::read(dir.join(variant.fragment_file()))?;
        tracing::debug!(
            vertex = %vertex.path.display(),
            fragment = %fragment.path.display(),
            "loaded shader sources"
        );
        Ok(Self { vertex, fragment })
    }

    /// Fails on the first input of `variant` the fragment source never
    /// mentions.
    ///
    /// This is a textual check. The GPU compiler has the final word, but a
    /// missing member would otherwise only surface as a layout mismatch.
    pub fn check_inputs(&self, variant: ShaderVariant) -> Result<(), ShaderError> {
        for &(name, _) in variant.inputs() {
            if !self.fragment.mentions(name) {
                return Err(ShaderError::MissingInput {
                    path: self.fragment.path.clone(),
                    name,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) {
        std::fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn loads_vertex_and_variant_fragment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), VERTEX_FILE, "@vertex fn vs_main() {}");
        write(
            dir.path(),
            "raymarch_origin.frag.wgsl",
            "struct U { iResolution: vec2<f32>, iTime: f32, cameraPos: vec3<f32> }",
        );

        let sources = ShaderSources::load(dir.path(), ShaderVariant::WorldOrigin).unwrap();
        assert!(sources.vertex.text.contains("vs_main"));
        assert!(sources.check_inputs(ShaderVariant::WorldOrigin).is_ok());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), VERTEX_FILE, "");

        let err = ShaderSources::load(dir.path(), ShaderVariant::FreeFlight).unwrap_err();
        match err {
            ShaderError::Read { path, .. } => assert!(path.ends_with("raymarch.frag.wgsl")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shipped_shaders_declare_their_inputs() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../res/shaders");
        for variant in ShaderVariant::ALL {
            let sources = ShaderSources::load(&dir, variant).unwrap();
            sources.check_inputs(variant).unwrap();
            assert!(sources.fragment.text.contains("fn fs_main"));
            assert!(sources.vertex.text.contains("fn vs_main"));
        }
    }

    #[test]
    fn input_check_matches_whole_identifiers() {
        let file = ShaderFile {
            path: PathBuf::from("x.wgsl"),
            text: "let yawRate = 1.0; let pitch_bias = pitch;".into(),
        };
        assert!(!file.mentions("yaw"));
        assert!(file.mentions("pitch"));
        assert!(file.mentions("yawRate"));
    }

    #[test]
    fn undeclared_input_is_reported() {
        let sources = ShaderSources {
            vertex: ShaderFile {
                path: PathBuf::from(VERTEX_FILE),
                text: String::new(),
            },
            fragment: ShaderFile {
                path: PathBuf::from("raymarch_orbit.frag.wgsl"),
                text: "struct U { iResolution: vec2<f32>, iTime: f32, yaw: f32 }".into(),
            },
        };
        match sources.check_inputs(ShaderVariant::Orientation) {
            Err(ShaderError::MissingInput { name, .. }) => assert_eq!(name, "pitch"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
