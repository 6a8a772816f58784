// source.rs - Tagged shader file splitting

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Token that switches the active section when it appears on a line.
pub const SECTION_MARKER: &str = "#shader";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Shader source unavailable at {path:?}: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Line {line_number} appears before any #shader marker: {line:?}")]
    MalformedInput { line_number: usize, line: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    /// The GL shader object type for this stage.
    pub fn gl_kind(self) -> gl::types::GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with source lines that show up before the first marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// Drop them (logged at debug level).
    #[default]
    Discard,
    /// Fail with [`SourceError::MalformedInput`].
    Strict,
}

/// The two stage sources pulled out of one tagged shader file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderSource {
    vertex: String,
    fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Splits `text` with [`SplitPolicy::Discard`], which cannot fail.
    pub fn parse(text: &str) -> Self {
        let mut splitter = Splitter::new(SplitPolicy::Discard);
        for (index, line) in text.lines().enumerate() {
            // Discard never produces an error
            let _ = splitter.feed(index + 1, line);
        }
        splitter.finish()
    }

    pub fn parse_with(text: &str, policy: SplitPolicy) -> Result<Self, SourceError> {
        let mut splitter = Splitter::new(policy);
        for (index, line) in text.lines().enumerate() {
            splitter.feed(index + 1, line)?;
        }
        Ok(splitter.finish())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        Self::from_path_with(path, SplitPolicy::Discard)
    }

    pub fn from_path_with<P: AsRef<Path>>(
        path: P,
        policy: SplitPolicy,
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            log::error!("Failed to read shader source {:?}: {}", path, source);
            SourceError::ResourceUnavailable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let source = Self::parse_with(&text, policy)?;
        log::debug!(
            "Loaded shader source {:?} ({} vertex bytes, {} fragment bytes)",
            path,
            source.vertex.len(),
            source.fragment.len()
        );
        Ok(source)
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// Re-emits the tagged form, so `ShaderSource::parse(&src.to_string()) == src`.
impl fmt::Display for ShaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", SECTION_MARKER, ShaderStage::Vertex)?;
        f.write_str(&self.vertex)?;
        writeln!(f, "{} {}", SECTION_MARKER, ShaderStage::Fragment)?;
        f.write_str(&self.fragment)
    }
}

/// Line-at-a-time state for the split.
struct Splitter {
    policy: SplitPolicy,
    current: Option<ShaderStage>,
    vertex: String,
    fragment: String,
}

impl Splitter {
    fn new(policy: SplitPolicy) -> Self {
        Self {
            policy,
            current: None,
            vertex: String::new(),
            fragment: String::new(),
        }
    }

    fn feed(&mut self, line_number: usize, line: &str) -> Result<(), SourceError> {
        if let Some(pos) = line.find(SECTION_MARKER) {
            let rest = &line[pos + SECTION_MARKER.len()..];
            if rest.contains(ShaderStage::Vertex.as_str()) {
                self.current = Some(ShaderStage::Vertex);
            } else if rest.contains(ShaderStage::Fragment.as_str()) {
                self.current = Some(ShaderStage::Fragment);
            } else {
                log::warn!(
                    "Line {}: unrecognised shader marker {:?}, section unchanged",
                    line_number,
                    line
                );
            }
            return Ok(());
        }

        let target = match self.current {
            Some(ShaderStage::Vertex) => &mut self.vertex,
            Some(ShaderStage::Fragment) => &mut self.fragment,
            None => {
                if line.trim().is_empty() {
                    return Ok(());
                }
                return match self.policy {
                    SplitPolicy::Discard => {
                        log::debug!("Line {}: no active section, discarding {:?}", line_number, line);
                        Ok(())
                    }
                    SplitPolicy::Strict => Err(SourceError::MalformedInput {
                        line_number,
                        line: line.to_string(),
                    }),
                };
            }
        };

        target.push_str(line);
        target.push('\n');
        Ok(())
    }

    fn finish(self) -> ShaderSource {
        ShaderSource {
            vertex: self.vertex,
            fragment: self.fragment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_split_vertex_then_fragment() {
        let source = ShaderSource::parse("#shader vertex\nA\nB\n#shader fragment\nC\n");
        assert_eq!(source.vertex(), "A\nB\n");
        assert_eq!(source.fragment(), "C\n");
    }

    #[test]
    fn test_fragment_before_vertex() {
        let source = ShaderSource::parse("#shader fragment\nout vec4 c;\n#shader vertex\nin vec4 p;\n");
        assert_eq!(source.vertex(), "in vec4 p;\n");
        assert_eq!(source.fragment(), "out vec4 c;\n");
        assert_eq!(source.stage(ShaderStage::Fragment), "out vec4 c;\n");
    }

    #[test]
    fn test_unknown_marker_keeps_section() {
        let source = ShaderSource::parse("#shader vertex\nA\n#shader geometry\nB\n");
        assert_eq!(source.vertex(), "A\nB\n");
        assert!(source.fragment().is_empty());
    }

    #[test]
    fn test_marker_is_substring_match() {
        let source = ShaderSource::parse("  // #shader   vertex stage\nA\n#shader fragment\nB\n");
        assert_eq!(source.vertex(), "A\n");
        assert_eq!(source.fragment(), "B\n");
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let source = ShaderSource::parse("#shader vertex\nA\n#SHADER fragment\nB\n");
        assert_eq!(source.vertex(), "A\n#SHADER fragment\nB\n");
    }

    #[test]
    fn test_vertex_wins_when_both_named() {
        let source = ShaderSource::parse("#shader vertex fragment\nA\n");
        assert_eq!(source.vertex(), "A\n");
    }

    #[test]
    fn test_crlf_lines() {
        let source = ShaderSource::parse("#shader vertex\r\nA\r\n#shader fragment\r\nB\r\n");
        assert_eq!(source.vertex(), "A\n");
        assert_eq!(source.fragment(), "B\n");
    }

    #[test]
    fn test_no_markers_discards_everything() {
        let source = ShaderSource::parse("void main() {}\n");
        assert!(source.vertex().is_empty());
        assert!(source.fragment().is_empty());
    }

    #[test]
    fn test_no_markers_strict_fails() {
        let err = ShaderSource::parse_with("\nvoid main() {}\n", SplitPolicy::Strict).unwrap_err();
        match err {
            SourceError::MalformedInput { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "void main() {}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strict_accepts_well_formed_input() {
        let text = "#shader vertex\nA\n#shader fragment\nB\n";
        let strict = ShaderSource::parse_with(text, SplitPolicy::Strict).unwrap();
        assert_eq!(strict, ShaderSource::parse(text));
    }

    #[test]
    fn test_display_round_trip() {
        let original = ShaderSource::parse(
            "#shader vertex\n#version 330 core\nvoid main() {}\n#shader fragment\nuniform vec4 u_Color;\n",
        );
        let reparsed = ShaderSource::parse(&original.to_string());
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("basic.shader");
        let mut file = File::create(&path).unwrap();
        write!(file, "#shader vertex\nV\n#shader fragment\nF\n").unwrap();

        let source = ShaderSource::from_path(&path).unwrap();
        assert_eq!(source, ShaderSource::new("V\n", "F\n"));
    }

    #[test]
    fn test_missing_file_is_resource_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.shader");

        match ShaderSource::from_path(&path) {
            Err(SourceError::ResourceUnavailable { path: reported, .. }) => {
                assert_eq!(reported, path);
            }
            other => panic!("expected ResourceUnavailable, got {other:?}"),
        }
    }
}
