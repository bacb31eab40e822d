use crate::error::{Result, SymbolError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for walking a translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Only record top-level cursors located in the main file
    pub main_file_only: bool,

    /// Also visit declarations nested in namespace, struct and class bodies
    pub walk_namespaces: bool,

    /// Resolve data members of structs and classes
    pub record_members: bool,

    /// Deepest scope nesting visited when walking bodies
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            main_file_only: true,
            walk_namespaces: true,
            record_members: true,
            max_depth: 64,
        }
    }
}

impl ParseConfig {
    /// Record declarations coming from included headers as well
    pub fn headers_too() -> Self {
        Self {
            main_file_only: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".to_string());
        }
        Ok(())
    }
}

/// Compiler options for one input file or the whole project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Language standard, e.g. `c++20`
    pub standard: String,
    pub include_dirs: BTreeSet<String>,
    /// Macro name -> value; an empty value defines the bare name
    pub defines: BTreeMap<String, String>,
    pub undefines: BTreeSet<String>,
    pub additional_flags: Vec<String>,
}

impl CompileOptions {
    /// Front-end arguments: `-std=`, `-I`, `-D`, `-U`, then extra flags
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if !self.standard.is_empty() {
            args.push(format!("-std={}", self.standard));
        }
        args.extend(self.include_dirs.iter().map(|dir| format!("-I{dir}")));
        args.extend(self.defines.iter().map(|(name, value)| {
            if value.is_empty() {
                format!("-D{name}")
            } else {
                format!("-D{name}={value}")
            }
        }));
        args.extend(self.undefines.iter().map(|name| format!("-U{name}")));
        args.extend(self.additional_flags.iter().cloned());
        args
    }

    /// Layer `other` (per-file options) over `self` (project options)
    pub fn merged_with(&self, other: &CompileOptions) -> CompileOptions {
        let mut merged = self.clone();
        if !other.standard.is_empty() {
            merged.standard = other.standard.clone();
        }
        merged.include_dirs.extend(other.include_dirs.iter().cloned());
        merged
            .defines
            .extend(other.defines.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.undefines.extend(other.undefines.iter().cloned());
        merged
            .additional_flags
            .extend(other.additional_flags.iter().cloned());
        merged
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One source file of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub path: PathBuf,
    #[serde(default)]
    pub options: CompileOptions,
}

/// Project description loaded from a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,

    #[serde(default)]
    pub version: Vec<String>,

    /// Base directory for relative input paths
    #[serde(default)]
    pub root_dir: PathBuf,

    #[serde(default)]
    pub inputs: Vec<InputFile>,

    /// Options applied to every input
    #[serde(default)]
    pub options: CompileOptions,

    #[serde(default)]
    pub parse: ParseConfig,
}

impl ProjectConfig {
    /// Parse a project file; a relative `root_dir` is taken relative to the
    /// file's own directory
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut config: ProjectConfig = toml::from_str(&text)?;
        if config.root_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.root_dir = base.join(&config.root_dir);
        }
        config.validate().map_err(SymbolError::invalid_config)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("project name must not be empty".to_string());
        }
        if self
            .inputs
            .iter()
            .any(|input| input.path.as_os_str().is_empty())
        {
            return Err(format!("input with empty path in project `{}`", self.name));
        }
        self.parse.validate()
    }

    /// Project-wide arguments followed by the input's own
    pub fn input_args(&self, input: &InputFile) -> Vec<String> {
        let mut args = self.options.args();
        args.extend(input.options.args());
        args
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    pub fn version_string(&self) -> String {
        self.version.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config_defaults() {
        let config = ParseConfig::default();
        assert!(config.main_file_only);
        assert!(config.walk_namespaces);
        assert!(config.record_members);
        assert!(config.validate().is_ok());
        assert!(!ParseConfig::headers_too().main_file_only);

        let shallow = ParseConfig {
            max_depth: 0,
            ..Default::default()
        };
        assert!(shallow.validate().is_err());
    }

    #[test]
    fn test_compile_args_order() {
        let mut options = CompileOptions {
            standard: "c++20".to_string(),
            ..Default::default()
        };
        options.include_dirs.insert("include".to_string());
        options.defines.insert("DEBUG".to_string(), String::new());
        options.defines.insert("LEVEL".to_string(), "3".to_string());
        options.undefines.insert("NDEBUG".to_string());
        options.additional_flags.push("-Wall".to_string());

        assert_eq!(
            options.args(),
            vec!["-std=c++20", "-Iinclude", "-DDEBUG", "-DLEVEL=3", "-UNDEBUG", "-Wall"]
        );
    }

    #[test]
    fn test_merged_options_prefer_file_standard() {
        let project = CompileOptions {
            standard: "c++17".to_string(),
            defines: BTreeMap::from([("A".to_string(), "1".to_string())]),
            ..Default::default()
        };
        let file = CompileOptions {
            standard: "c++20".to_string(),
            defines: BTreeMap::from([("A".to_string(), "2".to_string())]),
            ..Default::default()
        };
        let merged = project.merged_with(&file);
        assert_eq!(merged.standard, "c++20");
        assert_eq!(merged.defines["A"], "2");
        assert!(CompileOptions::default().is_empty());
    }

    #[test]
    fn test_load_project_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cxxdoc.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
name = "demo"
version = ["1", "2"]
root_dir = "src"

[options]
standard = "c++20"

[[inputs]]
path = "a.json"

[[inputs]]
path = "b.json"
options = {{ defines = {{ FOO = "" }} }}

[parse]
main_file_only = false
"#
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.name, "demo");
        assert_eq!(config.version_string(), "1.2");
        assert_eq!(config.root_dir, dir.path().join("src"));
        assert_eq!(config.inputs.len(), 2);
        assert!(!config.parse.main_file_only);
        assert!(config.parse.walk_namespaces);
        assert_eq!(
            config.resolve_path(&config.inputs[0].path),
            dir.path().join("src").join("a.json")
        );
        assert_eq!(
            config.input_args(&config.inputs[1]),
            vec!["-std=c++20".to_string(), "-DFOO".to_string()]
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cxxdoc.toml");
        fs::write(&path, "name = \"  \"\n").unwrap();

        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(matches!(err, SymbolError::InvalidConfig(_)));
    }
}
