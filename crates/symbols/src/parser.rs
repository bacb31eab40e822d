use crate::config::ParseConfig;
use crate::error::Result;
use crate::recorder::SymbolRecorder;
use crate::registry::SymbolRegistry;
use crate::source::{Cursor, CursorKind, Frontend};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Statistics for one parsed translation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub file: PathBuf,
    /// Declarations handed to the recorder
    pub visited: usize,
    pub new_symbols: usize,
    /// Entries added to the unresolved log
    pub unresolved: usize,
    /// Cursors outside the main file
    pub skipped: usize,
}

/// Parses translation units one after another into a shared registry
#[derive(Debug, Default)]
pub struct DocumentParser {
    config: ParseConfig,
    registry: SymbolRegistry,
}

impl DocumentParser {
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            registry: SymbolRegistry::new(),
        }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> SymbolRegistry {
        self.registry
    }

    /// Load `file` through `frontend`, then parse it
    pub fn parse_file<F: Frontend>(
        &mut self,
        frontend: &mut F,
        file: &Path,
        args: &[String],
    ) -> Result<UnitReport> {
        let root = frontend.load(file, args)?;
        let mut report = self.parse_unit(&root)?;
        report.file = file.to_path_buf();
        Ok(report)
    }

    /// Record every declaration of the unit rooted at `root`.
    ///
    /// A fatal error rolls the registry back to its state before the unit,
    /// leaving symbols of earlier units untouched.
    pub fn parse_unit<C: Cursor>(&mut self, root: &C) -> Result<UnitReport> {
        let checkpoint = self.registry.checkpoint();
        let symbols_before = self.registry.len();
        let unresolved_before = self.registry.unresolved().len();

        let mut report = UnitReport {
            file: PathBuf::from(root.spelling()),
            ..Default::default()
        };

        let outcome = {
            let mut recorder = SymbolRecorder::new(&mut self.registry, &self.config);
            visit_children(&mut recorder, &self.config, root, 0, &mut report)
        };

        if let Err(e) = outcome {
            self.registry.rollback(checkpoint);
            log::error!("Aborted unit {}: {}", report.file.display(), e);
            return Err(e);
        }

        report.new_symbols = self.registry.len() - symbols_before;
        report.unresolved = self.registry.unresolved().len() - unresolved_before;
        log::info!(
            "Parsed unit {}: {} new symbols, {} unresolved",
            report.file.display(),
            report.new_symbols,
            report.unresolved
        );
        Ok(report)
    }
}

fn visit_children<C: Cursor>(
    recorder: &mut SymbolRecorder<'_>,
    config: &ParseConfig,
    parent: &C,
    depth: usize,
    report: &mut UnitReport,
) -> Result<()> {
    for cursor in parent.children() {
        if config.main_file_only && !cursor.location().from_main_file {
            log::debug!(
                "Skipping {} `{}` outside the main file",
                cursor.kind(),
                cursor.spelling()
            );
            report.skipped += 1;
            continue;
        }

        // Data members are resolved with their record.
        if cursor.kind() == CursorKind::FieldDecl {
            continue;
        }

        if cursor.is_declaration() || cursor.is_definition() {
            report.visited += 1;
            recorder.record(&cursor)?;
        }

        if config.walk_namespaces && cursor.kind().is_scope() {
            if depth + 1 >= config.max_depth {
                log::warn!(
                    "Not descending into `{}`: nesting deeper than {}",
                    cursor.spelling(),
                    config.max_depth
                );
                continue;
            }
            visit_children(recorder, config, &cursor, depth + 1, report)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolError;
    use crate::snapshot::SnapshotBuilder;
    use crate::symbol::{Location, SymbolKind};

    #[test]
    fn test_skips_cursors_from_headers() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        builder.declare(builder.root(), CursorKind::ClassDecl, "Local");
        let included = builder.declare(builder.root(), CursorKind::ClassDecl, "Included");
        builder.locate(included, Location::new("lib.h", 10, 7, 200));
        let snapshot = builder.build().unwrap();

        let mut parser = DocumentParser::default();
        let report = parser.parse_unit(&snapshot.root()).unwrap();

        assert_eq!(report.visited, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.new_symbols, 1);
        assert_eq!(report.file, PathBuf::from("main.cpp"));

        let mut parser = DocumentParser::new(ParseConfig::headers_too());
        let report = parser.parse_unit(&snapshot.root()).unwrap();
        assert_eq!(report.new_symbols, 2);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_walks_namespace_bodies() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let ns = builder.declare(builder.root(), CursorKind::Namespace, "N");
        let inner = builder.declare(ns, CursorKind::StructDecl, "Inner");
        builder.define(inner);
        let int = builder.basic(crate::basic::BasicType::Int);
        builder.field(inner, "x", int);
        builder.declare(ns, CursorKind::VarDecl, "global");
        let snapshot = builder.build().unwrap();

        let mut parser = DocumentParser::default();
        let report = parser.parse_unit(&snapshot.root()).unwrap();
        assert_eq!(report.new_symbols, 2);
        assert_eq!(report.unresolved, 1);
        assert_eq!(report.visited, 3);

        let flat = ParseConfig {
            walk_namespaces: false,
            ..Default::default()
        };
        let mut parser = DocumentParser::new(flat);
        let report = parser.parse_unit(&snapshot.root()).unwrap();
        assert_eq!(report.new_symbols, 1);
        let sorted = parser.registry().sorted();
        assert!(matches!(parser.registry()[sorted[0].1].kind(), SymbolKind::Namespace));
    }

    #[test]
    fn test_stops_descending_at_max_depth() {
        let mut builder = SnapshotBuilder::new("main.cpp");
        let a = builder.declare(builder.root(), CursorKind::Namespace, "a");
        let b = builder.declare(a, CursorKind::Namespace, "b");
        builder.declare(b, CursorKind::Namespace, "c");
        let snapshot = builder.build().unwrap();

        let shallow = ParseConfig {
            max_depth: 2,
            ..Default::default()
        };
        let mut parser = DocumentParser::new(shallow);
        let report = parser.parse_unit(&snapshot.root()).unwrap();
        assert_eq!(report.new_symbols, 2);
        assert_eq!(report.visited, 2);

        let names: Vec<String> = parser
            .registry()
            .sorted()
            .into_iter()
            .map(|(id, _)| id.spelling())
            .collect();
        assert_eq!(names, vec!["a".to_string(), "a::b".to_string()]);

        let mut parser = DocumentParser::default();
        let report = parser.parse_unit(&snapshot.root()).unwrap();
        assert_eq!(report.new_symbols, 3);
    }

    #[test]
    fn test_failed_unit_is_rolled_back() {
        let mut good = SnapshotBuilder::new("good.cpp");
        good.declare(good.root(), CursorKind::Namespace, "kept");
        let good = good.build().unwrap();

        let mut bad = SnapshotBuilder::new("bad.cpp");
        bad.declare(bad.root(), CursorKind::Namespace, "dropped");
        let function = bad.declare(bad.root(), CursorKind::FunctionDecl, "broken");
        let weird = bad.raw_type(4242);
        bad.set_result_type(function, weird);
        let bad = bad.build().unwrap();

        let mut parser = DocumentParser::default();
        parser.parse_unit(&good.root()).unwrap();
        let err = parser.parse_unit(&bad.root()).unwrap_err();

        assert!(matches!(err, SymbolError::UnmappedTypeKind(4242)));
        assert_eq!(parser.registry().len(), 1);
        let names: Vec<String> = parser
            .registry()
            .sorted()
            .into_iter()
            .map(|(id, _)| id.spelling())
            .collect();
        assert_eq!(names, vec!["kept".to_string()]);
    }
}
