//! JSON AST snapshot front-end.
//!
//! A snapshot is a flat dump of one translation unit: cursors and types are
//! stored in two arrays and refer to each other by index. Cursor 0 is the
//! translation unit itself. [`SnapshotBuilder`] assembles snapshots in code,
//! [`SnapshotFrontend`] reads them from disk.

use crate::basic::BasicType;
use crate::error::{Result, SymbolError};
use crate::source::{Cursor, CursorKind, Frontend, SourceLocation, TypeKind, TypeRef};
use crate::symbol::Location;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Serialized form of a translation unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstSnapshot {
    pub main_file: PathBuf,
    #[serde(default)]
    pub cursors: Vec<CursorData>,
    #[serde(default)]
    pub types: Vec<TypeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorData {
    pub kind: CursorKind,
    #[serde(default)]
    pub spelling: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub mangled_name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub is_definition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_comment: Option<String>,
    /// Defining cursor; a definition without one is its own definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_parent: Option<usize>,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default)]
    pub arguments: Vec<usize>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<usize>,
    #[serde(default)]
    pub scoped_enum: bool,
}

impl CursorData {
    pub fn new(kind: CursorKind, spelling: impl Into<String>) -> Self {
        let spelling = spelling.into();
        Self {
            kind,
            display_name: spelling.clone(),
            spelling,
            mangled_name: String::new(),
            location: Location::default(),
            is_definition: false,
            brief_comment: None,
            raw_comment: None,
            definition: None,
            semantic_parent: None,
            children: Vec::new(),
            arguments: Vec::new(),
            ty: None,
            result_type: None,
            underlying_type: None,
            scoped_enum: false,
        }
    }
}

/// Type kind as written in a snapshot: a libclang spelling or a raw code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeKindRepr {
    Code(i32),
    Name(String),
}

impl TypeKindRepr {
    fn resolve(&self) -> Result<TypeKind> {
        match self {
            Self::Code(code) => Ok(TypeKind::from_raw(*code)),
            Self::Name(name) => TypeKind::from_name(name)
                .ok_or_else(|| SymbolError::snapshot(format!("unknown type kind `{name}`"))),
        }
    }
}

impl From<TypeKind> for TypeKindRepr {
    fn from(kind: TypeKind) -> Self {
        let name = match kind {
            TypeKind::Invalid => "Invalid",
            TypeKind::Unexposed => "Unexposed",
            TypeKind::Elaborated => "Elaborated",
            TypeKind::Record => "Record",
            TypeKind::Enum => "Enum",
            TypeKind::Typedef => "Typedef",
            TypeKind::Pointer => "Pointer",
            TypeKind::LValueReference => "LValueReference",
            TypeKind::RValueReference => "RValueReference",
            TypeKind::Basic(basic) => basic.name(),
            TypeKind::Unknown(code) => return Self::Code(code),
        };
        Self::Name(name.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeData {
    pub kind: TypeKindRepr,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointee: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named: Option<usize>,
    #[serde(default)]
    pub typedef_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<usize>,
    #[serde(default)]
    pub arg_types: Vec<usize>,
}

impl TypeData {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind: kind.into(),
            is_const: false,
            is_volatile: false,
            pointee: None,
            named: None,
            typedef_name: String::new(),
            declaration: None,
            result_type: None,
            arg_types: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct SnapshotInner {
    ast: AstSnapshot,
    kinds: Vec<TypeKind>,
}

/// Validated, shareable snapshot
#[derive(Debug, Clone)]
pub struct Snapshot {
    inner: Rc<SnapshotInner>,
}

impl Snapshot {
    /// Validate `ast` and wrap it for cursor access
    pub fn new(ast: AstSnapshot) -> Result<Self> {
        let kinds = validate(&ast)?;
        Ok(Self {
            inner: Rc::new(SnapshotInner { ast, kinds }),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn main_file(&self) -> &Path {
        &self.inner.ast.main_file
    }

    pub fn ast(&self) -> &AstSnapshot {
        &self.inner.ast
    }

    /// The translation-unit cursor
    pub fn root(&self) -> SnapshotCursor {
        self.cursor(0)
    }

    /// # Panics
    ///
    /// Panics if `index` is not a cursor of this snapshot.
    pub fn cursor(&self, index: usize) -> SnapshotCursor {
        assert!(
            index < self.inner.ast.cursors.len(),
            "cursor {index} out of range"
        );
        SnapshotCursor {
            snapshot: self.clone(),
            index,
        }
    }

    /// Type handle; `None` or an out-of-range index yields an invalid type
    pub fn ty(&self, index: usize) -> SnapshotType {
        self.type_at(Some(index))
    }

    fn type_at(&self, index: Option<usize>) -> SnapshotType {
        SnapshotType {
            snapshot: self.clone(),
            index: index.filter(|&i| i < self.inner.ast.types.len()),
        }
    }

    fn cursor_at(&self, index: Option<usize>) -> Option<SnapshotCursor> {
        index
            .filter(|&i| i < self.inner.ast.cursors.len())
            .map(|index| SnapshotCursor {
                snapshot: self.clone(),
                index,
            })
    }
}

fn validate(ast: &AstSnapshot) -> Result<Vec<TypeKind>> {
    match ast.cursors.first() {
        Some(root) if root.kind == CursorKind::TranslationUnit => {}
        Some(root) => {
            return Err(SymbolError::snapshot(format!(
                "cursor 0 must be a TranslationUnit, found {}",
                root.kind
            )))
        }
        None => return Err(SymbolError::snapshot("snapshot has no cursors")),
    }

    let cursor_count = ast.cursors.len();
    let type_count = ast.types.len();
    let check = |what: &str, owner: usize, index: usize, bound: usize| {
        if index < bound {
            Ok(())
        } else {
            Err(SymbolError::snapshot(format!(
                "{what} {index} referenced from {owner} is out of range"
            )))
        }
    };

    for (i, cursor) in ast.cursors.iter().enumerate() {
        for &c in cursor
            .definition
            .iter()
            .chain(&cursor.semantic_parent)
            .chain(&cursor.children)
            .chain(&cursor.arguments)
        {
            check("cursor", i, c, cursor_count)?;
        }
        for &t in cursor
            .ty
            .iter()
            .chain(&cursor.result_type)
            .chain(&cursor.underlying_type)
        {
            check("type", i, t, type_count)?;
        }
    }

    let mut kinds = Vec::with_capacity(type_count);
    for (i, ty) in ast.types.iter().enumerate() {
        for &t in ty
            .pointee
            .iter()
            .chain(&ty.named)
            .chain(&ty.result_type)
            .chain(&ty.arg_types)
        {
            check("type", i, t, type_count)?;
        }
        if let Some(c) = ty.declaration {
            check("cursor", i, c, cursor_count)?;
        }
        kinds.push(ty.kind.resolve()?);
    }

    check_acyclic("cursor", cursor_count, |i| {
        ast.cursors[i].semantic_parent.into_iter().collect()
    })?;
    check_acyclic("type", type_count, |i| {
        let ty = &ast.types[i];
        ty.pointee.into_iter().chain(ty.named).collect()
    })?;
    Ok(kinds)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Finished,
}

/// Fail if following `next` from any node can return to that node
fn check_acyclic(what: &str, count: usize, next: impl Fn(usize) -> Vec<usize>) -> Result<()> {
    let mut marks = vec![Mark::Unvisited; count];
    for start in 0..count {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::OnPath;
        let mut stack = vec![(start, next(start).into_iter())];
        loop {
            let Some((node, successors)) = stack.last_mut() else {
                break;
            };
            let node = *node;
            match successors.next() {
                Some(succ) => match marks[succ] {
                    Mark::OnPath => {
                        return Err(SymbolError::snapshot(format!(
                            "{what} {succ} is part of a reference cycle"
                        )))
                    }
                    Mark::Unvisited => {
                        marks[succ] = Mark::OnPath;
                        stack.push((succ, next(succ).into_iter()));
                    }
                    Mark::Finished => {}
                },
                None => {
                    marks[node] = Mark::Finished;
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}

/// Cursor into a [`Snapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotCursor {
    snapshot: Snapshot,
    index: usize,
}

impl SnapshotCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    fn data(&self) -> &CursorData {
        &self.snapshot.inner.ast.cursors[self.index]
    }

    fn collect(&self, indices: &[usize]) -> Vec<Self> {
        indices
            .iter()
            .filter_map(|&i| self.snapshot.cursor_at(Some(i)))
            .collect()
    }
}

impl PartialEq for SnapshotCursor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.snapshot.inner, &other.snapshot.inner) && self.index == other.index
    }
}

impl Cursor for SnapshotCursor {
    type Type = SnapshotType;

    fn kind(&self) -> CursorKind {
        self.data().kind
    }

    fn spelling(&self) -> String {
        self.data().spelling.clone()
    }

    fn display_name(&self) -> String {
        self.data().display_name.clone()
    }

    fn mangled_name(&self) -> String {
        self.data().mangled_name.clone()
    }

    fn location(&self) -> SourceLocation {
        let location = self.data().location.clone();
        let from_main_file =
            !location.is_absent() && location.file == self.snapshot.inner.ast.main_file;
        SourceLocation {
            location,
            from_main_file,
        }
    }

    fn is_definition(&self) -> bool {
        self.data().is_definition
    }

    fn brief_comment(&self) -> Option<String> {
        self.data().brief_comment.clone()
    }

    fn raw_comment(&self) -> Option<String> {
        self.data().raw_comment.clone()
    }

    fn definition(&self) -> Option<Self> {
        let data = self.data();
        let index = data
            .definition
            .or_else(|| data.is_definition.then_some(self.index));
        self.snapshot.cursor_at(index)
    }

    fn semantic_parent(&self) -> Option<Self> {
        self.snapshot.cursor_at(self.data().semantic_parent)
    }

    fn children(&self) -> Vec<Self> {
        self.collect(&self.data().children)
    }

    fn arguments(&self) -> Vec<Self> {
        self.collect(&self.data().arguments)
    }

    fn ty(&self) -> SnapshotType {
        self.snapshot.type_at(self.data().ty)
    }

    fn result_type(&self) -> SnapshotType {
        self.snapshot.type_at(self.data().result_type)
    }

    fn typedef_underlying_type(&self) -> SnapshotType {
        self.snapshot.type_at(self.data().underlying_type)
    }

    fn is_scoped_enum(&self) -> bool {
        self.data().scoped_enum
    }
}

/// Type handle into a [`Snapshot`]; a missing index is the invalid type
#[derive(Debug, Clone)]
pub struct SnapshotType {
    snapshot: Snapshot,
    index: Option<usize>,
}

impl SnapshotType {
    fn data(&self) -> Option<&TypeData> {
        self.index.map(|i| &self.snapshot.inner.ast.types[i])
    }

    fn follow(&self, pick: impl Fn(&TypeData) -> Option<usize>) -> Self {
        self.snapshot.type_at(self.data().and_then(pick))
    }
}

impl TypeRef for SnapshotType {
    type Cursor = SnapshotCursor;

    fn kind(&self) -> TypeKind {
        self.index
            .map_or(TypeKind::Invalid, |i| self.snapshot.inner.kinds[i])
    }

    fn is_const(&self) -> bool {
        self.data().is_some_and(|t| t.is_const)
    }

    fn is_volatile(&self) -> bool {
        self.data().is_some_and(|t| t.is_volatile)
    }

    fn pointee(&self) -> Self {
        self.follow(|t| t.pointee)
    }

    fn named(&self) -> Self {
        self.follow(|t| t.named)
    }

    fn typedef_name(&self) -> String {
        self.data()
            .map(|t| t.typedef_name.clone())
            .unwrap_or_default()
    }

    fn declaration(&self) -> Option<SnapshotCursor> {
        self.snapshot
            .cursor_at(self.data().and_then(|t| t.declaration))
    }

    fn result_type(&self) -> Self {
        self.follow(|t| t.result_type)
    }

    fn arg_types(&self) -> Vec<Self> {
        self.data()
            .map(|t| {
                t.arg_types
                    .iter()
                    .map(|&i| self.snapshot.type_at(Some(i)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Reads `.json` AST snapshots from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotFrontend;

impl Frontend for SnapshotFrontend {
    type Cursor = SnapshotCursor;

    fn load(&mut self, file: &Path, args: &[String]) -> Result<SnapshotCursor> {
        if !args.is_empty() {
            log::debug!(
                "Snapshot {} is pre-parsed; ignoring {} compiler argument(s)",
                file.display(),
                args.len()
            );
        }
        Ok(Snapshot::load(file)?.root())
    }
}

/// Programmatic snapshot construction.
///
/// Each declared cursor gets its own line in the main file, so repeated
/// declarations of one entity have distinct locations.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    ast: AstSnapshot,
    next_line: u32,
}

impl SnapshotBuilder {
    pub fn new(main_file: impl Into<PathBuf>) -> Self {
        let main_file = main_file.into();
        let root = CursorData::new(
            CursorKind::TranslationUnit,
            main_file.to_string_lossy().into_owned(),
        );
        Self {
            ast: AstSnapshot {
                main_file,
                cursors: vec![root],
                types: Vec::new(),
            },
            next_line: 1,
        }
    }

    pub fn root(&self) -> usize {
        0
    }

    /// Add a cursor as the last child of `parent`. Functions get a simple
    /// mangled name derived from `name`.
    pub fn declare(&mut self, parent: usize, kind: CursorKind, name: &str) -> usize {
        let mut data = CursorData::new(kind, name);
        if kind == CursorKind::FunctionDecl {
            data.mangled_name = format!("_Z{}{}v", name.len(), name);
        }
        data.semantic_parent = Some(parent);
        data.location = Location::new(
            self.ast.main_file.clone(),
            self.next_line,
            1,
            (self.next_line - 1) * 80,
        );
        self.next_line += 1;

        let index = self.ast.cursors.len();
        self.ast.cursors.push(data);
        self.ast.cursors[parent].children.push(index);
        index
    }

    pub fn cursor_mut(&mut self, index: usize) -> &mut CursorData {
        &mut self.ast.cursors[index]
    }

    /// Mark a cursor as the definition of its entity
    pub fn define(&mut self, index: usize) {
        self.ast.cursors[index].is_definition = true;
    }

    /// Point a declaration at its defining cursor
    pub fn link_definition(&mut self, declaration: usize, definition: usize) {
        self.ast.cursors[declaration].definition = Some(definition);
    }

    pub fn locate(&mut self, index: usize, location: Location) {
        self.ast.cursors[index].location = location;
    }

    pub fn comment(&mut self, index: usize, brief: &str, raw: &str) {
        let cursor = &mut self.ast.cursors[index];
        cursor.brief_comment = Some(brief.to_string());
        cursor.raw_comment = Some(raw.to_string());
    }

    pub fn set_type(&mut self, index: usize, ty: usize) {
        self.ast.cursors[index].ty = Some(ty);
    }

    pub fn set_result_type(&mut self, index: usize, ty: usize) {
        self.ast.cursors[index].result_type = Some(ty);
    }

    pub fn set_underlying_type(&mut self, index: usize, ty: usize) {
        self.ast.cursors[index].underlying_type = Some(ty);
    }

    /// Add a parameter to a function
    pub fn argument(&mut self, function: usize, name: &str, ty: usize) -> usize {
        let index = self.declare(function, CursorKind::ParmDecl, name);
        self.set_type(index, ty);
        self.ast.cursors[function].arguments.push(index);
        index
    }

    /// Add a data member to a struct or class
    pub fn field(&mut self, record: usize, name: &str, ty: usize) -> usize {
        let index = self.declare(record, CursorKind::FieldDecl, name);
        self.set_type(index, ty);
        index
    }

    fn push_type(&mut self, data: TypeData) -> usize {
        self.ast.types.push(data);
        self.ast.types.len() - 1
    }

    pub fn basic(&mut self, basic: BasicType) -> usize {
        self.push_type(TypeData::new(TypeKind::Basic(basic)))
    }

    pub fn unexposed(&mut self) -> usize {
        self.push_type(TypeData::new(TypeKind::Unexposed))
    }

    /// A type with a raw libclang kind code
    pub fn raw_type(&mut self, code: i32) -> usize {
        self.push_type(TypeData::new(TypeKind::from_raw(code)))
    }

    fn wrap(&mut self, kind: TypeKind, pointee: usize) -> usize {
        let mut data = TypeData::new(kind);
        data.pointee = Some(pointee);
        self.push_type(data)
    }

    pub fn pointer_to(&mut self, pointee: usize) -> usize {
        self.wrap(TypeKind::Pointer, pointee)
    }

    pub fn lvalue_ref(&mut self, pointee: usize) -> usize {
        self.wrap(TypeKind::LValueReference, pointee)
    }

    pub fn rvalue_ref(&mut self, pointee: usize) -> usize {
        self.wrap(TypeKind::RValueReference, pointee)
    }

    pub fn elaborated(&mut self, named: usize) -> usize {
        let mut data = TypeData::new(TypeKind::Elaborated);
        data.named = Some(named);
        self.push_type(data)
    }

    fn declared(&mut self, kind: TypeKind, declaration: usize) -> usize {
        let mut data = TypeData::new(kind);
        data.declaration = Some(declaration);
        self.push_type(data)
    }

    pub fn record_type(&mut self, declaration: usize) -> usize {
        self.declared(TypeKind::Record, declaration)
    }

    pub fn enum_type(&mut self, declaration: usize) -> usize {
        self.declared(TypeKind::Enum, declaration)
    }

    pub fn typedef_type(&mut self, declaration: usize, alias: &str) -> usize {
        let index = self.declared(TypeKind::Typedef, declaration);
        self.ast.types[index].typedef_name = alias.to_string();
        index
    }

    /// Copy of `ty` with the given qualifiers
    pub fn qualified(&mut self, ty: usize, is_const: bool, is_volatile: bool) -> usize {
        let mut data = self.ast.types[ty].clone();
        data.is_const = is_const;
        data.is_volatile = is_volatile;
        self.push_type(data)
    }

    pub fn into_ast(self) -> AstSnapshot {
        self.ast
    }

    pub fn build(self) -> Result<Snapshot> {
        Snapshot::new(self.ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "main_file": "a.cpp",
        "cursors": [
            { "kind": "TranslationUnit", "spelling": "a.cpp", "children": [1] },
            {
                "kind": "StructDecl",
                "spelling": "S",
                "location": { "file": "a.cpp", "line": 1, "column": 8, "offset": 7 },
                "is_definition": true,
                "semantic_parent": 0,
                "type": 0
            }
        ],
        "types": [
            { "kind": "Record", "declaration": 1, "is_const": true },
            { "kind": 17 }
        ]
    }"#;

    #[test]
    fn test_parse_json_snapshot() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        let root = snapshot.root();
        assert_eq!(root.kind(), CursorKind::TranslationUnit);
        assert!(root.is_root());

        let children = root.children();
        assert_eq!(children.len(), 1);
        let record = &children[0];
        assert_eq!(record.spelling(), "S");
        assert!(record.location().from_main_file);
        assert!(record.is_top_level());
        assert_eq!(record.definition(), Some(record.clone()));

        let ty = record.ty();
        assert_eq!(ty.kind(), TypeKind::Record);
        assert!(ty.is_const());
        assert_eq!(ty.declaration(), Some(record.clone()));
        assert_eq!(snapshot.ty(1).kind(), TypeKind::Basic(BasicType::Int));
    }

    #[test]
    fn test_missing_type_is_invalid() {
        let snapshot = SnapshotBuilder::new("a.cpp").build().unwrap();
        let ty = snapshot.root().ty();
        assert_eq!(ty.kind(), TypeKind::Invalid);
        assert_eq!(ty.pointee().kind(), TypeKind::Invalid);
        assert!(ty.declaration().is_none());
    }

    #[test]
    fn test_rejects_bad_root() {
        let json = r#"{ "main_file": "a.cpp", "cursors": [ { "kind": "StructDecl" } ] }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(err.to_string().contains("TranslationUnit"));

        let json = r#"{ "main_file": "a.cpp" }"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_dangling_index() {
        let json = r#"{
            "main_file": "a.cpp",
            "cursors": [ { "kind": "TranslationUnit", "children": [3] } ]
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, SymbolError::Snapshot(_)));
    }

    #[test]
    fn test_rejects_cyclic_pointee() {
        let json = r#"{
            "main_file": "a.cpp",
            "cursors": [
                { "kind": "TranslationUnit", "children": [1] },
                {
                    "kind": "FunctionDecl", "spelling": "f", "mangled_name": "_Z1fv",
                    "semantic_parent": 0, "result_type": 0
                }
            ],
            "types": [ { "kind": "Pointer", "pointee": 0 } ]
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, SymbolError::Snapshot(_)));
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_rejects_cyclic_named_types() {
        let mut builder = SnapshotBuilder::new("a.cpp");
        let int = builder.basic(BasicType::Int);
        let outer = builder.elaborated(int);
        let inner = builder.pointer_to(outer);
        let mut ast = builder.into_ast();
        ast.types[outer].named = Some(inner);

        let err = Snapshot::new(ast).unwrap_err();
        assert!(matches!(err, SymbolError::Snapshot(_)));
    }

    #[test]
    fn test_rejects_cyclic_semantic_parents() {
        let mut builder = SnapshotBuilder::new("a.cpp");
        let outer = builder.declare(builder.root(), CursorKind::Namespace, "outer");
        let inner = builder.declare(outer, CursorKind::Namespace, "inner");
        builder.cursor_mut(outer).semantic_parent = Some(inner);

        let err = builder.build().unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_shared_types_are_not_cycles() {
        let mut builder = SnapshotBuilder::new("a.cpp");
        let int = builder.basic(BasicType::Int);
        let ptr = builder.pointer_to(int);
        builder.lvalue_ref(ptr);
        builder.rvalue_ref(ptr);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_rejects_unknown_kind_name() {
        let json = r#"{
            "main_file": "a.cpp",
            "cursors": [ { "kind": "TranslationUnit" } ],
            "types": [ { "kind": "Quaternion" } ]
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(err.to_string().contains("Quaternion"));
    }

    #[test]
    fn test_unknown_code_survives_loading() {
        let mut builder = SnapshotBuilder::new("a.cpp");
        let ty = builder.raw_type(999);
        let snapshot = builder.build().unwrap();
        assert_eq!(snapshot.ty(ty).kind(), TypeKind::Unknown(999));
    }

    #[test]
    fn test_builder_round_trips_through_frontend() {
        let mut builder = SnapshotBuilder::new("a.cpp");
        let ns = builder.declare(builder.root(), CursorKind::Namespace, "N");
        builder.declare(ns, CursorKind::FunctionDecl, "run");
        let json = serde_json::to_string(&builder.into_ast()).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let root = SnapshotFrontend
            .load(file.path(), &["-std=c++20".to_string()])
            .unwrap();
        let ns = &root.children()[0];
        let run = &ns.children()[0];
        assert_eq!(run.mangled_name(), "_Z3runv");
        assert_eq!(run.semantic_parent(), Some(ns.clone()));
        assert!(!run.is_top_level());
    }
}
