//! Generated output files and the cross-file import resolver.
//!
//! Every emitter produces [`OutputFile`]s whose `location` is a module path
//! relative to the output root, without extension (`types/User`). Named
//! types are bound to the file that declares them; [`FileRegistry::record_import`]
//! then computes the relative module path between two files and merges the
//! import into the importing file.

// Internal imports (std, crate)
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::model::Type;
use crate::registry::NamedTypeRegistry;
use crate::{Error, Result};

/// One `import ... from '<module_path>'` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub module_path: String,
    pub default_import: Option<String>,
    pub named_imports: BTreeSet<String>,
}

impl ImportRecord {
    fn new(module_path: &str) -> Self {
        Self {
            module_path: module_path.to_string(),
            default_import: None,
            named_imports: BTreeSet::new(),
        }
    }
}

impl fmt::Display for ImportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import ")?;
        if let Some(default) = &self.default_import {
            write!(f, "{default}")?;
        }
        if !self.named_imports.is_empty() {
            if self.default_import.is_some() {
                write!(f, ", ")?;
            }
            let names: Vec<&str> = self.named_imports.iter().map(String::as_str).collect();
            write!(f, "{{ {} }}", names.join(", "))?;
        }
        write!(f, " from '{}';", self.module_path)
    }
}

/// How a referenced named type is brought into scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStyle {
    /// `import User from './User'`
    Default,
    /// `import { UserModel } from './User'`, the type name plus `suffix`
    Named { suffix: &'static str },
}

/// A generated file, kept in memory until the whole run succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Module path relative to the output root, without extension
    pub location: String,
    /// Imports in first-recorded order
    pub imports: Vec<ImportRecord>,
    pub body: String,
}

impl OutputFile {
    pub fn new(location: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            imports: Vec::new(),
            body: body.into(),
        }
    }

    /// Relative path of the file on disk
    pub fn path(&self) -> String {
        format!("{}.ts", self.location)
    }

    /// Sets the default import from `module_path`.
    ///
    /// Fails when a different default import from the same module is already present.
    pub fn import_default(&mut self, module_path: &str, symbol: &str) -> Result<()> {
        let location = self.location.clone();
        let record = self.record_mut(module_path);
        if let Some(existing) = &record.default_import {
            if existing != symbol {
                return Err(Error::ImportConflict {
                    file: location,
                    module_path: module_path.to_string(),
                    existing: existing.clone(),
                    requested: symbol.to_string(),
                });
            }
            return Ok(());
        }
        record.default_import = Some(symbol.to_string());
        Ok(())
    }

    /// Adds a named import from `module_path`
    pub fn import_named(&mut self, module_path: &str, symbol: &str) {
        self.record_mut(module_path)
            .named_imports
            .insert(symbol.to_string());
    }

    fn record_mut(&mut self, module_path: &str) -> &mut ImportRecord {
        let index = match self
            .imports
            .iter()
            .position(|record| record.module_path == module_path)
        {
            Some(index) => index,
            None => {
                self.imports.push(ImportRecord::new(module_path));
                self.imports.len() - 1
            }
        };
        &mut self.imports[index]
    }

    /// Import lines, a blank line when there are imports, then the body
    pub fn render(&self) -> String {
        let mut content = String::new();
        for record in &self.imports {
            content.push_str(&record.to_string());
            content.push('\n');
        }
        if !self.imports.is_empty() {
            content.push('\n');
        }
        content.push_str(&self.body);
        content
    }
}

/// Index of a file inside a [`FileRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

/// All files of a run plus the named type to declaring file mapping
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Vec<OutputFile>,
    by_type: HashMap<String, FileId>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: OutputFile) -> FileId {
        self.files.push(file);
        FileId(self.files.len() - 1)
    }

    /// Declares that `file` exports the named type `type_name`
    pub fn bind(&mut self, type_name: &str, file: FileId) {
        self.by_type.insert(type_name.to_string(), file);
    }

    pub fn file_for(&self, type_name: &str) -> Option<FileId> {
        self.by_type.get(type_name).copied()
    }

    pub fn get(&self, id: FileId) -> &OutputFile {
        &self.files[id.0]
    }

    pub fn get_mut(&mut self, id: FileId) -> &mut OutputFile {
        &mut self.files[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<OutputFile> {
        self.files
    }

    /// Imports every named type `ty` refers to into `from`.
    ///
    /// Self-imports are skipped; recording the same import twice is a no-op.
    pub fn record_import(
        &mut self,
        from: FileId,
        ty: &Type,
        registry: &NamedTypeRegistry,
        style: ImportStyle,
    ) -> Result<()> {
        let mut names = Vec::new();
        ty.for_each_named(&mut |id| names.push(registry.name(id)));
        for name in names {
            self.import_named_type(from, name, style)?;
        }
        Ok(())
    }

    fn import_named_type(&mut self, from: FileId, type_name: &str, style: ImportStyle) -> Result<()> {
        let target = self
            .file_for(type_name)
            .ok_or_else(|| Error::MissingOutputFile(type_name.to_string()))?;
        if target == from {
            return Ok(());
        }

        let module_path = relative_module_path(&self.get(from).location, &self.get(target).location);
        let file = self.get_mut(from);
        match style {
            ImportStyle::Default => file.import_default(&module_path, type_name),
            ImportStyle::Named { suffix } => {
                file.import_named(&module_path, &format!("{type_name}{suffix}"));
                Ok(())
            }
        }
    }
}

/// Module path from the directory of `from` to `to`, both relative to the
/// same root. Paths without a directory separator get a `./` prefix.
pub fn relative_module_path(from: &str, to: &str) -> String {
    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_dir
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend(&to_parts[common..]);
    let path = parts.join("/");

    if path.contains('/') {
        path
    } else {
        format!("./{path}")
    }
}
