//! Collection file store.
//!
//! Owns one physical file per collection under the stored-info directory
//! and exposes the wholesale read/rewrite operations the CRUD layer is
//! built on. There are no partial updates: every mutation reads the whole
//! file and rewrites it, matching the single-user, single-process model.

use crate::error::{BankError, BankResult};
use crate::layout::StorageRoot;
use crate::schema::{CollectionKind, CollectionSpec, SchemaRegistry};
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// File-backed store for all registered collections.
///
/// # Example
///
/// ```rust,ignore
/// let store = CollectionStore::new(StorageRoot::new("bank"), SchemaRegistry::new());
/// store.create_empty("skills")?;
/// store.append("skills", &["Rust".into(), "7".into()])?;
/// ```
#[derive(Debug, Clone)]
pub struct CollectionStore {
    root: StorageRoot,
    registry: SchemaRegistry,
}

impl CollectionStore {
    /// Creates a store over the given root and registry.
    #[must_use]
    pub fn new(root: StorageRoot, registry: SchemaRegistry) -> Self {
        Self { root, registry }
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &StorageRoot {
        &self.root
    }

    /// Returns the schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Returns the backing file path for a collection name.
    pub fn path_for(&self, name: &str) -> BankResult<PathBuf> {
        let spec = self.registry.spec_for(name)?;
        Ok(self.root.collection_path(spec))
    }

    fn tabular_spec(&self, name: &str) -> BankResult<&'static CollectionSpec> {
        let spec = self.registry.spec_for(name)?;
        if spec.kind != CollectionKind::Tabular {
            return Err(BankError::invalid_operation(format!(
                "collection '{name}' is not tabular"
            )));
        }
        Ok(spec)
    }

    fn structured_spec(&self, name: &str) -> BankResult<&'static CollectionSpec> {
        let spec = self.registry.spec_for(name)?;
        if spec.kind != CollectionKind::Structured {
            return Err(BankError::invalid_operation(format!(
                "collection '{name}' is not structured"
            )));
        }
        Ok(spec)
    }

    fn check_arity(&self, spec: &CollectionSpec, row: &[String]) -> BankResult<()> {
        if row.len() != spec.fields.len() {
            return Err(BankError::field_count_mismatch(
                spec.name,
                spec.fields.len(),
                row.len(),
            ));
        }
        Ok(())
    }

    /// Creates a collection file containing only its registered schema.
    ///
    /// Tabular collections get a header-only CSV; structured collections
    /// get an object with every registered key mapped to an empty string.
    /// An existing file is overwritten.
    pub fn create_empty(&self, name: &str) -> BankResult<()> {
        let spec = self.registry.spec_for(name)?;
        let path = self.root.collection_path(spec);

        match spec.kind {
            CollectionKind::Tabular => {
                let mut writer = csv::Writer::from_path(&path)?;
                writer.write_record(spec.fields)?;
                writer.flush()?;
            }
            CollectionKind::Structured => {
                let mut object = Map::new();
                for field in spec.fields {
                    object.insert((*field).to_string(), Value::String(String::new()));
                }
                let file = fs::File::create(&path)?;
                serde_json::to_writer_pretty(file, &Value::Object(object))?;
            }
        }
        Ok(())
    }

    /// Reads only the declared layout of a collection file.
    ///
    /// Tabular: the first CSV row (empty if the file has no rows).
    /// Structured: the top-level keys in document order.
    pub fn read_layout(&self, name: &str) -> BankResult<Vec<String>> {
        let spec = self.registry.spec_for(name)?;
        let path = self.root.collection_path(spec);

        match spec.kind {
            CollectionKind::Tabular => {
                let mut reader = csv::ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .from_path(&path)?;
                match reader.records().next() {
                    Some(record) => Ok(record?.iter().map(str::to_string).collect()),
                    None => Ok(Vec::new()),
                }
            }
            CollectionKind::Structured => {
                let object = self.read_object(name)?;
                Ok(object.keys().cloned().collect())
            }
        }
    }

    /// Reads all records of a tabular collection (header excluded).
    pub fn read_all(&self, name: &str) -> BankResult<Vec<Vec<String>>> {
        let spec = self.tabular_spec(name)?;
        let path = self.root.collection_path(spec);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if index == 0 {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    /// Rewrites a tabular collection wholesale: header plus `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::FieldCountMismatch`] if any row's arity does
    /// not match the schema; nothing is written in that case.
    pub fn replace_all(&self, name: &str, rows: &[Vec<String>]) -> BankResult<()> {
        let spec = self.tabular_spec(name)?;
        for row in rows {
            self.check_arity(spec, row)?;
        }

        let path = self.root.collection_path(spec);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(spec.fields)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Appends one arity-checked record to a tabular collection.
    ///
    /// The file must already exist (the integrity pass creates it).
    pub fn append(&self, name: &str, row: &[String]) -> BankResult<()> {
        let spec = self.tabular_spec(name)?;
        self.check_arity(spec, row)?;

        let path = self.root.collection_path(spec);
        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a structured collection as its key→value object.
    ///
    /// Keys keep document order, which the integrity comparison relies on.
    pub fn read_object(&self, name: &str) -> BankResult<Map<String, Value>> {
        let spec = self.structured_spec(name)?;
        let path = self.root.collection_path(spec);

        let data = fs::read_to_string(&path)?;
        let object: Map<String, Value> = serde_json::from_str(&data)?;
        Ok(object)
    }

    /// Rewrites a structured collection wholesale from `object`.
    pub fn write_object(&self, name: &str, object: &Map<String, Value>) -> BankResult<()> {
        let spec = self.structured_spec(name)?;
        let path = self.root.collection_path(spec);

        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &Value::Object(object.clone()))?;
        Ok(())
    }
}
