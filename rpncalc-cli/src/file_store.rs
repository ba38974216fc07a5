// File-backed Store - JSON documents under the user's data directory
//
// Layout:
//   <dir>/stacks/<name>.<1|2>.json   {"elements": n, "values": ["1.5", ...]}
//   <dir>/memory.json                {"slots": [null, "42", ...]}
//   <dir>/functions.json             {"double": ["2", "*"], ...}
// Import and export files are plain text, one value per line.

use rpncalc_core::store::{self, StackSlot, Store};
use rpncalc_core::value::{CalcError, Decimal, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct StackDocument {
    elements: usize,
    values: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MemoryDocument {
    slots: Vec<Option<String>>,
}

type FunctionDocument = BTreeMap<String, Vec<String>>;

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(dir.join("stacks"))?;
        debug!("using data directory {}", dir.display());
        Ok(FileStore { dir })
    }

    /// `<data dir>/rpncalc`, if the platform has a data directory.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("rpncalc"))
    }

    fn stack_path(&self, name: &str, slot: StackSlot) -> Result<PathBuf> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(CalcError::store(format!("'{}' is not a valid stack name", name)));
        }
        Ok(self
            .dir
            .join("stacks")
            .join(format!("{}.{}.json", name, slot.number())))
    }

    fn memory_path(&self) -> PathBuf {
        self.dir.join("memory.json")
    }

    fn functions_path(&self) -> PathBuf {
        self.dir.join("functions.json")
    }

    fn load_functions(&self) -> Result<FunctionDocument> {
        Ok(read_json(&self.functions_path())?.unwrap_or_default())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .map_err(|e| CalcError::store(format!("cannot read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| CalcError::store(format!("cannot parse '{}': {}", path.display(), e)))
}

fn write_json<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(document)
        .map_err(|e| CalcError::store(format!("cannot encode '{}': {}", path.display(), e)))?;
    fs::write(path, text)
        .map_err(|e| CalcError::store(format!("cannot write '{}': {}", path.display(), e)))
}

fn parse_value(text: &str, path: &Path) -> Result<Decimal> {
    Decimal::from_str(text).map_err(|_| {
        CalcError::store(format!("'{}' in '{}' is not a number", text, path.display()))
    })
}

impl Store for FileStore {
    fn load_stack(&mut self, name: &str, slot: StackSlot) -> Result<Vec<Decimal>> {
        let path = self.stack_path(name, slot)?;
        let Some(document) = read_json::<StackDocument>(&path)? else {
            return Ok(Vec::new());
        };
        if document.elements != document.values.len() {
            tracing::warn!(
                "'{}' claims {} elements but holds {}",
                path.display(),
                document.elements,
                document.values.len()
            );
        }
        document
            .values
            .iter()
            .map(|text| parse_value(text, &path))
            .collect()
    }

    fn save_stack(&mut self, name: &str, slot: StackSlot, values: &[Decimal]) -> Result<()> {
        let path = self.stack_path(name, slot)?;
        let document = StackDocument {
            elements: values.len(),
            values: values.iter().map(Decimal::to_plain_string).collect(),
        };
        write_json(&path, &document)
    }

    fn list_stacks(&self) -> Result<Vec<String>> {
        let dir = self.dir.join("stacks");
        let entries = fs::read_dir(&dir)
            .map_err(|e| CalcError::store(format!("cannot list '{}': {}", dir.display(), e)))?;
        let names: BTreeSet<String> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().into_owned();
                let stem = file_name.strip_suffix(".json")?;
                let (name, _slot) = stem.rsplit_once('.')?;
                Some(name.to_string())
            })
            .collect();
        Ok(names.into_iter().collect())
    }

    fn load_memory(&mut self, slots: usize) -> Result<Vec<Option<Decimal>>> {
        let path = self.memory_path();
        let document: MemoryDocument = read_json(&path)?.unwrap_or_default();
        let values = document
            .slots
            .iter()
            .map(|slot| slot.as_deref().map(|text| parse_value(text, &path)).transpose())
            .collect::<Result<Vec<_>>>()?;
        Ok(store::resize_memory(values, slots))
    }

    fn save_memory(&mut self, slots: &[Option<Decimal>]) -> Result<()> {
        let document = MemoryDocument {
            slots: slots
                .iter()
                .map(|slot| slot.as_ref().map(Decimal::to_plain_string))
                .collect(),
        };
        write_json(&self.memory_path(), &document)
    }

    fn load_function(&self, name: &str) -> Result<Option<Vec<String>>> {
        Ok(self.load_functions()?.remove(name))
    }

    fn save_function(&mut self, name: &str, steps: &[String]) -> Result<()> {
        let mut functions = self.load_functions()?;
        functions.insert(name.to_string(), steps.to_vec());
        write_json(&self.functions_path(), &functions)
    }

    fn delete_function(&mut self, name: &str) -> Result<bool> {
        let mut functions = self.load_functions()?;
        if functions.remove(name).is_none() {
            return Ok(false);
        }
        write_json(&self.functions_path(), &functions)?;
        Ok(true)
    }

    fn list_functions(&self) -> Result<Vec<String>> {
        Ok(self.load_functions()?.into_keys().collect())
    }

    fn import_stack(&self, path: &str) -> Result<Vec<Decimal>> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::store(format!("cannot read '{}': {}", path, e)))?;
        store::parse_stack_file(&text)
    }

    fn export_stack(&mut self, path: &str, values: &[Decimal]) -> Result<()> {
        fs::write(path, store::format_stack_file(values))
            .map_err(|e| CalcError::store(format!("cannot write '{}': {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn open_temp() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_stack_round_trip() {
        let (_dir, mut store) = open_temp();
        let values = vec![dec("1.50"), dec("-2"), dec("123456789.000001")];
        store.save_stack("default", StackSlot::Primary, &values).unwrap();
        store.save_stack("default", StackSlot::Secondary, &[]).unwrap();
        store.save_stack("taxes", StackSlot::Primary, &values[..1]).unwrap();

        assert_eq!(store.load_stack("default", StackSlot::Primary).unwrap(), values);
        assert!(store.load_stack("default", StackSlot::Secondary).unwrap().is_empty());
        assert!(store.load_stack("missing", StackSlot::Primary).unwrap().is_empty());
        assert_eq!(store.list_stacks().unwrap(), vec!["default", "taxes"]);
    }

    #[test]
    fn test_stack_document_format() {
        let (dir, mut store) = open_temp();
        store
            .save_stack("default", StackSlot::Primary, &[dec("1.5"), dec("2")])
            .unwrap();
        let text = fs::read_to_string(dir.path().join("stacks/default.1.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["elements"], 2);
        assert_eq!(json["values"][0], "1.5");
    }

    #[test]
    fn test_bad_names_and_corrupt_files() {
        let (dir, mut store) = open_temp();
        assert!(store.load_stack("../etc", StackSlot::Primary).is_err());
        fs::write(dir.path().join("stacks/broken.1.json"), "{ not json").unwrap();
        assert!(matches!(
            store.load_stack("broken", StackSlot::Primary),
            Err(CalcError::BackingStoreFailure(_))
        ));
    }

    #[test]
    fn test_memory_round_trip() {
        let (_dir, mut store) = open_temp();
        assert_eq!(store.load_memory(3).unwrap(), vec![None, None, None]);
        store.save_memory(&[Some(dec("42")), None, Some(dec("-0.5"))]).unwrap();
        assert_eq!(
            store.load_memory(2).unwrap(),
            vec![Some(dec("42")), None]
        );
    }

    #[test]
    fn test_functions() {
        let (_dir, mut store) = open_temp();
        let steps = vec!["2".to_string(), "*".to_string()];
        store.save_function("double", &steps).unwrap();
        store.save_function("half", &["2/".to_string()]).unwrap();
        assert_eq!(store.load_function("double").unwrap(), Some(steps));
        assert_eq!(store.list_functions().unwrap(), vec!["double", "half"]);
        assert!(store.delete_function("double").unwrap());
        assert!(!store.delete_function("double").unwrap());
        assert_eq!(store.load_function("double").unwrap(), None);
    }

    #[test]
    fn test_import_and_export() {
        let (dir, mut store) = open_temp();
        let path = dir.path().join("prices.txt");
        let path = path.to_str().unwrap();
        store.export_stack(path, &[dec("1.5"), dec("1000")]).unwrap();
        assert_eq!(store.import_stack(path).unwrap(), vec![dec("1.5"), dec("1000")]);
        assert!(store.import_stack("/nonexistent/rpncalc/file.txt").is_err());
    }
}
