use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    core::{
        errors::{ConverterError, Result},
        utils::{ensure_dir, is_safe_key, PathResolver},
    },
    domain::{Formula, ResultHistory, SiteUser},
};

use super::{sort_results, FormulaCatalog, ResultHistoryStore, UserStore};

const DOCUMENT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const USERS_DIR: &str = "users";
const FORMULAS_DIR: &str = "formulas";
const HISTORY_DIR: &str = "history";

/// Filesystem-backed JSON persistence, one document per record.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    users_dir: PathBuf,
    formulas_dir: PathBuf,
    history_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: PathBuf) -> Result<Self> {
        let users_dir = root.join(USERS_DIR);
        let formulas_dir = root.join(FORMULAS_DIR);
        let history_dir = root.join(HISTORY_DIR);
        ensure_dir(&users_dir)?;
        ensure_dir(&formulas_dir)?;
        ensure_dir(&history_dir)?;
        Ok(Self {
            root,
            users_dir,
            formulas_dir,
            history_dir,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(PathResolver::data_dir_in(&PathResolver::base_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` when the username cannot be mapped to a file name.
    pub fn user_path(&self, username: &str) -> Option<PathBuf> {
        document_path(&self.users_dir, username)
    }

    pub fn formula_path(&self, formula_name: &str) -> Option<PathBuf> {
        document_path(&self.formulas_dir, formula_name)
    }

    pub fn result_path(&self, id: &str) -> Option<PathBuf> {
        document_path(&self.history_dir, id)
    }

    /// Adds or replaces a catalog entry.
    pub fn save_formula(&self, formula: &Formula) -> Result<()> {
        let path = require_path(self.formula_path(formula.formula_name()), "formula")?;
        write_document(&path, formula)?;
        tracing::debug!(formula = formula.formula_name(), "formula saved");
        Ok(())
    }

    /// Removes a catalog entry. Favorites holding a copy of it are untouched.
    pub fn delete_formula(&self, formula_name: &str) -> Result<bool> {
        let removed = remove_document(self.formula_path(formula_name))?;
        if removed {
            tracing::info!(formula = formula_name, "formula removed from catalog");
        }
        Ok(removed)
    }

    /// Loads a JSON array of formulas into the catalog, returning how many were written.
    pub fn import_formulas(&self, path: &Path) -> Result<usize> {
        let data = fs::read_to_string(path)?;
        let formulas: Vec<Formula> = serde_json::from_str(&data)?;
        self.seed_formulas(formulas)
    }

    pub fn seed_formulas(&self, formulas: impl IntoIterator<Item = Formula>) -> Result<usize> {
        let mut written = 0;
        for formula in formulas {
            self.save_formula(&formula)?;
            written += 1;
        }
        tracing::info!(count = written, root = %self.root.display(), "formula catalog seeded");
        Ok(written)
    }
}

impl UserStore for JsonStorage {
    fn get_user(&self, username: &str) -> Result<Option<SiteUser>> {
        match self.user_path(username) {
            Some(path) => read_document(&path),
            None => Ok(None),
        }
    }

    fn put_user(&self, user: &SiteUser) -> Result<SiteUser> {
        let path = require_path(self.user_path(user.username()), "username")?;
        write_document(&path, user)?;
        tracing::debug!(username = user.username(), "user document written");
        read_document(&path)?.ok_or_else(|| {
            ConverterError::StorageFailure(format!(
                "user `{}` missing after write",
                user.username()
            ))
        })
    }

    fn delete_user(&self, username: &str) -> Result<bool> {
        remove_document(self.user_path(username))
    }

    fn list_users(&self) -> Result<Vec<SiteUser>> {
        let mut users: Vec<SiteUser> = list_documents(&self.users_dir)?;
        users.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(users)
    }
}

impl FormulaCatalog for JsonStorage {
    fn find_formula(&self, formula_name: &str) -> Result<Option<Formula>> {
        match self.formula_path(formula_name) {
            Some(path) => read_document(&path),
            None => Ok(None),
        }
    }

    fn all_formulas(&self) -> Result<Vec<Formula>> {
        let mut formulas: Vec<Formula> = list_documents(&self.formulas_dir)?;
        formulas.sort_by(|a, b| a.formula_name().cmp(b.formula_name()));
        Ok(formulas)
    }
}

impl ResultHistoryStore for JsonStorage {
    fn all_results(&self) -> Result<Vec<ResultHistory>> {
        let mut entries: Vec<ResultHistory> = list_documents(&self.history_dir)?;
        sort_results(&mut entries);
        Ok(entries)
    }

    fn get_result(&self, id: &str) -> Result<Option<ResultHistory>> {
        match self.result_path(id) {
            Some(path) => read_document(&path),
            None => Ok(None),
        }
    }

    fn put_result(&self, entry: &ResultHistory) -> Result<ResultHistory> {
        let path = require_path(self.result_path(&entry.id), "result id")?;
        write_document(&path, entry)?;
        read_document(&path)?.ok_or_else(|| {
            ConverterError::StorageFailure(format!("result `{}` missing after write", entry.id))
        })
    }

    fn delete_result(&self, id: &str) -> Result<bool> {
        remove_document(self.result_path(id))
    }
}

fn document_path(dir: &Path, key: &str) -> Option<PathBuf> {
    is_safe_key(key).then(|| dir.join(format!("{}.{}", key, DOCUMENT_EXTENSION)))
}

fn require_path(path: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    path.ok_or_else(|| {
        ConverterError::StorageFailure(format!("{what} cannot be used as a record key"))
    })
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn list_documents<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(DOCUMENT_EXTENSION)
        {
            continue;
        }
        match read_document(&path) {
            Ok(Some(document)) => documents.push(document),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable document");
            }
        }
    }
    Ok(documents)
}

fn remove_document(path: Option<PathBuf>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    match fs::remove_file(&path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Stages the document next to its target and renames it into place, so a
/// failed write leaves the previous version intact.
fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_file(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_keeps_original_extension() {
        let path = Path::new("/data/users/testUsername.json");
        assert_eq!(
            tmp_path(path),
            PathBuf::from("/data/users/testUsername.json.tmp")
        );
    }

    #[test]
    fn unsafe_keys_have_no_document_path() {
        let dir = Path::new("/data/users");
        assert!(document_path(dir, "../../etc/passwd").is_none());
        assert_eq!(
            document_path(dir, "testUsername"),
            Some(dir.join("testUsername.json"))
        );
    }
}
