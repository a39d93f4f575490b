use crate::types::{Task, TodoError};
use crate::utils::{get_todo_dir, validate_list_name, validate_task_name};
use chrono::Utc;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub const LIST_EXTENSION: &str = "db";

const TASK_SCHEMA: &str = "CREATE TABLE tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL
)";

/// Every list is its own sqlite file inside one managed directory.
///
/// Operations open the file they need and close it before returning; no
/// connection outlives a call. Existence checks followed by writes are not
/// guarded against other processes touching the same directory.
pub struct ListStore {
    dir: PathBuf,
}

impl ListStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ListStore { dir: dir.into() }
    }

    pub fn from_env() -> Result<Self, TodoError> {
        Ok(ListStore::new(get_todo_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn list_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{LIST_EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.list_path(name).is_file()
    }

    pub fn create_list(&self, name: &str) -> Result<(), TodoError> {
        validate_list_name(name)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.list_path(name);

        // create_new claims the path, so a list that appeared since the
        // caller's existence check is reported instead of clobbered.
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(TodoError::AlreadyExists(format!(
                    "list '{name}' already exists"
                )));
            }
            Err(e) => return Err(TodoError::Io(e)),
        }

        if let Err(e) = init_schema(&path) {
            return Err(discard_partial_list(&path, e));
        }
        Ok(())
    }

    pub fn list_all(&self) -> Result<Vec<String>, TodoError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TodoError::Io(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(LIST_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn delete_list(&self, name: &str) -> Result<(), TodoError> {
        validate_list_name(name)?;
        if !self.exists(name) {
            return Err(TodoError::NotFound(format!(
                "{name} todo list doesn't exist"
            )));
        }

        match fs::remove_file(self.list_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(TodoError::NotFound(format!(
                "{name} todo list doesn't exist"
            ))),
            Err(e) => Err(TodoError::Io(e)),
        }
    }

    pub fn rename_list(&self, old_name: &str, new_name: &str) -> Result<bool, TodoError> {
        validate_list_name(old_name)?;
        validate_list_name(new_name)?;

        if !self.exists(old_name) {
            return Err(TodoError::NotFound(format!(
                "{old_name} todo list doesn't exist"
            )));
        }
        if self.list_path(new_name).exists() {
            return Err(TodoError::AlreadyExists(format!(
                "list '{new_name}' already exists"
            )));
        }

        fs::rename(self.list_path(old_name), self.list_path(new_name))?;
        Ok(true)
    }

    /// Returns the id given to the new task.
    pub fn add_task(
        &self,
        list: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<i64, TodoError> {
        validate_list_name(list)?;
        validate_task_name(name)?;

        let conn = self.open_existing(list, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        conn.execute(
            "INSERT INTO tasks (name, description, created_at) VALUES (?1, ?2, ?3)",
            params![name, description, created_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn tasks(&self, list: &str) -> Result<Vec<Task>, TodoError> {
        validate_list_name(list)?;

        let conn = self.open_existing(list, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut statement =
            conn.prepare("SELECT id, name, description, created_at FROM tasks ORDER BY id")?;

        let rows = statement.query_map([], |row| {
            Ok(Task {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut task_list = Vec::new();
        for row in rows {
            task_list.push(row?);
        }
        Ok(task_list)
    }

    /// Opens without SQLITE_OPEN_CREATE so a missing list is never created
    /// as a side effect.
    fn open_existing(&self, list: &str, flags: OpenFlags) -> Result<Connection, TodoError> {
        if !self.exists(list) {
            return Err(TodoError::NotFound("no list found".to_string()));
        }

        let conn = Connection::open_with_flags(
            self.list_path(list),
            flags | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let has_tasks: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_tasks.is_none() {
            return Err(TodoError::Validation(format!(
                "'{list}' is not a todo list database"
            )));
        }

        Ok(conn)
    }
}

fn init_schema(path: &Path) -> Result<(), TodoError> {
    let conn = Connection::open(path)?;
    conn.execute(TASK_SCHEMA, [])?;
    Ok(())
}

/// Removes a half-initialized list file. A file that cannot be removed is
/// reported together with the error that left it behind.
fn discard_partial_list(path: &Path, cause: TodoError) -> TodoError {
    match fs::remove_file(path) {
        Ok(()) => cause,
        Err(e) if e.kind() == io::ErrorKind::NotFound => cause,
        Err(e) => TodoError::Io(io::Error::new(
            e.kind(),
            format!(
                "{}; leftover {} could not be removed: {e}",
                cause.detail(),
                path.display()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ListStore) {
        let tmp = TempDir::new().unwrap();
        let store = ListStore::new(tmp.path().join(".todo"));
        (tmp, store)
    }

    #[test]
    fn create_list_makes_directory_and_schema() {
        let (_tmp, store) = store();
        assert!(!store.dir().exists());

        store.create_list("groceries").unwrap();

        assert!(store.list_path("groceries").is_file());
        assert!(store.tasks("groceries").unwrap().is_empty());
    }

    #[test]
    fn create_list_refuses_existing_file() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();
        store.add_task("groceries", "buy milk", None).unwrap();

        let err = store.create_list("groceries").unwrap_err();

        assert!(matches!(err, TodoError::AlreadyExists(_)));
        assert_eq!(store.tasks("groceries").unwrap().len(), 1);
    }

    #[test]
    fn create_list_rejects_unsafe_names() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.create_list("../escape"),
            Err(TodoError::Validation(_))
        ));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn list_all_is_empty_without_directory() {
        let (_tmp, store) = store();
        assert_eq!(store.list_all().unwrap(), Vec::<String>::new());
        assert!(!store.dir().exists());
    }

    #[test]
    fn list_all_sorts_and_skips_foreign_files() {
        let (_tmp, store) = store();
        store.create_list("work").unwrap();
        store.create_list("groceries").unwrap();
        fs::write(store.dir().join("todo.log"), "log line\n").unwrap();
        fs::create_dir(store.dir().join("nested.db")).unwrap();

        assert_eq!(store.list_all().unwrap(), vec!["groceries", "work"]);
    }

    #[test]
    fn created_list_is_listed_exactly_once() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();

        let names = store.list_all().unwrap();
        assert_eq!(names.iter().filter(|n| *n == "groceries").count(), 1);
    }

    #[test]
    fn delete_list_removes_file() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();

        store.delete_list("groceries").unwrap();

        assert!(!store.exists("groceries"));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_list_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.delete_list("ghost"),
            Err(TodoError::NotFound(_))
        ));
    }

    #[test]
    fn rename_preserves_tasks() {
        let (_tmp, store) = store();
        store.create_list("a").unwrap();
        store.add_task("a", "T1", Some("first")).unwrap();
        store.add_task("a", "T2", None).unwrap();
        let before = store.tasks("a").unwrap();

        assert!(store.rename_list("a", "c").unwrap());

        assert_eq!(store.tasks("c").unwrap(), before);
        assert_eq!(store.list_all().unwrap(), vec!["c"]);
    }

    #[test]
    fn rename_onto_existing_list_fails_and_keeps_both() {
        let (_tmp, store) = store();
        store.create_list("a").unwrap();
        store.create_list("b").unwrap();
        store.add_task("a", "from a", None).unwrap();
        store.add_task("b", "from b", None).unwrap();

        let err = store.rename_list("a", "b").unwrap_err();

        assert!(matches!(err, TodoError::AlreadyExists(_)));
        assert_eq!(store.tasks("a").unwrap()[0].name, "from a");
        assert_eq!(store.tasks("b").unwrap()[0].name, "from b");
    }

    #[test]
    fn rename_to_same_name_is_a_collision() {
        let (_tmp, store) = store();
        store.create_list("a").unwrap();
        assert!(matches!(
            store.rename_list("a", "a"),
            Err(TodoError::AlreadyExists(_))
        ));
        assert!(store.exists("a"));
    }

    #[test]
    fn rename_missing_list_is_not_found() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.rename_list("ghost", "c"),
            Err(TodoError::NotFound(_))
        ));
        assert!(!store.exists("c"));
    }

    #[test]
    fn add_task_to_missing_list_does_not_create_it() {
        let (_tmp, store) = store();
        let err = store.add_task("ghost", "buy milk", None).unwrap_err();

        assert!(matches!(err, TodoError::NotFound(_)));
        assert!(!store.list_path("ghost").exists());
    }

    #[test]
    fn add_task_rejects_empty_name() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();

        assert!(matches!(
            store.add_task("groceries", "  ", None),
            Err(TodoError::Validation(_))
        ));
        assert!(store.tasks("groceries").unwrap().is_empty());
    }

    #[test]
    fn add_task_stores_name_as_typed() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();

        store.add_task("groceries", "  indented", None).unwrap();

        assert_eq!(store.tasks("groceries").unwrap()[0].name, "  indented");
    }

    #[test]
    fn discarding_a_gone_file_keeps_the_cause() {
        let tmp = TempDir::new().unwrap();
        let cause = TodoError::Validation("schema failed".into());

        let err = discard_partial_list(&tmp.path().join("gone.db"), cause);

        assert!(matches!(err, TodoError::Validation(m) if m == "schema failed"));
    }

    #[test]
    fn failed_discard_is_reported_with_the_cause() {
        let tmp = TempDir::new().unwrap();
        let stuck = tmp.path().join("stuck.db");
        fs::create_dir(&stuck).unwrap();

        let err = discard_partial_list(&stuck, TodoError::Validation("schema failed".into()));

        match err {
            TodoError::Io(e) => {
                let text = e.to_string();
                assert!(text.contains("schema failed"), "{text}");
                assert!(text.contains("could not be removed"), "{text}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn task_ids_increase_in_insertion_order() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();

        let first = store.add_task("groceries", "buy milk", Some("2%")).unwrap();
        let second = store.add_task("groceries", "buy eggs", None).unwrap();

        assert_eq!((first, second), (1, 2));
        let tasks = store.tasks("groceries").unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name, "buy milk");
        assert_eq!(tasks[0].description.as_deref(), Some("2%"));
        assert_eq!(tasks[1].name, "buy eggs");
        assert_eq!(tasks[1].description, None);
    }

    #[test]
    fn ids_are_not_reused_after_row_removal() {
        let (_tmp, store) = store();
        store.create_list("groceries").unwrap();
        store.add_task("groceries", "one", None).unwrap();
        let last = store.add_task("groceries", "two", None).unwrap();

        let conn = Connection::open(store.list_path("groceries")).unwrap();
        conn.execute("DELETE FROM tasks WHERE id = ?1", [last]).unwrap();
        drop(conn);

        assert_eq!(store.add_task("groceries", "three", None).unwrap(), 3);
    }

    #[test]
    fn foreign_db_file_is_not_treated_as_list() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.list_path("junk"), b"").unwrap();

        assert!(matches!(
            store.add_task("junk", "task", None),
            Err(TodoError::Validation(_))
        ));
    }
}
