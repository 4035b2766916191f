//! 세션 저장소
//!
//! 브라우저 `localStorage`처럼 문자열 키/값을 보관합니다. 세 개의 값
//! (`accessToken`, `refreshToken`, `user`)은 함께 쓰고 함께 지워야 하므로,
//! 여러 키를 한 번에 반영하는 연산만 제공합니다.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use super::error::{ClientError, ClientResult};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>>;

    /// 모든 항목을 한 번에 기록
    fn set_items(&self, items: &[(&str, &str)]) -> ClientResult<()>;

    /// 모든 키를 한 번에 삭제 (없는 키는 무시)
    fn remove_items(&self, keys: &[&str]) -> ClientResult<()>;
}

/// 프로세스 메모리 저장소
#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> ClientError {
    ClientError::Storage("storage lock poisoned".to_string())
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> ClientResult<()> {
        let mut stored = self.items.write().map_err(|_| poisoned())?;
        for (key, value) in items {
            stored.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> ClientResult<()> {
        let mut stored = self.items.write().map_err(|_| poisoned())?;
        for key in keys {
            stored.remove(*key);
        }
        Ok(())
    }
}

/// JSON 파일 저장소
///
/// 변경할 때마다 임시 파일에 전체 내용을 쓰고 rename으로 교체하므로,
/// 중간에 중단되어도 파일은 이전 상태나 새 상태 중 하나입니다.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ClientResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ClientError::Storage(format!("{} 파싱 실패: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }

    fn write_all(&self, items: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(items).map_err(|e| ClientError::Storage(e.to_string()))?;
        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        fs::write(&temp_path, json).map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::rename(&temp_path, &self.path).map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn update(&self, apply: impl FnOnce(&mut HashMap<String, String>)) -> ClientResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| poisoned())?;
        let mut items = self.read_all()?;
        apply(&mut items);
        self.write_all(&items)
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_items(&self, items: &[(&str, &str)]) -> ClientResult<()> {
        self.update(|stored| {
            for (key, value) in items {
                stored.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_items(&self, keys: &[&str]) -> ClientResult<()> {
        self.update(|stored| {
            for key in keys {
                stored.remove(*key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(storage: &dyn SessionStorage) {
        storage
            .set_items(&[(ACCESS_TOKEN_KEY, "a1"), (REFRESH_TOKEN_KEY, "r1")])
            .unwrap();
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("a1"));

        storage.remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY]).unwrap();
        assert_eq!(storage.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get_item(REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_memory_storage() {
        exercise(&MemoryStorage::new());
    }

    #[test]
    fn test_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&FileStorage::new(dir.path().join("session.json")));
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStorage::new(&path).set_items(&[(USER_KEY, "{\"id\":\"1\"}")]).unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item(USER_KEY).unwrap().as_deref(), Some("{\"id\":\"1\"}"));
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStorage::new(&path).get_item(USER_KEY),
            Err(ClientError::Storage(_))
        ));
    }
}
