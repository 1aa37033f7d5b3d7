//! Path resolution for todo-feed data files.
//!
//! Provides XDG-compliant defaults for the JSON and SQLite stores.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "todo-feed";

/// Get XDG-compliant data directory for todo-feed.
///
/// Uses `$XDG_DATA_HOME/todo-feed`, falling back to
/// `~/.local/share/todo-feed`. Without either variable the current
/// directory is used.
pub fn get_data_dir() -> PathBuf {
    let data_home = env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_home.join(APP_DIR)
}

/// Default JSON document path (data_dir/todos.json).
pub fn get_json_path() -> PathBuf {
    get_data_dir().join("todos.json")
}

/// Default SQLite database path (data_dir/todos.db).
pub fn get_sqlite_path() -> PathBuf {
    get_data_dir().join("todos.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_get_data_dir_ends_with_app_dir() {
        assert!(get_data_dir().ends_with("todo-feed"));
    }

    #[test]
    fn test_store_paths_live_in_data_dir() {
        assert!(get_json_path().ends_with("todo-feed/todos.json"));
        assert!(get_sqlite_path().ends_with("todo-feed/todos.db"));
    }

    #[test]
    #[serial]
    fn test_xdg_data_home_takes_precedence() {
        let previous = env::var_os("XDG_DATA_HOME");
        unsafe {
            env::set_var("XDG_DATA_HOME", "/tmp/xdg-todo-test");
        }

        assert_eq!(get_data_dir(), PathBuf::from("/tmp/xdg-todo-test/todo-feed"));

        unsafe {
            match previous {
                Some(value) => env::set_var("XDG_DATA_HOME", value),
                None => env::remove_var("XDG_DATA_HOME"),
            }
        }
    }
}
