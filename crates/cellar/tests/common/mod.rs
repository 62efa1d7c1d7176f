#![allow(dead_code)] // Shared across integration test crates; each uses only a subset.
use cellar::Session;
use cellar_catalog::Catalog;
use cellar_storage::MemoryStore;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Resolve the built `cellar` binary for CLI tests.
pub fn cellar_exe() -> PathBuf {
    if let Ok(v) = std::env::var("CARGO_BIN_EXE_cellar") {
        return PathBuf::from(v);
    }
    PathBuf::from(env!("CARGO_BIN_EXE_cellar"))
}

pub fn builtin_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().expect("builtin catalog"))
}

pub fn memory_session() -> Session<MemoryStore> {
    Session::new(builtin_catalog(), MemoryStore::new())
}

pub fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cellar_{}_{}", label, Uuid::new_v4()))
}

pub fn parse_stdout(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_else(|| panic!("no output: {:?}", text));
    serde_json::from_str(line).unwrap_or_else(|e| panic!("bad json {:?}: {}", line, e))
}
