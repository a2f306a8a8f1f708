//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn content() -> PathBuf {
        "blog".into()
    }

    pub fn output() -> PathBuf {
        "recipes-list.json".into()
    }

    pub fn extension() -> String {
        "html".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    use std::path::PathBuf;

    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }

    pub fn root() -> PathBuf {
        ".".into()
    }

    pub fn base_path() -> String {
        "/recipe".into()
    }
}

// ============================================================================
// [browse] Section Defaults
// ============================================================================

pub mod browse {
    pub fn base_url() -> String {
        "http://127.0.0.1:5277/recipe".into()
    }

    pub fn timeout_ms() -> u64 {
        10_000
    }

    pub fn cache_capacity() -> Option<usize> {
        None
    }
}
