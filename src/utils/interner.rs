//! Global String Interner
//!
//! Turns shader macro names and values into integer [`Symbol`]s so pipeline
//! labels compare and hash as plain integers. Backed by a process-wide
//! [`ThreadedRodeo`]; symbols are never freed.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// Compact integer handle for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning the existing symbol if it was seen before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up a symbol without interning. Never allocates.
#[inline]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a symbol back to its string.
#[inline]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

/// Pre-interns the define names produced for pipeline state so the first
/// conversion does not pay for them on the hot path.
pub fn preload_pipeline_defines() {
    let common = [
        "USE_LIGHTING",
        "USE_BLEND",
        "USE_CULL_FACE",
        "USE_DEPTH_TEST",
        "USE_ALPHA_TEST",
        "USE_FOG",
        "USE_POLYGON_OFFSET",
        "USE_PROGRAM",
        "HAS_MAP",
        "HAS_CUBE_MAP",
        "1",
    ];

    for name in common {
        intern(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_resolve() {
        let s1 = intern("HAS_MAP");
        let s2 = intern("HAS_MAP");
        let s3 = intern("USE_BLEND");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);

        assert_eq!(resolve(s1), "HAS_MAP");
        assert_eq!(resolve(s3), "USE_BLEND");
    }

    #[test]
    fn test_get_does_not_intern() {
        let _ = intern("USE_FOG");

        assert!(get("USE_FOG").is_some());
        assert!(get("NEVER_INTERNED_DEFINE").is_none());
    }

    #[test]
    fn test_preload_interns_pipeline_defines() {
        preload_pipeline_defines();
        assert!(get("USE_POLYGON_OFFSET").is_some());
        assert!(get("HAS_CUBE_MAP").is_some());
    }
}
