use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SURFACE_ID: AtomicU32 = AtomicU32::new(1);

/// Stable identity of a surface. Every outgoing host event carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

impl From<u32> for SurfaceId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Allocate a process-unique surface id.
pub fn next_surface_id() -> SurfaceId {
    SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed() {
        assert_eq!(SurfaceId(7).to_string(), "surface-7");
    }

    #[test]
    fn allocated_ids_are_unique_and_increasing() {
        let a = next_surface_id();
        let b = next_surface_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&SurfaceId(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: SurfaceId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, SurfaceId(42));
    }

    #[test]
    fn hash_dedupes_equal_ids() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(SurfaceId(1));
        set.insert(SurfaceId::from(1));
        assert_eq!(set.len(), 1);
    }
}
