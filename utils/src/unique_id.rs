use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A process-wide unique, monotonically assigned identifier.  Used to mint object URL handles
/// and to tag individual fetch calls in log events.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct UniqueId(u64);

impl Default for UniqueId {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueId {
    pub fn new() -> Self {
        static UNIQUE_COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(UNIQUE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn null() -> Self {
        Self(0)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct() {
        let a = UniqueId::new();
        let b = UniqueId::new();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
        assert_ne!(a, UniqueId::null());
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(UniqueId::null().to_string(), "0000000000000000");
        assert_eq!(UniqueId(255).to_string(), "00000000000000ff");
    }
}
