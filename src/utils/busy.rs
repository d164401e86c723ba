use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared "operation in progress" flag.
///
/// The flag is raised by taking a [`BusyGuard`] and lowered when the guard is
/// dropped, so it also comes down when the owning future errors out or is
/// cancelled mid-await.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    flag: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Raise the flag unconditionally.
    pub fn acquire(&self) -> BusyGuard {
        self.flag.store(true, Ordering::Release);
        BusyGuard {
            flag: self.flag.clone(),
        }
    }

    /// Raise the flag only if nobody holds it. `None` means another holder is active.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                flag: self.flag.clone(),
            })
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_lowers_flag_on_drop() {
        let busy = BusyFlag::new();
        assert!(!busy.is_set());
        {
            let _guard = busy.acquire();
            assert!(busy.is_set());
        }
        assert!(!busy.is_set());
    }

    #[test]
    fn test_try_acquire_is_exclusive() {
        let busy = BusyFlag::new();
        let first = busy.try_acquire();
        assert!(first.is_some());
        assert!(busy.try_acquire().is_none());
        drop(first);
        assert!(busy.try_acquire().is_some());
    }
}
