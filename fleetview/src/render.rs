use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Redraw collaborator. `mark_dirty` is idempotent and coalescible: any
/// number of signals between two redraws collapse into a single redraw.
/// The core calls it after every successful reconciliation and says
/// nothing about when the redraw actually happens.
pub trait RenderScheduler: Send + Sync {
    fn mark_dirty(&self);
}

/// Default scheduler: a latch the render loop drains on its own cadence.
#[derive(Debug, Default)]
pub struct DirtyFlag {
    dirty: AtomicBool,
}

impl DirtyFlag {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Clears the flag, returning whether a redraw is due.
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

impl RenderScheduler for DirtyFlag {
    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_signals_coalesce_into_one_redraw() {
        let flag = DirtyFlag::new();
        flag.mark_dirty();
        flag.mark_dirty();
        flag.mark_dirty();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
