//! Bookkeeping for requests that have been dispatched but not yet delivered.
//!
//! Each operation gets an [`AbortHandle`] that is registered *before* its task
//! is spawned, so a request that completes immediately can never slip past a
//! concurrent [`InFlight::cancel_all`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use futures::future::{AbortHandle, AbortRegistration};

/// Identifies one registered operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(u64);

/// Set of in-flight operations that can be cancelled together.
#[derive(Debug, Default)]
pub struct InFlight {
    next_id: AtomicU64,
    handles: Mutex<HashMap<OperationId, AbortHandle>>,
}

/// A freshly registered operation.
///
/// `registration` is consumed by [`futures::future::Abortable`] around the
/// background work; `handle` is kept by the completion path to check whether
/// the operation was cancelled before delivering its result.
pub struct Registered {
    pub id: OperationId,
    pub handle: AbortHandle,
    pub registration: AbortRegistration,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-update of a plain
    // map; the map itself is still consistent.
    fn handles(&self) -> MutexGuard<'_, HashMap<OperationId, AbortHandle>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(&self) -> Registered {
        let id = OperationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (handle, registration) = AbortHandle::new_pair();
        self.handles().insert(id, handle.clone());
        Registered {
            id,
            handle,
            registration,
        }
    }

    /// Forget an operation once its outcome has been delivered.
    pub fn complete(&self, id: OperationId) {
        self.handles().remove(&id);
    }

    /// Abort every tracked operation and clear the set.
    ///
    /// Returns how many operations were cancelled; a second call with nothing
    /// new registered returns 0 and has no effect.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<AbortHandle> = self.handles().drain().map(|(_, h)| h).collect();
        for handle in &drained {
            handle.abort();
        }
        drained.len()
    }

    pub fn len(&self) -> usize {
        self.handles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
