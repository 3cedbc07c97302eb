// crates/scrubdeck-media/src/queue.rs
//
// Request Queues (§4.C) and the promise/future pair results travel on.
//
// `RequestQueue<T>` is a `Mutex<QueueState<T>> + Condvar`, mirroring the
// teacher's `frame_req: Arc<(Mutex<Option<FrameRequest>>, Condvar)>` slot in
// `worker.rs` but generalized from a latest-wins single slot to an ordered
// FIFO with a cancel-id set, per §4.C.
//
// `RequestFuture<T>` is a `crossbeam_channel::bounded(1)` receiver — the
// teacher already reaches for `crossbeam_channel` everywhere else instead
// of `std::sync::mpsc` or a futures crate, so the promise side follows the
// same idiom rather than introducing async.

use std::collections::{HashSet, VecDeque};
use std::sync::{Condvar, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};

/// Anything enqueued on a `RequestQueue` must expose its monotonic id so
/// `cancel` can find it in the pending deque.
pub trait Identified {
    fn id(&self) -> u64;
}

struct QueueState<T> {
    queue:     VecDeque<T>,
    cancelled: HashSet<u64>,
    shutdown:  bool,
}

pub struct RequestQueue<T> {
    state: Mutex<QueueState<T>>,
    cvar:  Condvar,
}

impl<T: Identified> RequestQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState { queue: VecDeque::new(), cancelled: HashSet::new(), shutdown: false }),
            cvar:  Condvar::new(),
        }
    }

    /// Enqueue `item` and wake one waiting worker. Returns `false` without
    /// enqueuing if the queue has already been shut down (§4.C: "new
    /// submissions after shutdown resolve their promise immediately with an
    /// empty value" — the caller is expected to do that resolution itself
    /// when this returns `false`).
    pub fn submit(&self, item: T) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.shutdown {
            return false;
        }
        state.queue.push_back(item);
        self.cvar.notify_one();
        true
    }

    /// Remove still-pending entries matching `ids` and record all of `ids`
    /// as cancelled, so a request that's already been dequeued by a worker
    /// is still flagged (the worker finishes it; the client is expected to
    /// ignore the result by id on its side, per §4.C cancellation semantics).
    pub fn cancel(&self, ids: &[u64]) {
        let mut state = self.state.lock().unwrap();
        let set: HashSet<u64> = ids.iter().copied().collect();
        state.queue.retain(|item| !set.contains(&item.id()));
        state.cancelled.extend(set);
    }

    pub fn is_cancelled(&self, id: u64) -> bool {
        self.state.lock().unwrap().cancelled.remove(&id)
    }

    /// Blocks on work-or-stop (§4.D step 1). Returns `None` once the queue
    /// has been shut down and fully drained (step 2: "drains remaining
    /// requests into empty resolutions and exits" — the caller pops the
    /// remaining items by calling `recv` repeatedly until it returns `None`).
    pub fn recv(&self) -> Option<T> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(item) = state.queue.pop_front() {
                return Some(item);
            }
            if state.shutdown {
                return None;
            }
            state = self.cvar.wait(state).unwrap();
        }
    }

    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        state.shutdown = true;
        self.cvar.notify_all();
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// Step 2 of the worker loop: once shut down, remaining items drain into
    /// empty resolutions rather than being worked — the caller checks this
    /// right after `recv` returns `Some`.
    pub fn is_shutdown(&self) -> bool {
        self.state.lock().unwrap().shutdown
    }
}

// ── Promise / future ────────────────────────────────────────────────────────

/// Single-shot result channel. `poll()` is used by the UI tick (§4.E
/// "clients poll them on a periodic tick"); `wait()` blocks and is used by
/// the save pipeline, which needs the result before it can advance.
pub struct RequestFuture<T>(Receiver<T>);

impl<T> RequestFuture<T> {
    pub fn pair() -> (Sender<T>, RequestFuture<T>) {
        let (tx, rx) = bounded(1);
        (tx, RequestFuture(rx))
    }

    pub fn poll(&self) -> Option<T> {
        self.0.try_recv().ok()
    }

    pub fn wait(&self) -> Option<T> {
        self.0.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Req(u64);
    impl Identified for Req {
        fn id(&self) -> u64 { self.0 }
    }

    #[test]
    fn cancel_removes_pending_entry() {
        let q: RequestQueue<Req> = RequestQueue::new();
        q.submit(Req(1));
        q.submit(Req(2));
        q.cancel(&[1]);
        assert_eq!(q.recv().unwrap().0, 2);
    }

    #[test]
    fn recv_returns_none_after_shutdown_drains() {
        let q: RequestQueue<Req> = RequestQueue::new();
        q.submit(Req(1));
        q.shutdown();
        assert_eq!(q.recv().unwrap().0, 1);
        assert!(q.recv().is_none());
    }

    #[test]
    fn submit_after_shutdown_is_rejected() {
        let q: RequestQueue<Req> = RequestQueue::new();
        q.shutdown();
        assert!(!q.submit(Req(1)));
    }

    #[test]
    fn future_round_trips_a_value() {
        let (tx, fut) = RequestFuture::pair();
        assert!(fut.poll().is_none());
        tx.send(42).unwrap();
        assert_eq!(fut.wait(), Some(42));
    }
}
