/// Deferred actions stamped with the epoch they were scheduled in.
///
/// Bumping the epoch drops everything pending, so nothing scheduled before a
/// pause, game over or restart can fire into the state that follows it.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    epoch: u64,
    pending: Vec<Deferred<T>>,
}

#[derive(Debug)]
struct Deferred<T> {
    due_at: i64,
    epoch: u64,
    action: T,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            epoch: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, now: i64, delay_ms: i64, action: T) {
        self.pending.push(Deferred {
            due_at: now + delay_ms.max(0),
            epoch: self.epoch,
            action,
        });
    }

    pub fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.pending.clear();
    }

    /// Removes and returns every current-epoch action due at `now`, oldest first.
    pub fn drain_due(&mut self, now: i64) -> Vec<T> {
        let epoch = self.epoch;
        let mut due: Vec<Deferred<T>> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].epoch != epoch {
                self.pending.swap_remove(i);
                continue;
            }
            if self.pending[i].due_at <= now {
                due.push(self.pending.swap_remove(i));
                continue;
            }
            i += 1;
        }
        due.sort_by_key(|entry| entry.due_at);
        due.into_iter().map(|entry| entry.action).collect()
    }
}
