use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Index over a fixed number of items, wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cycler {
    index: usize,
    len: usize,
}

impl Cycler {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn advance(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn retreat(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Jumps to `index`; out-of-range targets are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Fraction of the items seen so far, for the progress bar.
    pub fn progress(&self) -> Option<f64> {
        (self.len > 0).then(|| (self.index + 1) as f64 / self.len as f64)
    }
}

/// Advances a shared `Cycler` on a fixed period.
///
/// The timer task lives exactly as long as the ticker: dropping it (or
/// calling `stop`) aborts the task.
#[derive(Debug)]
pub struct CarouselTicker {
    cycler: Arc<Mutex<Cycler>>,
    tx: Arc<watch::Sender<usize>>,
    task: JoinHandle<()>,
}

impl CarouselTicker {
    /// Must be called from within a tokio runtime.
    pub fn spawn(cycler: Cycler, period: Duration) -> Self {
        let (tx, _rx) = watch::channel(cycler.index());
        let cycler = Arc::new(Mutex::new(cycler));
        let tx = Arc::new(tx);

        let task = {
            let cycler = Arc::clone(&cycler);
            let tx = Arc::clone(&tx);
            tokio::spawn(async move {
                let start = tokio::time::Instant::now() + period;
                let mut interval = tokio::time::interval_at(start, period);
                loop {
                    interval.tick().await;
                    let index = lock(&cycler).advance();
                    tx.send_replace(index);
                    tracing::trace!(index, "carousel advanced");
                }
            })
        };

        Self { cycler, tx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Cycler {
        *lock(&self.cycler)
    }

    pub fn advance(&self) -> usize {
        self.update(Cycler::advance)
    }

    pub fn retreat(&self) -> usize {
        self.update(Cycler::retreat)
    }

    pub fn go_to(&self, index: usize) -> bool {
        let mut moved = false;
        self.update(|c| {
            moved = c.go_to(index);
            c.index()
        });
        moved
    }

    pub fn stop(self) {}

    fn update(&self, f: impl FnOnce(&mut Cycler) -> usize) -> usize {
        let index = f(&mut lock(&self.cycler));
        self.tx.send_replace(index);
        index
    }
}

impl Drop for CarouselTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock(cycler: &Mutex<Cycler>) -> MutexGuard<'_, Cycler> {
    // A poisoned lock still holds a valid index.
    cycler.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
