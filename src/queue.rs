// UI work queue - hands work from background tasks to the UI thread
//
// Components and surfaces live on the UI thread (`Rc<RefCell<_>>`), so a
// background task never touches them directly. It posts a closure instead; the
// event loop runs every pending closure against the application state between
// frames, in the order they were posted.

use tokio::sync::mpsc;

/// Unit of deferred UI work
pub type UiTask<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Sending half; cheap to clone and safe to move into spawned tasks
pub struct UiSender<T> {
    tx: mpsc::UnboundedSender<UiTask<T>>,
}

impl<T> Clone for UiSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> UiSender<T> {
    /// Queue `task` for the UI thread
    ///
    /// Returns false once the UI side has shut down.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut T) + Send + 'static,
    {
        self.tx.send(Box::new(task)).is_ok()
    }
}

/// Receiving half, owned by the event loop
pub struct UiQueue<T> {
    rx: mpsc::UnboundedReceiver<UiTask<T>>,
}

impl<T> UiQueue<T> {
    pub fn new() -> (UiSender<T>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (UiSender { tx }, Self { rx })
    }

    /// Run every pending task against `target`; returns how many ran
    pub fn drain(&mut self, target: &mut T) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task(target);
            ran += 1;
        }
        ran
    }

    /// Wait for the next task; None when every sender is gone
    pub async fn recv(&mut self) -> Option<UiTask<T>> {
        self.rx.recv().await
    }
}
