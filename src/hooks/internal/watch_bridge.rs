//! Mirrors a controller's `watch` channel into a Dioxus signal.

use dioxus::prelude::*;
use tokio::sync::watch;

/// Create a signal holding the channel's current value and keep it updated.
///
/// The forwarding task is spawned in the calling component's scope and ends
/// with it, or when the controller's sender is dropped.
pub(crate) fn use_watch_signal<T>(subscribe: impl FnOnce() -> watch::Receiver<T>) -> Signal<T>
where
    T: Clone + 'static,
{
    use_hook(|| {
        let mut receiver = subscribe();
        let mut signal = Signal::new(receiver.borrow_and_update().clone());
        spawn(async move {
            while receiver.changed().await.is_ok() {
                let next = receiver.borrow_and_update().clone();
                signal.set(next);
            }
        });
        signal
    })
}
