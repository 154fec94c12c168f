//! Editor notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! `EditorCore` calls plain closures (`EditorHandlers`). A UI built on the
//! Elm architecture cannot react inside a callback, so `channel()` builds
//! handlers that turn each notification into an `EditorEvent` value and
//! queue it. The update loop drains the queue after every editor call.

use tokio::sync::mpsc;

/// Callbacks fired by the editor.
pub struct EditorHandlers {
    /// Fired synchronously after every edit with the full new text.
    pub on_text_change: Box<dyn FnMut(&str) + Send>,
    /// Fired when a run key combination is pressed.
    pub on_execute_requested: Box<dyn FnMut() + Send>,
}

impl EditorHandlers {
    /// Handlers that ignore everything.
    pub fn noop() -> Self {
        Self {
            on_text_change: Box::new(|_| {}),
            on_execute_requested: Box::new(|| {}),
        }
    }

    /// Handlers that queue events for the returned [`EventQueue`].
    pub fn channel() -> (Self, EventQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let text_sender = sender.clone();

        let handlers = Self {
            // A closed queue only means nobody is listening any more.
            on_text_change: Box::new(move |text| {
                let _ = text_sender.send(EditorEvent::TextChanged(text.to_string()));
            }),
            on_execute_requested: Box::new(move || {
                let _ = sender.send(EditorEvent::ExecuteRequested);
            }),
        };
        (handlers, EventQueue { receiver })
    }
}

impl Default for EditorHandlers {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for EditorHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorHandlers").finish_non_exhaustive()
    }
}

/// Things the editor tells its owner about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The text changed; carries the full new text
    TextChanged(String),
    /// The user asked to run the code
    ExecuteRequested,
}

/// Receiving end of [`EditorHandlers::channel`].
#[derive(Debug)]
pub struct EventQueue {
    receiver: mpsc::UnboundedReceiver<EditorEvent>,
}

impl EventQueue {
    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_handlers_queue_events() {
        let (mut handlers, mut queue) = EditorHandlers::channel();

        (handlers.on_text_change)("x = 1");
        (handlers.on_execute_requested)();

        assert_eq!(
            queue.drain(),
            vec![
                EditorEvent::TextChanged("x = 1".to_string()),
                EditorEvent::ExecuteRequested,
            ]
        );
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_dropped_queue_is_ignored() {
        let (mut handlers, queue) = EditorHandlers::channel();
        drop(queue);
        (handlers.on_text_change)("still fine");
        (handlers.on_execute_requested)();
    }
}
