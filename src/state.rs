// Shared chat state
//
// Written by the UI thread (user input) and by background tasks (replies), read
// by the messages and status panels while rendering. Readers always get an
// owned copy so no lock is held across a render.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "bot",
            Role::System => "sys",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Default)]
struct ChatInner {
    messages: Vec<Message>,
    loading: bool,
}

/// Chat transcript plus the "waiting for reply" flag
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    inner: Arc<RwLock<ChatInner>>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicked writer leaves a consistent Vec behind, so poisoning is ignored
    fn read(&self) -> RwLockReadGuard<'_, ChatInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChatInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, message: Message) {
        self.write().messages.push(message);
    }

    /// Copy of the transcript
    pub fn messages(&self) -> Vec<Message> {
        self.read().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().loading = loading;
    }

    pub fn clear(&self) {
        let mut inner = self.write();
        inner.messages.clear();
        inner.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_returns_a_snapshot() {
        let state = ChatState::new();
        state.push(Message::new(Role::User, "hello"));
        let snapshot = state.messages();
        state.push(Message::new(Role::Assistant, "hi"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(state.len(), 2);
        assert_eq!(state.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn clones_share_the_same_transcript() {
        let state = ChatState::new();
        let worker = state.clone();
        worker.set_loading(true);
        worker.push(Message::new(Role::System, "ready"));

        assert!(state.is_loading());
        assert_eq!(state.messages()[0].text, "ready");

        state.clear();
        assert!(worker.is_empty());
        assert!(!worker.is_loading());
    }

    #[test]
    fn writes_from_threads_are_all_kept() {
        let state = ChatState::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let state = state.clone();
                std::thread::spawn(move || state.push(Message::new(Role::User, i.to_string())))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.len(), 4);
    }
}
