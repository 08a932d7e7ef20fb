//! Room Navigator
//!
//! Owns the current room/subroom selection and the compose buffer, and
//! turns user actions into session operations. Depends on the
//! [`ChatSession`] capability only, never on controller internals.

use std::time::Duration;

use crate::protocol::{Endpoint, FileDescriptor, OutboundEvent};
use crate::session::ChatSession;

use super::directory::RoomDirectory;
use super::typing::TypingTracker;

/// Current selection
///
/// Invariant: `subroom_id` is only set when `room_id` is set, and the
/// subroom belongs to that room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub room_id: Option<String>,
    pub subroom_id: Option<String>,
}

/// Drives navigation and outbound user actions for one page
pub struct RoomNavigator<S: ChatSession> {
    directory: RoomDirectory,
    state: NavigationState,
    session: S,
    typing: TypingTracker,
    input: String,
}

impl<S: ChatSession> RoomNavigator<S> {
    pub fn new(directory: RoomDirectory, session: S, typing_idle: Duration) -> Self {
        Self {
            directory,
            state: NavigationState::default(),
            session,
            typing: TypingTracker::new(typing_idle),
            input: String::new(),
        }
    }

    /// Current selection
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The loaded directory
    pub fn directory(&self) -> &RoomDirectory {
        &self.directory
    }

    /// Pending compose-buffer contents
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Select a top-level room and reconnect the session to it
    ///
    /// Selecting the room a subroom belongs to collapses the selection
    /// back to the parent. Unknown room ids leave everything untouched.
    pub fn select_room(&mut self, room_id: &str) -> bool {
        if self.directory.find_room(room_id).is_none() {
            tracing::warn!(room_id, "ignoring selection of unknown room");
            return false;
        }

        self.state = NavigationState {
            room_id: Some(room_id.to_string()),
            subroom_id: None,
        };
        self.typing.reset();
        tracing::info!(room_id, "room selected");
        self.session.connect(Endpoint::room(room_id));
        true
    }

    /// Select a subroom and reconnect the session to it
    ///
    /// The subroom must belong to the room per the loaded directory;
    /// otherwise the selection is ignored and no connect is issued.
    pub fn select_subroom(&mut self, room_id: &str, subroom_id: &str) -> bool {
        if !self.directory.contains_subroom(room_id, subroom_id) {
            tracing::warn!(room_id, subroom_id, "ignoring selection of unknown subroom");
            return false;
        }

        self.state = NavigationState {
            room_id: Some(room_id.to_string()),
            subroom_id: Some(subroom_id.to_string()),
        };
        self.typing.reset();
        tracing::info!(room_id, subroom_id, "subroom selected");
        self.session.connect(Endpoint::subroom(room_id, subroom_id));
        true
    }

    /// Append text to the compose buffer and drive the typing indicator
    pub fn push_input(&mut self, text: &str) {
        self.input.push_str(text);
        self.send_typing();
    }

    /// Record typing activity (debounced; see [`TypingTracker`])
    pub fn send_typing(&mut self) {
        self.typing.keystroke(&self.session);
    }

    /// Send the compose buffer as a chat message and clear it
    ///
    /// Empty and whitespace-only buffers produce no frame. Requires a
    /// selected room for the `room_id` context.
    pub fn send_message(&mut self) -> bool {
        let content = self.input.trim().to_string();
        if content.is_empty() {
            return false;
        }
        let Some(room_id) = self.state.room_id.clone() else {
            tracing::debug!("no room selected, dropping message");
            return false;
        };

        self.session.send(OutboundEvent::Message { content, room_id });
        self.input.clear();
        true
    }

    /// Share an uploaded file in the current room
    pub fn send_file_message(&mut self, file_data: FileDescriptor) -> bool {
        let Some(room_id) = self.state.room_id.clone() else {
            tracing::debug!("no room selected, dropping file message");
            return false;
        };
        self.session
            .send(OutboundEvent::FileMessage { file_data, room_id });
        true
    }

    /// Description text for the current selection (room-info panel)
    pub fn current_description(&self) -> Option<&str> {
        let room_id = self.state.room_id.as_deref()?;
        self.directory
            .describe(room_id, self.state.subroom_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Action {
        Connect(Endpoint),
        Send(serde_json::Value),
    }

    #[derive(Clone, Default)]
    struct RecordingSession {
        actions: Arc<Mutex<Vec<Action>>>,
    }

    impl RecordingSession {
        fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl ChatSession for RecordingSession {
        fn connect(&self, endpoint: Endpoint) {
            self.actions.lock().unwrap().push(Action::Connect(endpoint));
        }

        fn send(&self, event: OutboundEvent) {
            let value = serde_json::to_value(&event).unwrap();
            self.actions.lock().unwrap().push(Action::Send(value));
        }
    }

    fn directory() -> RoomDirectory {
        RoomDirectory::from_json(
            r#"{
                "categories": [{
                    "slug": "languages",
                    "name": "Languages",
                    "rooms": [
                        {
                            "id": "rust",
                            "name": "Rust",
                            "description": "Systems programming",
                            "subrooms": [{"id": "async", "name": "async"}]
                        },
                        {"id": "python", "name": "Python"}
                    ]
                }]
            }"#,
        )
        .unwrap()
    }

    fn navigator() -> (RoomNavigator<RecordingSession>, RecordingSession) {
        let session = RecordingSession::default();
        let navigator =
            RoomNavigator::new(directory(), session.clone(), Duration::from_secs(2));
        (navigator, session)
    }

    #[tokio::test]
    async fn test_select_room_connects_room_endpoint() {
        let (mut navigator, session) = navigator();

        assert!(navigator.select_room("rust"));
        assert_eq!(
            navigator.state(),
            &NavigationState {
                room_id: Some("rust".to_string()),
                subroom_id: None,
            }
        );
        assert_eq!(session.actions(), vec![Action::Connect(Endpoint::room("rust"))]);
    }

    #[tokio::test]
    async fn test_select_subroom_connects_subroom_endpoint() {
        let (mut navigator, session) = navigator();

        assert!(navigator.select_subroom("rust", "async"));
        assert_eq!(
            navigator.state(),
            &NavigationState {
                room_id: Some("rust".to_string()),
                subroom_id: Some("async".to_string()),
            }
        );
        assert_eq!(
            session.actions(),
            vec![Action::Connect(Endpoint::subroom("rust", "async"))]
        );
    }

    #[tokio::test]
    async fn test_foreign_subroom_leaves_state_untouched() {
        let (mut navigator, session) = navigator();
        navigator.select_room("rust");

        // "async" belongs to rust, not python
        assert!(!navigator.select_subroom("python", "async"));
        assert_eq!(navigator.state().room_id.as_deref(), Some("rust"));
        assert_eq!(navigator.state().subroom_id, None);
        // Only the original room connect happened
        assert_eq!(session.actions().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_room_is_ignored() {
        let (mut navigator, session) = navigator();

        assert!(!navigator.select_room("nope"));
        assert_eq!(navigator.state(), &NavigationState::default());
        assert!(session.actions().is_empty());
    }

    #[tokio::test]
    async fn test_navigation_transitions_reconnect_each_time() {
        let (mut navigator, session) = navigator();

        // none -> room -> subroom -> parent room -> other room
        navigator.select_room("rust");
        navigator.select_subroom("rust", "async");
        navigator.select_room("rust");
        navigator.select_room("python");

        assert_eq!(
            session.actions(),
            vec![
                Action::Connect(Endpoint::room("rust")),
                Action::Connect(Endpoint::subroom("rust", "async")),
                Action::Connect(Endpoint::room("rust")),
                Action::Connect(Endpoint::room("python")),
            ]
        );
        assert_eq!(navigator.state().room_id.as_deref(), Some("python"));
        assert_eq!(navigator.state().subroom_id, None);
    }

    #[tokio::test]
    async fn test_send_message_trims_and_clears_input() {
        let (mut navigator, session) = navigator();
        navigator.select_room("rust");

        navigator.input.push_str("  hi  ");
        assert!(navigator.send_message());
        assert_eq!(navigator.input(), "");

        let actions = session.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[1],
            Action::Send(serde_json::json!({
                "type": "message",
                "content": "hi",
                "room_id": "rust",
            }))
        );
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_messages_are_rejected() {
        let (mut navigator, session) = navigator();
        navigator.select_room("rust");

        assert!(!navigator.send_message());
        navigator.input.push_str("   ");
        assert!(!navigator.send_message());

        // Only the connect, no message frames
        assert_eq!(session.actions().len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_requires_a_room() {
        let (mut navigator, session) = navigator();

        navigator.input.push_str("hello");
        assert!(!navigator.send_message());
        assert!(session.actions().is_empty());
        // The buffer survives for when a room is selected
        assert_eq!(navigator.input(), "hello");
    }

    #[tokio::test]
    async fn test_send_file_message_targets_current_room() {
        let (mut navigator, session) = navigator();
        navigator.select_room("rust");

        let sent = navigator.send_file_message(FileDescriptor {
            name: "notes.md".to_string(),
            url: "/media/notes.md".to_string(),
            size: Some(512),
            content_type: None,
        });
        assert!(sent);

        let actions = session.actions();
        assert_eq!(
            actions[1],
            Action::Send(serde_json::json!({
                "type": "file_message",
                "file_data": {"name": "notes.md", "url": "/media/notes.md", "size": 512},
                "room_id": "rust",
            }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_input_drives_typing_debounce() {
        let (mut navigator, session) = navigator();
        navigator.select_room("rust");

        navigator.push_input("h");
        navigator.push_input("i");
        assert_eq!(navigator.input(), "hi");

        tokio::time::advance(Duration::from_secs(2)).await;
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }

        let typing: Vec<serde_json::Value> = session
            .actions()
            .into_iter()
            .filter_map(|action| match action {
                Action::Send(value) if value["type"] == "typing" => Some(value),
                _ => None,
            })
            .collect();
        assert_eq!(typing.len(), 2);
        assert_eq!(typing[0]["is_typing"], true);
        assert_eq!(typing[1]["is_typing"], false);
    }

    #[tokio::test]
    async fn test_current_description_follows_selection() {
        let (mut navigator, _session) = navigator();
        assert_eq!(navigator.current_description(), None);

        navigator.select_room("rust");
        assert_eq!(navigator.current_description(), Some("Systems programming"));
    }
}
