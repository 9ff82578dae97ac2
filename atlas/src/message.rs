//! Conversation message types for the shared academic state.
//!
//! Message roles: System (prompt templates), User (student requests),
//! Assistant (oracle replies). `SharedState::messages` appends these in
//! chronological order; the coordinator and agents read the latest User
//! entry as the current request.

/// A single role-tagged message in the conversation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System(String),
    /// Student request.
    User(String),
    /// Oracle reply.
    Assistant(String),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    /// The text content regardless of role.
    pub fn content(&self) -> &str {
        match self {
            Self::System(c) | Self::User(c) | Self::Assistant(c) => c,
        }
    }

    /// Lowercase role name as used on the oracle wire ("system"/"user"/"assistant").
    pub fn role(&self) -> &'static str {
        match self {
            Self::System(_) => "system",
            Self::User(_) => "user",
            Self::Assistant(_) => "assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: system/user/assistant constructors produce the correct variant with content.
    #[test]
    fn message_constructors_build_each_variant() {
        let sys = Message::system("s");
        assert!(matches!(&sys, Message::System(c) if c == "s"));
        let usr = Message::user("u");
        assert!(matches!(&usr, Message::User(c) if c == "u"));
        let ast = Message::assistant("a");
        assert!(matches!(&ast, Message::Assistant(c) if c == "a"));
    }

    /// **Scenario**: content() strips the role; role() reports the wire name.
    #[test]
    fn message_content_and_role_accessors() {
        let m = Message::user("finish the calculus assignment");
        assert_eq!(m.content(), "finish the calculus assignment");
        assert_eq!(m.role(), "user");
        assert_eq!(Message::system("x").role(), "system");
        assert_eq!(Message::assistant("x").role(), "assistant");
    }

    /// **Scenario**: Each Message variant round-trips through serde, since the
    /// whole SharedState (messages included) must serialize for display/tests.
    #[test]
    fn message_serialize_deserialize_roundtrip() {
        for msg in [
            Message::system("sys"),
            Message::user("usr"),
            Message::assistant("ast"),
        ] {
            let json = serde_json::to_string(&msg).expect("serialize");
            let back: Message = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(msg, back);
        }
    }
}
