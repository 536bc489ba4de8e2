//! Ordered record of the messages exchanged between pipeline roles.
//!
//! Insertion order is the causal order of the run. The log is append-only
//! while a run is in progress; only the caller clears it, typically between
//! independent images.
use serde::Serialize;
use std::fmt;

/// Logical participant in the pipeline conversation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Preprocessor,
    Classifier,
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Preprocessor => "Preprocessor",
            Role::Classifier => "Classifier",
            Role::System => "System",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub from: Role,
    pub to: Role,
    pub text: String,
}

impl Message {
    pub fn new(from: Role, to: Role, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        log::trace!("{} -> {}: {}", message.from, message.to, message.text);
        self.messages.push(message);
    }

    /// Owned copy of the messages in insertion order.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Render a numbered transcript, one `[i] From -> To` header per message with
/// the text indented underneath.
pub fn render_transcript(messages: &[Message]) -> String {
    let rule = "=".repeat(60);
    let mut out = format!("\n{rule}\nPIPELINE CONVERSATION LOG\n{rule}\n");
    for (i, msg) in messages.iter().enumerate() {
        out.push_str(&format!("\n[{}] {} -> {}\n", i + 1, msg.from, msg.to));
        for line in msg.text.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
