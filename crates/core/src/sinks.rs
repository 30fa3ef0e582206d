//! Outbound collaborators provided by the host

use parking_lot::Mutex;

/// Receives short replacement notifications for display
pub trait NotificationSink: Send + Sync {
    fn queue_message(&self, message: &str);
}

/// Fire-and-forget outbound text to the game server
pub trait ServerConnection: Send + Sync {
    /// Send a command, without the leading slash
    fn send_command(&self, command: &str);

    /// Send a plain chat message
    fn send_chat(&self, message: &str);
}

/// Notification sink that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemoryNotifications {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all queued messages
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Drain the queued messages
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl NotificationSink for MemoryNotifications {
    fn queue_message(&self, message: &str) {
        tracing::debug!("Queued notification: {}", message);
        self.messages.lock().push(message.to_string());
    }
}

/// Text sent through a [`MemoryConnection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Command(String),
    Chat(String),
}

/// Server connection that records outbound text instead of sending it
#[derive(Debug, Default)]
pub struct MemoryConnection {
    sent: Mutex<Vec<Outbound>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().clone()
    }

    /// Only the commands, in send order
    pub fn commands(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter_map(|out| match out {
                Outbound::Command(command) => Some(command.clone()),
                Outbound::Chat(_) => None,
            })
            .collect()
    }
}

impl ServerConnection for MemoryConnection {
    fn send_command(&self, command: &str) {
        tracing::debug!("Sending command /{}", command);
        self.sent.lock().push(Outbound::Command(command.to_string()));
    }

    fn send_chat(&self, message: &str) {
        tracing::debug!("Sending chat {}", message);
        self.sent.lock().push(Outbound::Chat(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifications() {
        let sink = MemoryNotifications::new();
        sink.queue_message("one");
        sink.queue_message("two");
        assert_eq!(sink.messages(), vec!["one", "two"]);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_memory_connection() {
        let connection = MemoryConnection::new();
        connection.send_command("friend list");
        connection.send_chat("4096");
        assert_eq!(connection.commands(), vec!["friend list"]);
        assert_eq!(
            connection.sent(),
            vec![
                Outbound::Command("friend list".into()),
                Outbound::Chat("4096".into())
            ]
        );
    }
}
