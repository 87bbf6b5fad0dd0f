//! Read diagnostics.
//!
//! Conditions that do not abort a load (placeholder entities, unsupported
//! form numbers, ambiguous composite-curve stitching) are collected as
//! `Notification` items on the resulting document instead of being dropped.
//!
//! After a read the caller can inspect [`IgesDocument::notifications`] to see
//! what was encountered.
//!
//! [`IgesDocument::notifications`]: crate::document::IgesDocument::notifications

use std::fmt;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// An entity type the library only carries as directory metadata.
    NotImplemented,
    /// A recognized entity type with a form number that is not read.
    NotSupported,
    /// Non-fatal warning (e.g. ambiguous endpoint match, forward reference).
    Warning,
    /// Error that was recovered from.
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::NotSupported => write!(f, "NotSupported"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The severity / category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
    /// Directory sequence number of the entity concerned, if any.
    pub sequence: Option<u32>,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
            sequence: None,
        }
    }

    /// Attach the directory sequence number the notification is about.
    pub fn for_entity(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sequence {
            Some(seq) => write!(f, "[{}] DE {}: {}", self.notification_type, seq, self.message),
            None => write!(f, "[{}] {}", self.notification_type, self.message),
        }
    }
}

/// Collects notifications during a read.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.items.push(Notification::new(notification_type, message));
    }

    /// Record a notification about one directory entry.
    pub fn notify_entity(
        &mut self,
        notification_type: NotificationType,
        sequence: u32,
        message: impl Into<String>,
    ) {
        self.items
            .push(Notification::new(notification_type, message).for_entity(sequence));
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// All notifications recorded against one directory entry.
    pub fn for_entity(&self, sequence: u32) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| n.sequence == Some(sequence))
            .collect()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
