//! # Notifications
//!
//! Rows in `notifications` are addressed to a recipient and optionally point at the
//! sender and an event. [`NotificationList`] is the client-side copy shown in the
//! bell and on the notifications page: newest first, no duplicate ids, kept in sync
//! with realtime pushes through [`NotificationList::apply`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::realtime::{Change, ChangeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Ticket,
    Event,
    #[serde(other)]
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub sender_id: Option<Uuid>,
    pub recipient_id: Uuid,
    pub event_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `notifications`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub sender_id: Option<Uuid>,
    pub recipient_id: Uuid,
    pub event_id: Option<Uuid>,
}

/// Notifications of the signed-in user, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationList {
    items: Vec<Notification>,
}

impl NotificationList {
    pub fn new(mut items: Vec<Notification>) -> Self {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let mut list = Self {
            items: Vec::with_capacity(items.len()),
        };
        for item in items {
            if !list.contains(item.id) {
                list.items.push(item);
            }
        }
        list
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Set the read flag of one notification. Returns whether it changed.
    pub fn set_read(&mut self, id: Uuid, read: bool) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) if n.read != read => {
                n.read = read;
                true
            }
            _ => false,
        }
    }

    pub fn mark_read(&mut self, id: Uuid) -> bool {
        self.set_read(id, true)
    }

    /// Mark everything read, returning the ids that were unread so a failed
    /// backend call can restore them.
    pub fn mark_all_read(&mut self) -> Vec<Uuid> {
        self.items
            .iter_mut()
            .filter(|n| !n.read)
            .map(|n| {
                n.read = true;
                n.id
            })
            .collect()
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Notification> {
        let index = self.items.iter().position(|n| n.id == id)?;
        Some(self.items.remove(index))
    }

    /// Put a notification back in its place, e.g. after a failed delete.
    pub fn restore(&mut self, notification: Notification) {
        if self.contains(notification.id) {
            return;
        }
        let index = self
            .items
            .iter()
            .position(|n| n.created_at < notification.created_at)
            .unwrap_or(self.items.len());
        self.items.insert(index, notification);
    }

    /// Apply a realtime change.
    pub fn apply(&mut self, change: Change<Notification>) {
        match change.kind {
            ChangeKind::Insert => {
                if let Some(record) = change.record {
                    self.remove(record.id);
                    self.items.insert(0, record);
                }
            }
            ChangeKind::Update => {
                if let Some(record) = change.record {
                    match self.items.iter_mut().find(|n| n.id == record.id) {
                        Some(existing) => *existing = record,
                        None => self.restore(record),
                    }
                }
            }
            ChangeKind::Delete => {
                let id = change.old_id().or(change.record.map(|r| r.id));
                if let Some(id) = id {
                    self.remove(id);
                }
            }
            ChangeKind::All => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn notification(n: u128, minute: u32, read: bool) -> Notification {
        Notification {
            id: Uuid::from_u128(n),
            kind: NotificationKind::Follow,
            message: format!("n{n}"),
            read,
            sender_id: None,
            recipient_id: Uuid::from_u128(99),
            event_id: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    fn ids(list: &NotificationList) -> Vec<u128> {
        list.items().iter().map(|n| n.id.as_u128()).collect()
    }

    #[test]
    fn test_new_sorts_newest_first_and_dedupes() {
        let list = NotificationList::new(vec![
            notification(1, 1, false),
            notification(2, 5, true),
            notification(1, 1, false),
            notification(3, 3, false),
        ]);
        assert_eq!(ids(&list), vec![2, 3, 1]);
        assert_eq!(list.unread_count(), 2);
    }

    #[test]
    fn test_mark_read_and_all_read() {
        let mut list = NotificationList::new(vec![notification(1, 1, false), notification(2, 2, false)]);
        assert!(list.mark_read(Uuid::from_u128(1)));
        assert!(!list.mark_read(Uuid::from_u128(1)));
        assert_eq!(list.unread_count(), 1);

        let changed = list.mark_all_read();
        assert_eq!(changed, vec![Uuid::from_u128(2)]);
        assert_eq!(list.unread_count(), 0);

        for id in changed {
            list.set_read(id, false);
        }
        assert_eq!(list.unread_count(), 1);
    }

    #[test]
    fn test_remove_and_restore_keep_order() {
        let mut list = NotificationList::new(vec![
            notification(1, 1, false),
            notification(2, 2, false),
            notification(3, 3, false),
        ]);
        let removed = list.remove(Uuid::from_u128(2)).unwrap();
        assert_eq!(ids(&list), vec![3, 1]);
        list.restore(removed);
        assert_eq!(ids(&list), vec![3, 2, 1]);
    }

    #[test]
    fn test_apply_insert_prepends_without_duplicates() {
        let mut list = NotificationList::new(vec![notification(1, 1, false)]);
        let change = Change {
            kind: ChangeKind::Insert,
            record: Some(notification(2, 9, false)),
            old_record: None,
        };
        list.apply(change.clone());
        list.apply(change);
        assert_eq!(ids(&list), vec![2, 1]);
        assert_eq!(list.unread_count(), 2);
    }

    #[test]
    fn test_apply_update_and_delete() {
        let mut list = NotificationList::new(vec![notification(1, 1, false), notification(2, 2, false)]);
        list.apply(Change {
            kind: ChangeKind::Update,
            record: Some(notification(1, 1, true)),
            old_record: None,
        });
        assert_eq!(list.unread_count(), 1);

        list.apply(Change {
            kind: ChangeKind::Delete,
            record: None,
            old_record: Some(json!({ "id": Uuid::from_u128(2).to_string() })),
        });
        assert_eq!(ids(&list), vec![1]);
    }

    #[test]
    fn test_unknown_kind_is_system() {
        let kind: NotificationKind = serde_json::from_value(json!("promo")).unwrap();
        assert_eq!(kind, NotificationKind::System);
        let kind: NotificationKind = serde_json::from_value(json!("like")).unwrap();
        assert_eq!(kind, NotificationKind::Like);
    }
}
