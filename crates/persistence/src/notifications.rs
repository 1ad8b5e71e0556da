// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification persistence.

use agrisure_domain::Notification;
use rusqlite::{OptionalExtension, params};
use time::OffsetDateTime;
use tracing::debug;

use crate::Store;
use crate::error::PersistenceError;
use crate::records::{NotificationRow, format_timestamp};

const NOTIFICATION_COLUMNS: &str = "notification_id, user_id, title, body, is_read, read_at";

fn map_notification_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRow> {
    Ok(NotificationRow {
        notification_id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        is_read: row.get::<_, i64>(4)? != 0,
        read_at: row.get(5)?,
    })
}

impl Store {
    /// Creates an unread notification for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub fn insert_notification(
        &self,
        user_id: i64,
        title: &str,
        body: &str,
    ) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO notifications (user_id, title, body) VALUES (?1, ?2, ?3)",
            params![user_id, title, body],
        )?;
        let notification_id: i64 = self.conn.last_insert_rowid();
        debug!(notification_id, user_id, "Created notification");
        Ok(notification_id)
    }

    /// Retrieves a notification by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn notification_by_id(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>, PersistenceError> {
        let row: Option<NotificationRow> = self
            .conn
            .query_row(
                &format!(
                    "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE notification_id = ?1"
                ),
                params![notification_id],
                map_notification_row,
            )
            .optional()?;
        row.map(NotificationRow::into_domain).transpose()
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_notifications(&self, user_id: i64) -> Result<Vec<Notification>, PersistenceError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications
             WHERE user_id = ?1
             ORDER BY notification_id DESC"
        ))?;
        let rows = stmt.query_map(params![user_id], map_notification_row)?;

        let mut notifications: Vec<Notification> = Vec::new();
        for row in rows {
            notifications.push(row?.into_domain()?);
        }
        Ok(notifications)
    }

    /// Marks one notification as read.
    ///
    /// Idempotent: an already-read notification is skipped by the filter, so
    /// `read_at` is never overwritten. Returns whether this call flipped the
    /// flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_notification_read(
        &self,
        notification_id: i64,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        let read_at: String = format_timestamp(now)?;
        let affected: usize = self.conn.execute(
            "UPDATE notifications
             SET is_read = 1, read_at = ?2
             WHERE notification_id = ?1 AND is_read = 0",
            params![notification_id, read_at],
        )?;
        Ok(affected == 1)
    }

    /// Marks all of a user's unread notifications as read, returning the
    /// count flipped by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_all_notifications_read(
        &self,
        user_id: i64,
        now: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        let read_at: String = format_timestamp(now)?;
        let affected: usize = self.conn.execute(
            "UPDATE notifications
             SET is_read = 1, read_at = ?2
             WHERE user_id = ?1 AND is_read = 0",
            params![user_id, read_at],
        )?;
        debug!(user_id, affected, "Marked notifications read");
        Ok(affected)
    }
}
