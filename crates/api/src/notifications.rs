// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification handlers.
//!
//! Notifications are personal: every handler operates on the caller's own
//! rows, and the resource permission gates the surface as a whole.

use agrisure::authorize;
use agrisure_domain::{Action, Notification, Resource};
use agrisure_persistence::Store;
use time::OffsetDateTime;

use crate::auth::Principal;
use crate::dto::NotificationDto;
use crate::error::ApiError;

fn principal_id(principal: &Principal) -> Result<i64, ApiError> {
    principal
        .user
        .user_id
        .ok_or_else(|| ApiError::Internal("principal without id".to_string()))
}

/// Lists the caller's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn list(store: &Store, principal: &Principal) -> Result<Vec<NotificationDto>, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Notifications,
        Action::Read,
    )?;
    let notifications: Vec<Notification> = store.list_notifications(principal_id(principal)?)?;
    Ok(notifications.iter().map(NotificationDto::from).collect())
}

/// Marks one of the caller's notifications as read. Idempotent: re-marking
/// an already-read notification changes nothing.
///
/// # Errors
///
/// Returns an error if the caller is not permitted or the notification does
/// not exist or belongs to someone else.
pub fn mark_read(
    store: &Store,
    principal: &Principal,
    notification_id: i64,
    now: OffsetDateTime,
) -> Result<NotificationDto, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Notifications,
        Action::Update,
    )?;
    let user_id: i64 = principal_id(principal)?;

    let notification: Notification = store
        .notification_by_id(notification_id)?
        .filter(|n| n.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound(format!("Notification {notification_id}")))?;

    if !notification.is_read {
        store.mark_notification_read(notification_id, now)?;
    }

    let fresh: Notification = store
        .notification_by_id(notification_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Notification {notification_id}")))?;
    Ok(NotificationDto::from(&fresh))
}

/// Marks all of the caller's unread notifications as read, returning how
/// many were flipped.
///
/// # Errors
///
/// Returns an error if the caller is not permitted.
pub fn mark_all_read(
    store: &Store,
    principal: &Principal,
    now: OffsetDateTime,
) -> Result<usize, ApiError> {
    authorize(
        Some(&principal.user),
        principal.role.as_ref(),
        Resource::Notifications,
        Action::Update,
    )?;
    Ok(store.mark_all_notifications_read(principal_id(principal)?, now)?)
}
