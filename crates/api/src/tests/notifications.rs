// Copyright (C) 2026 The Agrisure Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dto::NotificationDto;
use crate::error::ApiError;
use crate::notifications;
use crate::tests::{T0, T1, admin, principal, store};

#[test]
fn callers_see_only_their_own() {
    let store = store();
    let actor = admin(&store);
    let other = principal(&store, "manager@coop.test", "MANAGER");
    let actor_id: i64 = actor.user.user_id.unwrap();
    let other_id: i64 = other.user.user_id.unwrap();
    store
        .insert_notification(actor_id, "Policy written", "Policy POL-1 was issued")
        .unwrap();
    store
        .insert_notification(other_id, "Claim approved", "Claim CLM-1 was approved")
        .unwrap();

    let mine = notifications::list(&store, &actor).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Policy written");
}

#[test]
fn mark_read_is_idempotent_and_owned() {
    let store = store();
    let actor = admin(&store);
    let other = principal(&store, "manager@coop.test", "MANAGER");
    let actor_id: i64 = actor.user.user_id.unwrap();
    let notification_id: i64 = store
        .insert_notification(actor_id, "Policy written", "Policy POL-2 was issued")
        .unwrap();

    let read: NotificationDto =
        notifications::mark_read(&store, &actor, notification_id, T0).unwrap();
    assert!(read.is_read);
    let first_read_at = read.read_at.clone();

    // Re-marking later keeps the original read timestamp.
    let again: NotificationDto =
        notifications::mark_read(&store, &actor, notification_id, T1).unwrap();
    assert_eq!(again.read_at, first_read_at);

    let err = notifications::mark_read(&store, &other, notification_id, T1).unwrap_err();
    assert_eq!(
        err,
        ApiError::NotFound(format!("Notification {notification_id}"))
    );
}

#[test]
fn mark_all_counts_only_unread() {
    let store = store();
    let actor = admin(&store);
    let actor_id: i64 = actor.user.user_id.unwrap();
    let first: i64 = store
        .insert_notification(actor_id, "Policy written", "Policy POL-3 was issued")
        .unwrap();
    store
        .insert_notification(actor_id, "Claim approved", "Claim CLM-2 was approved")
        .unwrap();
    notifications::mark_read(&store, &actor, first, T0).unwrap();

    let flipped: usize = notifications::mark_all_read(&store, &actor, T1).unwrap();
    assert_eq!(flipped, 1);
    assert_eq!(notifications::mark_all_read(&store, &actor, T1).unwrap(), 0);
}
