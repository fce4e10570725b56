// SPDX-License-Identifier: MPL-2.0
//! User-facing notifications.
//!
//! Notifications carry a message key plus arguments; resolving the key to
//! display text is left to the presenter. Warnings and errors are mirrored
//! into the diagnostics journal when a handle is installed.

mod manager;
mod notification;

pub use manager::{Manager, LOAD_STAGE, MAX_VISIBLE, STAGE_ARG};
pub use notification::{Notification, NotificationId, Severity};
