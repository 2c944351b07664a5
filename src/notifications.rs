//! Toast notifications stacked in the page's fixed container.

use crate::page::{NodeId, NotificationNode};
use crate::runtime::{Host, Task};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// CSS custom property used for the banner's left border.
    pub fn accent_var(self) -> &'static str {
        match self {
            Self::Error => "--accent-color",
            Self::Success => "--success-color",
            Self::Warning => "--warning-color",
            Self::Info => "--secondary-color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeTask {
    AutoDismiss(NodeId),
    Remove(NodeId),
}

pub fn ensure_container(host: &mut Host<'_>) {
    if host.page.notifications.is_none() {
        debug!("creating notification container");
        host.page.notifications = Some(Vec::new());
    }
}

/// Appends a banner and arms its auto-dismiss timer. `exit` is the length of
/// the slide-out before the node leaves the page. Returns `None` when the page
/// has no notification container.
pub fn show(
    host: &mut Host<'_>,
    message: impl Into<String>,
    kind: NotificationKind,
    duration: Duration,
    exit: Duration,
) -> Option<NodeId> {
    host.page.notifications.as_ref()?;

    let id = host.page.allocate_node();
    let timer = host
        .scheduler
        .schedule(duration, Task::Notice(NoticeTask::AutoDismiss(id)));
    let node = NotificationNode {
        id,
        message: message.into(),
        kind,
        leaving: false,
        auto_dismiss: Some(timer),
        exit,
    };
    host.page.notifications.as_mut()?.push(node);
    Some(id)
}

/// User click on a banner: drops the pending auto-dismiss and starts the exit.
pub fn dismiss(host: &mut Host<'_>, id: NodeId) -> bool {
    let timer = host
        .page
        .notification_mut(id)
        .and_then(|node| node.auto_dismiss.take());
    if let Some(timer) = timer {
        host.scheduler.cancel(timer);
    }
    begin_exit(host, id)
}

/// Starts the exit animation once; later calls for the same node are no-ops.
pub fn begin_exit(host: &mut Host<'_>, id: NodeId) -> bool {
    let Some(node) = host.page.notification_mut(id) else {
        return false;
    };
    if node.leaving {
        return false;
    }
    node.leaving = true;
    node.auto_dismiss = None;
    let exit = node.exit;
    host.scheduler
        .schedule(exit, Task::Notice(NoticeTask::Remove(id)));
    true
}

fn remove(host: &mut Host<'_>, id: NodeId) -> bool {
    let Some(stack) = host.page.notifications.as_mut() else {
        return false;
    };
    let before = stack.len();
    stack.retain(|node| node.id != id);
    stack.len() != before
}

pub fn handle(host: &mut Host<'_>, task: NoticeTask) {
    match task {
        NoticeTask::AutoDismiss(id) => {
            if let Some(node) = host.page.notification_mut(id) {
                node.auto_dismiss = None;
            }
            begin_exit(host, id);
        }
        NoticeTask::Remove(id) => {
            if remove(host, id) {
                debug!(node = id.0, "notification removed");
            }
        }
    }
}
