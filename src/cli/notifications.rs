//! CLI handler for the `notifications` subcommand.

use super::setup::open_store;
use crate::config::AppConfig;
use crate::notify::{ConsoleHost, NotificationSettings, PermissionState};
use anyhow::Result;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Print the current status
    Status,
    /// Flip the on/off switch
    Toggle,
    /// Show the test notification
    Test,
    /// Record a host permission decision
    Permission(PermissionState),
}

pub fn run_notifications(config: &AppConfig, action: NotificationAction) -> Result<()> {
    let store = open_store(config)?;
    let mut host = ConsoleHost::new(Arc::clone(&store));

    if let NotificationAction::Permission(state) = action {
        host.set_permission(state)?;
    }

    let mut settings = NotificationSettings::new(&mut host, &store);
    let status = match action {
        NotificationAction::Toggle => settings.toggle()?,
        NotificationAction::Test => {
            if settings.send_test()?.is_none() {
                eprintln!("Test notification not sent: permission not granted");
            }
            settings.status()
        }
        NotificationAction::Status | NotificationAction::Permission(_) => settings.status(),
    };

    println!("Notifications: {status}");
    Ok(())
}
