//! Notifications: the policy deciding when to alert, the host capability
//! that displays alerts, the alert sinks fed by the pipeline and the
//! user-facing on/off switch.

mod alerts;
mod host;
mod labels;
mod policy;
mod settings;

pub use alerts::{build_alert_sinks, AlertSink, HostAlertSink, NdjsonAlertSink, StdoutAlertSink};
pub use host::{
    request_permission, ConsoleHost, NotificationHandle, NotificationHost, PERMISSION_KEY,
};
pub use labels::DisplayLabels;
pub use policy::{
    alert_tag, should_notify, toast_for, Alert, NotificationPolicy, PermissionState, Toast,
    ToastKind, ALERT_AUTO_DISMISS, DEFAULT_ALERT_TITLE, DEFAULT_MAX_FIELDS, GENERIC_ALERT_BODY,
    TOAST_AUTO_DISMISS,
};
pub use settings::{
    notification_status, test_alert, NotificationSettings, NotificationStatus,
    TEST_NOTIFICATION_BODY, TEST_NOTIFICATION_DISMISS, TEST_NOTIFICATION_TITLE,
};
