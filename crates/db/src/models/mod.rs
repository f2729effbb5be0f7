pub mod alert;
pub mod alert_event;
