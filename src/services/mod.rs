pub mod dashboard;
pub mod error;
pub mod notifier;
pub mod share_actions;
