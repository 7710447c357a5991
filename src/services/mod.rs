pub mod calendar_sync;
pub mod google;
pub mod notifier;
pub mod scheduler;
