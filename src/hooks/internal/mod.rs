//! Internal helpers shared by the hooks

mod watch_bridge;

pub(crate) use watch_bridge::use_watch_signal;
