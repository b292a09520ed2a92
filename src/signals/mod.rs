pub mod activity;
pub mod snapshot;
pub mod tabs;

pub use activity::RawActivity;
pub use snapshot::{build_snapshot, SignalSnapshot};
pub use tabs::{TabStats, TabStatsPatch, TabTracker};
