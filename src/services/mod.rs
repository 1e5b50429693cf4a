pub mod cleaner;
pub mod codes;
pub mod flow;
pub mod importer;
pub mod merge;
pub mod monitor;
pub mod poster;

pub use cleaner::Cleaner;
pub use codes::CodeService;
pub use flow::{FlowState, FlowTracker};
pub use importer::Importer;
pub use merge::merge;
pub use monitor::{assess, MonitorHandle, MonitorSnapshot, SubscriptionService};
pub use poster::PostRunner;
