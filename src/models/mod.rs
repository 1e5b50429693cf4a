pub mod listing;
pub mod settings;
pub mod subscription;
pub mod task;

pub use listing::*;
pub use settings::*;
pub use subscription::*;
pub use task::*;
