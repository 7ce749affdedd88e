pub mod aggregates;
pub mod grouping;
pub mod plot_configs;
pub mod record;
pub mod scene;

pub use aggregates::*;
pub use grouping::*;
pub use plot_configs::*;
pub use record::*;
pub use scene::*;
