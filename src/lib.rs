//! linked_views: selection and aggregation core for linked-view dashboards

pub mod aggregation;
pub mod dashboard;
pub mod data_types;
pub mod layout;
#[cfg(feature = "polars")]
pub mod polars_source;
pub mod record_store;
pub mod rendering;
pub mod scales;
pub mod selection;
pub mod theme;
pub mod widgets;

pub use dashboard::{Dashboard, SharedDashboard};
pub use data_types::{Aggregation, Field, Grouping, GroupingField, Record, RecordId, Scene};
pub use record_store::RecordStore;
pub use selection::{ChannelConstraint, ChannelName, SelectionState, SelectionUpdate};
pub use widgets::{BrushRegion, LinkedView};
