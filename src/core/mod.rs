pub mod analysis;
pub mod engine;
pub mod frame;
pub mod stats;

pub use crate::domain::model::{
    ChartJob, ChartKind, ColumnInfo, Computation, Computed, DType, Outcome,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use frame::{Column, Frame};
