//! Page rendering - block dispatch and display descriptors

pub mod descriptor;
pub mod dispatch;

pub use descriptor::{
    BlockOutput, DataViewOutput, DetailField, DetailPanelOutput, EmptyStateOutput,
    NotFoundOutput, QueryBarOutput, RenderedPage, StatOutput, StatSummaryOutput, StatValue,
};
pub use dispatch::{render, render_block, render_config, render_page};
