//! Schema system - page configuration model, validation, and producers

pub mod page;
pub mod producer;
pub mod validator;

pub use page::{
    Block, BlockType, DataViewConfig, DetailPanelConfig, EmptyStateConfig, FieldRole, Filter,
    FilterOp, FilterValue, PageConfig, QueryBarConfig, SortDirection, SortSpec, Stat, StatOp,
    StatSummaryConfig, Template, ViewMode,
};
pub use producer::{generate_page_config, ConfigProducer, GenerationError, ProducerError, ProducerInstructions};
pub use validator::{
    check_references, validate, validate_structure, ValidationError, ValidationErrors, Validator,
};
