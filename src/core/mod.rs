mod engine;
mod error;
mod types;
mod views;

pub use engine::{
    parse_years, project, project_salary, schedule_compensation_payout, summarize,
    validate_parameters,
};
pub use error::{ProjectionError, ProjectionResult};
pub use types::{
    CompareTarget, ComparisonView, Compensation, CompensationRows, LabeledSeries, LongPoint,
    Parameters, PayoutSchedule, ProjectionSummary, ProjectionTable, SeriesKind, ViewMode,
};
pub use views::{
    build_comparison_and_difference, cumulative, cumulative_table, difference, select_view,
    to_long_format,
};
