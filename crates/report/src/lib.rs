pub mod calls;
pub mod error;
pub mod group;
pub mod html;
pub mod stats;
pub mod text;

pub use calls::{extract_extension, read_calls, CallRecord};
pub use error::ReportError;
pub use group::{group_by_customer, write_grouped, GroupedReport};
pub use html::{format_seconds, render_html};
pub use stats::{
    compute, idle_periods, partition, rank_of, summarize_agents, AgentSummary, Bucket,
    ExtensionStats, IdlePeriod,
};
pub use text::render_text;
