//! Text input and report output.

mod parser;
pub mod report;

pub use parser::{load_problem, parse_graph, parse_table, GraphInput};
pub use report::{format_list_schedule, format_schedule, format_slack, to_dot, write_reports};
