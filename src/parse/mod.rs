pub mod project_parser;
pub mod task_parser;
pub mod task_serializer;

pub use project_parser::{parse_project, split_front_matter};
pub use task_parser::{parse_date, parse_task_line, parse_tasks, task_text};
pub use task_serializer::{format_task, rewrite_dates, rewrite_status, rewrite_task};
