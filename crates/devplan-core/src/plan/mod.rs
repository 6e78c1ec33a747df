//! Plan management: model, JSON extraction, numbering, prompts, generation.

pub mod extract;
pub mod model;
pub mod numbering;
pub mod prompts;
pub mod schema;
pub mod service;

pub use extract::{PlanParseError, extract_json, parse_and_validate, parse_plan_file};
pub use model::{Plan, Task};
pub use numbering::{DanglingDependency, dangling_dependencies, flatten, renumber, task_count};
pub use prompts::{build_plan_prompt, build_task_prompt};
pub use schema::{plan_schema, plan_schema_pretty};
pub use service::{
    DEFAULT_PROMPT_DELAY, PlanStats, PromptSummary, generate_plan, plan_stats,
    populate_task_prompts,
};
