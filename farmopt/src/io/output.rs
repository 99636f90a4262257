use crate::config::OptConfig;
use crate::io::ext_repr::{ExtInstance, ExtSolution};
use farmlayout::grad_check::GradientReport;
use farmlayout::problem::IterationRecord;
use serde::Serialize;

#[derive(Serialize, Clone)]
pub struct Output {
    #[serde(flatten)]
    pub instance: ExtInstance,
    pub solution: ExtSolution,
    pub config: OptConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_check: Option<GradientReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<IterationRecord>,
}
