//! Greedy token-budget selection.

use crate::domain::{FileAnalysis, FileType, OptimizationStrategy};
use tracing::debug;

/// Share of the raw estimate a file is expected to cost when it has no ceiling.
const UNCAPPED_COST_RATIO: f64 = 0.8;

/// A file paired with the strategy it will be rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub analysis: FileAnalysis,
    pub strategy: OptimizationStrategy,
}

impl PlannedFile {
    pub fn new(analysis: FileAnalysis, strategy: OptimizationStrategy) -> Self {
        Self { analysis, strategy }
    }

    /// Expected rendered size: the strategy ceiling, else 80% of the raw estimate.
    pub fn estimated_cost(&self) -> f64 {
        self.strategy
            .max_tokens
            .map(|max| max as f64)
            .unwrap_or(self.analysis.estimated_tokens as f64 * UNCAPPED_COST_RATIO)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPolicy {
    pub max_tokens: usize,
    pub prioritize_documentation: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetSelection {
    /// Admitted files, priority-descending.
    pub selected: Vec<PlannedFile>,
    /// Rejected files, priority-descending.
    pub excluded: Vec<PlannedFile>,
    /// Running total used for admission decisions.
    pub charged_tokens: f64,
    /// Cost of documentation admitted past the budget; never charged.
    pub forced_tokens: f64,
}

impl BudgetSelection {
    /// Everything admitted, charged or not.
    pub fn total_cost(&self) -> f64 {
        self.charged_tokens + self.forced_tokens
    }
}

#[derive(Debug, Clone)]
pub struct BudgetOptimizer {
    policy: BudgetPolicy,
}

impl BudgetOptimizer {
    pub fn new(policy: BudgetPolicy) -> Self {
        Self { policy }
    }

    /// Admit files greedily in priority order.
    ///
    /// Documentation rejected by the budget is still admitted when the policy
    /// prioritizes it, but its cost is not added to the running total that
    /// later files are compared against.
    pub fn select(&self, mut candidates: Vec<PlannedFile>) -> BudgetSelection {
        // Stable sort keeps input order among equal priorities.
        candidates.sort_by(|a, b| b.analysis.priority.cmp(&a.analysis.priority));

        let budget = self.policy.max_tokens as f64;
        let mut selection = BudgetSelection::default();

        for candidate in candidates {
            let cost = candidate.estimated_cost();
            if selection.charged_tokens + cost <= budget {
                selection.charged_tokens += cost;
                debug!(path = %candidate.analysis.path, cost, "admitted within budget");
                selection.selected.push(candidate);
            } else if self.policy.prioritize_documentation
                && candidate.analysis.file_type == FileType::Documentation
            {
                // TODO: confirm with product whether forced docs should count against later files
                selection.forced_tokens += cost;
                debug!(path = %candidate.analysis.path, cost, "documentation forced past budget");
                selection.selected.push(candidate);
            } else {
                debug!(path = %candidate.analysis.path, cost, "excluded by budget");
                selection.excluded.push(candidate);
            }
        }

        selection
    }
}
