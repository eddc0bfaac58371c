use crate::models::OutcomeSummary;
use crate::set::OutcomeSet;

pub fn run(set: &OutcomeSet) -> Vec<OutcomeSummary> {
    set.iter().map(|outcome| outcome.summary()).collect()
}
