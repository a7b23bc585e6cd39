use crate::models::Goal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total_weight: u32,
    pub done_weight: u32,
    pub percent: u32,
}

impl Progress {
    /// Weighted completion of a day's goals, truncated to a whole percent.
    pub fn from_goals(goals: &[Goal]) -> Self {
        let total_weight: u32 = goals.iter().map(|goal| goal.weight).sum();
        let done_weight: u32 = goals
            .iter()
            .filter(|goal| goal.is_done)
            .map(|goal| goal.weight)
            .sum();

        let percent = if total_weight == 0 {
            0
        } else {
            (u64::from(done_weight) * 100 / u64::from(total_weight)) as u32
        };

        Self {
            total_weight,
            done_weight,
            percent,
        }
    }
}
