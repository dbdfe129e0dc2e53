//! Layout hints derived from flow type and complexity.

use crate::analyze::types::{Complexity, FlowType};
use crate::ir::types::{Direction, LayoutConfig};

/// Scores above this get the widest spacing.
const HIGH_COMPLEXITY_SCORE: u8 = 7;

pub fn determine_layout_config(flow_type: FlowType, complexity: &Complexity) -> LayoutConfig {
    let mut config = LayoutConfig::default();

    match flow_type {
        FlowType::Sequential => {
            config.direction = Direction::TB;
            config.spacing.rank = 120.0;
        }
        FlowType::Parallel => {
            config.direction = Direction::LR;
            config.spacing.node = [200.0, 80.0];
        }
        FlowType::Conditional => {
            config.spacing.node = [180.0, 120.0];
        }
        FlowType::Iterative | FlowType::Simple => {}
    }

    // Applied last so it can overwrite the flow-type spacing.
    if complexity.score > HIGH_COMPLEXITY_SCORE {
        config.spacing.node = [200.0, 150.0];
        config.spacing.rank = 180.0;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complexity(score: u8) -> Complexity {
        Complexity {
            score,
            ..Complexity::baseline()
        }
    }

    #[test]
    fn parallel_flows_run_left_to_right() {
        let config = determine_layout_config(FlowType::Parallel, &complexity(2));
        assert_eq!(config.direction, Direction::LR);
        assert_eq!(config.spacing.node, [200.0, 80.0]);
        assert_eq!(config.spacing.rank, 150.0);
    }

    #[test]
    fn sequential_tightens_rank_spacing() {
        let config = determine_layout_config(FlowType::Sequential, &complexity(1));
        assert_eq!(config.direction, Direction::TB);
        assert_eq!(config.spacing.rank, 120.0);
    }

    #[test]
    fn high_complexity_overrides_flow_spacing() {
        let config = determine_layout_config(FlowType::Conditional, &complexity(8));
        assert_eq!(config.spacing.node, [200.0, 150.0]);
        assert_eq!(config.spacing.rank, 180.0);

        let config = determine_layout_config(FlowType::Conditional, &complexity(7));
        assert_eq!(config.spacing.node, [180.0, 120.0]);
    }
}
