//! Console tables for calibration reports.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};
use strum::IntoEnumIterator;

use crate::ability::{AbilityVector, Attribute};
use crate::outcome::OutcomeDistribution;
use crate::player::TargetStats;
use crate::stats::{RateStats, Stat};

pub fn tabulate_abilities(anchor: &AbilityVector, calibrated: &AbilityVector) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "Attribute".into(),
                "Anchor".into(),
                "Calibrated".into(),
                "Change".into(),
            ],
        ));
    for attribute in Attribute::iter() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{attribute}").into(),
                format!("{:.2}", anchor[attribute]).into(),
                format!("{:.2}", calibrated[attribute]).into(),
                format!("{:+.2}", calibrated[attribute] - anchor[attribute]).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_distribution(distribution: &OutcomeDistribution) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["Outcome".into(), "Probability".into()],
        ));
    for (outcome, probability) in distribution.iter() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{outcome}").into(),
                format!("{probability:.6}").into(),
            ],
        ));
    }
    table
}

/// Sets the observed ratios beside the simulated ones, with the relative error of each.
pub fn tabulate_stats(target: &TargetStats, simulated: &RateStats) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "Stat".into(),
                "Target".into(),
                "Simulated".into(),
                "Error".into(),
            ],
        ));
    for stat in Stat::iter() {
        let (expected, actual) = (target.ratios[stat], simulated.ratios[stat]);
        let error = if expected.is_finite() && expected != 0.0 {
            format!("{:+.2}%", (actual - expected) / expected * 100.0)
        } else {
            "-".to_string()
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{stat}").into(),
                format!("{expected:.3}").into(),
                format!("{actual:.3}").into(),
                error.into(),
            ],
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::outcome_probabilities;
    use crate::outcome::OutcomeCounts;
    use crate::stats::{BoxScore, StatsAggregator};
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    #[test]
    fn renders_stats_side_by_side() {
        let counts = OutcomeCounts::from([30, 151, 45, 85, 10, 679]);
        let target = TargetStats::from_counts(counts.clone());
        let simulated = BoxScore.aggregate(&counts, 1_000);
        let rendered = Console::default().render(&tabulate_stats(&target, &simulated));
        assert!(rendered.contains("OBP"), "{rendered}");
        assert!(rendered.contains("+0.00%"), "{rendered}");
    }

    #[test]
    fn renders_every_outcome() {
        let distribution = outcome_probabilities(&AbilityVector::baseline(), 0.01);
        let rendered = Console::default().render(&tabulate_distribution(&distribution));
        for abbreviation in ["HR", "1B", "2B", "BB", "HBP", "OUT"] {
            assert!(rendered.contains(abbreviation), "{rendered}");
        }
    }

    #[test]
    fn renders_ability_changes() {
        let rendered = Console::default().render(&tabulate_abilities(
            &AbilityVector::baseline(),
            &AbilityVector::new(80.0, 65.5, 70.0),
        ));
        assert!(rendered.contains("+10.00"), "{rendered}");
        assert!(rendered.contains("-4.50"), "{rendered}");
    }
}
