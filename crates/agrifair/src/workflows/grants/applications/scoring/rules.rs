use super::config::ScoringConfig;
use super::{ApplicantFacts, FactorBreakdown};

/// Compute the four 0-10 sub-scores and one reasoning sentence per factor.
pub(crate) fn score_facts(
    facts: &ApplicantFacts,
    config: &ScoringConfig,
) -> (FactorBreakdown, Vec<String>) {
    let mut reasoning = Vec::with_capacity(4);

    let income_score = if facts.monthly_income_rs < config.income_brackets_rs[0] {
        reasoning.push("Low income - highest priority for support".to_string());
        10
    } else if facts.monthly_income_rs < config.income_brackets_rs[1] {
        reasoning.push("Moderate income - good candidate for support".to_string());
        7
    } else if facts.monthly_income_rs < config.income_brackets_rs[2] {
        reasoning.push("Higher income - moderate priority".to_string());
        4
    } else {
        reasoning.push("High income - lower priority".to_string());
        2
    };

    let land_score = if facts.land_size_bigha < config.land_brackets_bigha[0] {
        reasoning.push("Small land holding - needs support for expansion".to_string());
        10
    } else if facts.land_size_bigha < config.land_brackets_bigha[1] {
        reasoning.push("Medium land holding - good for targeted support".to_string());
        7
    } else if facts.land_size_bigha < config.land_brackets_bigha[2] {
        reasoning.push("Large land holding - moderate priority".to_string());
        4
    } else {
        reasoning.push("Very large land holding - lower priority".to_string());
        2
    };

    let grants_score = match facts.previous_grants {
        0 => {
            reasoning.push("No previous grants - first-time beneficiary priority".to_string());
            10
        }
        1 => {
            reasoning.push("One previous grant - moderate priority".to_string());
            6
        }
        2 => {
            reasoning.push("Multiple previous grants - lower priority".to_string());
            3
        }
        _ => {
            reasoning.push("Many previous grants - lowest priority".to_string());
            1
        }
    };

    let [first_staple, second_staple] = &config.staple_crops;
    let crops = facts.crop_details.trim();
    let has_first = crops.contains(first_staple.as_str());
    let has_second = crops.contains(second_staple.as_str());
    let crop_score = if has_first && has_second {
        reasoning.push("Multiple staple crops - good farming diversity".to_string());
        7
    } else if has_first || has_second {
        reasoning.push("Single major crop - moderate farming practice".to_string());
        6
    } else if !crops.is_empty() {
        reasoning.push("Other crops - needs assessment".to_string());
        5
    } else {
        reasoning.push("No specific crops listed - may need support for crop planning".to_string());
        8
    };

    let breakdown = FactorBreakdown {
        income_score,
        land_score,
        grants_score,
        crop_score,
    };

    (breakdown, reasoning)
}
