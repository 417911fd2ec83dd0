use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    points: f64,
    weight: f64,
}

impl Tally {
    fn percentage(self) -> Option<u8> {
        if self.weight > 0.0 {
            let pct = ((self.points / self.weight) * 100.0).round();
            Some(pct.clamp(0.0, 100.0) as u8)
        } else {
            None
        }
    }
}

/// Running category and skill totals for scored questions.
#[derive(Debug, Default)]
pub(crate) struct BreakdownAccumulator {
    categories: BTreeMap<String, Tally>,
    skills: BTreeMap<String, Tally>,
}

impl BreakdownAccumulator {
    pub(crate) fn record(&mut self, category: &str, skill: &str, points: f64, weight: f64) {
        let category = self.categories.entry(category.to_string()).or_default();
        category.points += points;
        category.weight += weight;

        let skill = self.skills.entry(skill.to_string()).or_default();
        skill.points += points;
        skill.weight += weight;
    }

    /// Labels without achievable weight are left out rather than reported as 0%.
    pub(crate) fn category_percentages(&self) -> BTreeMap<String, u8> {
        percentages(&self.categories)
    }

    pub(crate) fn skill_percentages(&self) -> BTreeMap<String, u8> {
        percentages(&self.skills)
    }
}

fn percentages(tallies: &BTreeMap<String, Tally>) -> BTreeMap<String, u8> {
    tallies
        .iter()
        .filter_map(|(label, tally)| tally.percentage().map(|pct| (label.clone(), pct)))
        .collect()
}
