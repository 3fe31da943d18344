//! Aggregation of an owner's observations into a [`StatsReport`].
//!
//! Every metric is computed independently from the same unordered input:
//!
//! | Field | Rule |
//! |-------|------|
//! | `total_observations` | number of records |
//! | `unique_species` / `unique_families` | distinct codes |
//! | `average_time_between_observations` | mean gap between chronologically adjacent records |
//! | `most_observed_species` | largest species group, ties to the smallest species code |
//! | `most_observed_family` | species breakdown of the first family to reach the highest count |
//!
//! The breakdown is ordered by latest observation (newest first), then by
//! species code.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use birdwatch_types::{ObservationRecord, SpeciesStats, StatsReport};
use chrono::{NaiveDateTime, TimeDelta};

use crate::duration::format_duration;

/// Running count and last-seen time for one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesTally<'a> {
    /// Family of the first record seen for this species.
    pub family_code: &'a str,
    /// Number of records folded in so far.
    pub count: u32,
    /// Most recent timestamp folded in so far.
    pub latest: NaiveDateTime,
}

impl<'a> SpeciesTally<'a> {
    /// Start a tally from the first record of a species.
    pub fn first(record: &'a ObservationRecord) -> Self {
        Self {
            family_code: &record.family_code,
            count: 1,
            latest: record.timestamp,
        }
    }

    /// Fold another sighting into the tally.
    pub fn observe(&mut self, timestamp: NaiveDateTime) {
        self.count = self.count.saturating_add(1);
        if timestamp > self.latest {
            self.latest = timestamp;
        }
    }

    /// Convert into the client-facing summary for `species_code`.
    pub fn into_stats(self, species_code: &str) -> SpeciesStats {
        SpeciesStats {
            species_code: species_code.to_owned(),
            family_code: self.family_code.to_owned(),
            number_observations: self.count,
            latest_observation: self.latest,
        }
    }
}

/// Compute the full statistics report for one owner's observations.
pub fn aggregate(observations: &[ObservationRecord]) -> StatsReport {
    let report = StatsReport {
        total_observations: saturating_u32(observations.len()),
        unique_species: count_distinct(observations, |o| &o.species_code),
        unique_families: count_distinct(observations, |o| &o.family_code),
        average_time_between_observations: format_duration(average_gap(observations)),
        most_observed_species: most_observed_species(observations),
        most_observed_family: most_observed_family(observations),
    };

    tracing::debug!(
        total = report.total_observations,
        unique_species = report.unique_species,
        unique_families = report.unique_families,
        "Aggregated observation statistics"
    );

    report
}

/// Mean time between chronologically adjacent observations.
///
/// Zero for fewer than two observations. The mean is truncated to whole
/// seconds.
pub fn average_gap(observations: &[ObservationRecord]) -> TimeDelta {
    let Some(gaps) = observations.len().checked_sub(1).filter(|&n| n > 0) else {
        return TimeDelta::zero();
    };

    let mut timestamps: Vec<NaiveDateTime> = observations.iter().map(|o| o.timestamp).collect();
    timestamps.sort();

    let total = timestamps
        .windows(2)
        .filter_map(|pair| match pair {
            [prev, curr] => Some(curr.signed_duration_since(*prev)),
            _ => None,
        })
        .fold(TimeDelta::zero(), |acc, gap| {
            acc.checked_add(&gap).unwrap_or(acc)
        });

    let gaps = i64::try_from(gaps).unwrap_or(i64::MAX);
    total
        .num_seconds()
        .checked_div(gaps)
        .and_then(TimeDelta::try_seconds)
        .unwrap_or_else(TimeDelta::zero)
}

fn count_distinct<'a, F>(observations: &'a [ObservationRecord], key: F) -> u32
where
    F: Fn(&'a ObservationRecord) -> &'a String,
{
    let distinct: BTreeSet<&String> = observations.iter().map(key).collect();
    saturating_u32(distinct.len())
}

fn most_observed_species(observations: &[ObservationRecord]) -> Option<SpeciesStats> {
    // BTreeMap iterates in species-code order, so a strict `>` keeps the
    // smallest code among equally common species.
    tally_by_species(observations.iter())
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.1.count > best.1.count {
                candidate
            } else {
                best
            }
        })
        .map(|(species, tally)| tally.into_stats(species))
}

fn most_observed_family(observations: &[ObservationRecord]) -> Vec<SpeciesStats> {
    let Some(best_family) = first_family_to_lead(observations) else {
        return Vec::new();
    };

    let mut breakdown: Vec<SpeciesStats> = tally_by_species(
        observations.iter().filter(|o| o.family_code == best_family),
    )
    .into_iter()
    .map(|(species, tally)| tally.into_stats(species))
    .collect();

    breakdown.sort_by(|a, b| {
        b.latest_observation
            .cmp(&a.latest_observation)
            .then_with(|| a.species_code.cmp(&b.species_code))
    });

    breakdown
}

/// The family whose count first climbs strictly above every other count
/// while scanning in input order.
fn first_family_to_lead(observations: &[ObservationRecord]) -> Option<&str> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut best: Option<(&str, u32)> = None;

    for observation in observations {
        let count = counts.entry(observation.family_code.as_str()).or_insert(0);
        *count = count.saturating_add(1);

        if best.is_none_or(|(_, best_count)| *count > best_count) {
            best = Some((observation.family_code.as_str(), *count));
        }
    }

    best.map(|(family, _)| family)
}

fn tally_by_species<'a, I>(observations: I) -> BTreeMap<&'a str, SpeciesTally<'a>>
where
    I: Iterator<Item = &'a ObservationRecord>,
{
    let mut tallies: BTreeMap<&str, SpeciesTally<'_>> = BTreeMap::new();
    for observation in observations {
        tallies
            .entry(observation.species_code.as_str())
            .and_modify(|tally| tally.observe(observation.timestamp))
            .or_insert_with(|| SpeciesTally::first(observation));
    }
    tallies
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use birdwatch_types::ObservationId;
    use chrono::NaiveDate;

    use super::*;

    fn at(seconds: u32) -> NaiveDateTime {
        let base = NaiveDate::from_ymd_opt(2025, 5, 1)
            .and_then(|d| d.and_hms_opt(6, 0, 0))
            .unwrap();
        base.checked_add_signed(TimeDelta::seconds(i64::from(seconds)))
            .unwrap()
    }

    fn obs(species: &str, family: &str, seconds: u32) -> ObservationRecord {
        ObservationRecord {
            id: ObservationId::new(),
            species_code: species.to_owned(),
            family_code: family.to_owned(),
            location: String::from("Kalmthoutse Heide"),
            timestamp: at(seconds),
            notes: String::new(),
        }
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = aggregate(&[]);
        assert_eq!(report.total_observations, 0);
        assert_eq!(report.unique_species, 0);
        assert_eq!(report.unique_families, 0);
        assert_eq!(report.average_time_between_observations, "0 seconds");
        assert!(report.most_observed_species.is_none());
        assert!(report.most_observed_family.is_empty());
    }

    #[test]
    fn single_observation_has_zero_gap() {
        let report = aggregate(&[obs("A", "F1", 500)]);
        assert_eq!(report.total_observations, 1);
        assert_eq!(report.average_time_between_observations, "0 seconds");
        let top = report.most_observed_species.unwrap();
        assert_eq!(top.species_code, "A");
        assert_eq!(top.number_observations, 1);
        assert_eq!(report.most_observed_family.len(), 1);
    }

    #[test]
    fn two_species_scenario() {
        let observations = vec![
            obs("A", "F1", 0),
            obs("B", "F2", 5),
            obs("A", "F1", 10),
            obs("B", "F2", 15),
            obs("A", "F1", 20),
        ];
        let report = aggregate(&observations);

        assert_eq!(report.total_observations, 5);
        assert_eq!(report.unique_species, 2);
        assert_eq!(report.unique_families, 2);
        assert_eq!(report.average_time_between_observations, "5 seconds");

        let top = report.most_observed_species.unwrap();
        assert_eq!(top.species_code, "A");
        assert_eq!(top.family_code, "F1");
        assert_eq!(top.number_observations, 3);
        assert_eq!(top.latest_observation, at(20));

        assert_eq!(report.most_observed_family.len(), 1);
        let entry = &report.most_observed_family[0];
        assert_eq!(entry.species_code, "A");
        assert_eq!(entry.family_code, "F1");
        assert_eq!(entry.number_observations, 3);
    }

    #[test]
    fn average_gap_ignores_input_order() {
        let observations = vec![
            obs("A", "F1", 7_200),
            obs("A", "F1", 0),
            obs("A", "F1", 3_600),
        ];
        assert_eq!(average_gap(&observations), TimeDelta::hours(1));
        assert_eq!(
            aggregate(&observations).average_time_between_observations,
            "1 hour"
        );
    }

    #[test]
    fn average_gap_truncates_to_whole_seconds() {
        let observations = vec![obs("A", "F1", 0), obs("A", "F1", 10), obs("A", "F1", 11)];
        assert_eq!(average_gap(&observations), TimeDelta::seconds(5));
    }

    #[test]
    fn simultaneous_observations_have_zero_gap() {
        let observations = vec![obs("A", "F1", 42), obs("B", "F1", 42)];
        assert_eq!(average_gap(&observations), TimeDelta::zero());
    }

    #[test]
    fn unique_counts_never_exceed_total() {
        let observations = vec![
            obs("A", "F1", 0),
            obs("A", "F1", 1),
            obs("B", "F1", 2),
            obs("C", "F2", 3),
        ];
        let report = aggregate(&observations);
        assert_eq!(report.unique_species, 3);
        assert_eq!(report.unique_families, 2);
        assert!(report.unique_species <= report.total_observations);
        assert!(report.unique_families <= report.total_observations);
    }

    #[test]
    fn species_tie_goes_to_smallest_code() {
        let observations = vec![
            obs("zitter", "F1", 0),
            obs("merel", "F2", 1),
            obs("zitter", "F1", 2),
            obs("merel", "F2", 3),
        ];
        let top = aggregate(&observations).most_observed_species.unwrap();
        assert_eq!(top.species_code, "merel");
        assert_eq!(top.number_observations, 2);
    }

    #[test]
    fn species_keeps_family_of_first_record() {
        let observations = vec![obs("A", "F1", 0), obs("A", "F9", 1)];
        let top = aggregate(&observations).most_observed_species.unwrap();
        assert_eq!(top.family_code, "F1");
        assert_eq!(top.latest_observation, at(1));
    }

    #[test]
    fn family_tie_goes_to_first_family_to_reach_the_count() {
        let observations = vec![
            obs("A", "F1", 0),
            obs("B", "F2", 1),
            obs("A", "F1", 2),
            obs("B", "F2", 3),
        ];
        for _ in 0..5 {
            let breakdown = aggregate(&observations).most_observed_family;
            assert_eq!(breakdown.len(), 1);
            assert_eq!(breakdown[0].family_code, "F1");
        }
    }

    #[test]
    fn family_lead_is_decided_while_scanning() {
        // F2 reaches 2 before F1 does, so F2 wins the tie.
        let observations = vec![
            obs("A", "F1", 0),
            obs("B", "F2", 1),
            obs("C", "F2", 2),
            obs("A", "F1", 3),
        ];
        let breakdown = aggregate(&observations).most_observed_family;
        assert!(breakdown.iter().all(|s| s.family_code == "F2"));
    }

    #[test]
    fn family_breakdown_is_newest_first() {
        let observations = vec![
            obs("A", "F1", 10),
            obs("B", "F1", 30),
            obs("C", "F1", 20),
            obs("A", "F1", 5),
            obs("D", "F2", 40),
        ];
        let breakdown = aggregate(&observations).most_observed_family;
        let order: Vec<&str> = breakdown.iter().map(|s| s.species_code.as_str()).collect();
        assert_eq!(order, ["B", "C", "A"]);
        assert_eq!(breakdown[2].number_observations, 2);
        assert_eq!(breakdown[2].latest_observation, at(10));
    }

    #[test]
    fn family_breakdown_ties_sorted_by_species() {
        let observations = vec![obs("C", "F1", 10), obs("A", "F1", 10), obs("B", "F1", 10)];
        let breakdown = aggregate(&observations).most_observed_family;
        let order: Vec<&str> = breakdown.iter().map(|s| s.species_code.as_str()).collect();
        assert_eq!(order, ["A", "B", "C"]);
    }

    #[test]
    fn report_serializes_with_client_field_names() {
        let report = aggregate(&[obs("A", "F1", 0)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalObservations"], 1);
        assert_eq!(json["uniqueSpecies"], 1);
        assert_eq!(json["uniqueFamilies"], 1);
        assert_eq!(json["averageTimeBetweenObservations"], "0 seconds");
        assert_eq!(json["mostObservedSpecies"]["speciesCode"], "A");
        assert_eq!(json["mostObservedSpecies"]["numberObservations"], 1);
        assert_eq!(json["mostObservedFamily"][0]["familyCode"], "F1");
        assert_eq!(
            json["mostObservedFamily"][0]["latestObservation"],
            "2025-05-01T06:00:00"
        );
    }
}
