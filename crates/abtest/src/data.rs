//! Loading and summarizing A/B experiment observations.

use crate::error::{AbTestError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Experiment arm an observation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Control,
    Treatment,
}

impl Group {
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Control => "control",
            Group::Treatment => "treatment",
        }
    }
}

/// One row of the experiment log.
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    pub user_id: u32,
    pub timestamp: String,
    pub group: Group,
    pub converted: u8,
}

/// Read observations from a headered CSV file.
///
/// Extra columns are ignored; `converted` must be 0 or 1.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let file = File::open(path).map_err(|_| AbTestError::FileNotFound {
        path: path.display().to_string(),
    })?;
    read_observations(file)
}

/// Read observations from any CSV source with a header row.
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut observations = Vec::new();
    for record in csv_reader.deserialize() {
        let observation: Observation = record?;
        if observation.converted > 1 {
            return Err(AbTestError::InvalidConverted {
                user_id: observation.user_id,
                value: observation.converted,
            });
        }
        observations.push(observation);
    }
    Ok(observations)
}

/// Conversion counts and rate for one arm.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GroupStats {
    pub group: Group,
    pub users: usize,
    pub conversions: usize,
    pub conversion_rate: f64,
}

impl GroupStats {
    /// Tally one arm's observations. Errors when the arm is empty.
    pub fn describe(observations: &[Observation], group: Group) -> Result<Self> {
        let users = observations.iter().filter(|o| o.group == group).count();
        if users == 0 {
            return Err(AbTestError::EmptyGroup {
                group: group.as_str(),
            });
        }
        let conversions = observations
            .iter()
            .filter(|o| o.group == group && o.converted == 1)
            .count();
        Ok(Self {
            group,
            users,
            conversions,
            conversion_rate: conversions as f64 / users as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
user_id,timestamp,group,converted
1,2024-01-01 10:00:00,control,0
2,2024-01-01 10:05:00,treatment,1
3,2024-01-01 10:10:00,control,1
4,2024-01-01 10:15:00,treatment,1
5,2024-01-01 10:20:00,control,0
";

    #[test]
    fn parses_headered_csv() {
        let observations = read_observations(SAMPLE.as_bytes()).unwrap();
        assert_eq!(observations.len(), 5);
        assert_eq!(observations[0].user_id, 1);
        assert_eq!(observations[0].group, Group::Control);
        assert_eq!(observations[1].converted, 1);
    }

    #[test]
    fn rejects_unknown_group() {
        let bad = "user_id,timestamp,group,converted\n1,2024-01-01,holdout,0\n";
        assert!(matches!(
            read_observations(bad.as_bytes()),
            Err(AbTestError::Csv(_))
        ));
    }

    #[test]
    fn rejects_non_binary_converted() {
        let bad = "user_id,timestamp,group,converted\n1,2024-01-01,control,2\n";
        assert!(matches!(
            read_observations(bad.as_bytes()),
            Err(AbTestError::InvalidConverted { user_id: 1, value: 2 })
        ));
    }

    #[test]
    fn group_stats_tally_conversions() {
        let observations = read_observations(SAMPLE.as_bytes()).unwrap();
        let control = GroupStats::describe(&observations, Group::Control).unwrap();
        assert_eq!(control.users, 3);
        assert_eq!(control.conversions, 1);
        assert!((control.conversion_rate - 1.0 / 3.0).abs() < 1e-12);

        let treatment = GroupStats::describe(&observations, Group::Treatment).unwrap();
        assert_eq!(treatment.users, 2);
        assert_eq!(treatment.conversions, 2);
        assert!((treatment.conversion_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_group_is_an_error() {
        let only_control = "user_id,timestamp,group,converted\n1,2024-01-01,control,0\n";
        let observations = read_observations(only_control.as_bytes()).unwrap();
        assert!(matches!(
            GroupStats::describe(&observations, Group::Treatment),
            Err(AbTestError::EmptyGroup { group: "treatment" })
        ));
    }
}
