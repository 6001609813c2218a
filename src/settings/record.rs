//! Determination record
//!
//! Format:
//! ```json
//! {
//!   "versificationId": 5,
//!   "certain": false,
//!   "candidates": [5, 6]
//! }
//! ```
//!
//! `candidates` lists the schemes not eliminated, in priority order; it
//! is a single id when `certain` is true.

use serde::{Deserialize, Serialize};

use crate::canon::VersificationScheme;
use crate::engine::Determination;

/// Persisted form of a [`Determination`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeterminationRecord {
    pub versification_id: u8,
    pub certain: bool,
    pub candidates: Vec<u8>,
}

impl DeterminationRecord {
    pub fn from_determination(determination: &Determination) -> Self {
        Self {
            versification_id: determination.scheme.id(),
            certain: determination.certain,
            candidates: determination
                .remaining_candidates
                .iter()
                .map(|s| s.id())
                .collect(),
        }
    }

    /// Converts back, validating ids and internal consistency.
    pub fn determination(&self) -> Result<Determination, String> {
        let scheme = VersificationScheme::from_id(self.versification_id)
            .ok_or_else(|| format!("unknown versificationId {}", self.versification_id))?;

        let remaining_candidates = self
            .candidates
            .iter()
            .map(|id| {
                VersificationScheme::from_id(*id).ok_or_else(|| format!("unknown candidate id {}", id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if remaining_candidates.first() != Some(&scheme) {
            return Err(format!(
                "versificationId {} is not the first candidate",
                self.versification_id
            ));
        }
        if self.certain && remaining_candidates.len() != 1 {
            return Err("certain record must list exactly one candidate".to_string());
        }

        Ok(Determination {
            scheme,
            certain: self.certain,
            remaining_candidates,
        })
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VersificationScheme::*;

    #[test]
    fn test_record_field_names() {
        let record = DeterminationRecord::from_determination(&Determination {
            scheme: RussianProtestant,
            certain: false,
            remaining_candidates: vec![RussianProtestant, RussianOrthodox],
        });
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["versificationId"], 5);
        assert_eq!(value["certain"], false);
        assert_eq!(value["candidates"], serde_json::json!([5, 6]));
    }

    #[test]
    fn test_record_back_to_determination() {
        let determination = Determination {
            scheme: English,
            certain: true,
            remaining_candidates: vec![English],
        };
        let record = DeterminationRecord::from_determination(&determination);
        assert_eq!(record.determination().unwrap(), determination);
    }

    #[test]
    fn test_inconsistent_record_rejected() {
        let record = DeterminationRecord {
            versification_id: 4,
            certain: true,
            candidates: vec![4, 1],
        };
        assert!(record.determination().is_err());

        let record = DeterminationRecord {
            versification_id: 9,
            certain: false,
            candidates: vec![9],
        };
        assert!(record.determination().is_err());
    }
}
