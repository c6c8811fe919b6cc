use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Room category offered by the hotel search form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
}

impl Default for RoomType {
    fn default() -> Self {
        RoomType::Standard
    }
}

/// The merged search form for the whole flow: flight fields plus hotel fields.
///
/// Completion gating only looks at destination and the two dates; the rest of
/// the fields always carry a usable default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchInputs {
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub passengers: u32,
    pub one_way: bool,
    pub guests: u32,
    pub room_type: RoomType,
}

impl Default for SearchInputs {
    fn default() -> Self {
        Self {
            destination: String::new(),
            start_date: None,
            end_date: None,
            passengers: 1,
            one_way: false,
            guests: 1,
            room_type: RoomType::default(),
        }
    }
}

impl SearchInputs {
    /// Whether the inputs are sufficient to start a search: destination plus
    /// both dates. No further validation happens anywhere in the flow.
    pub fn is_complete(&self) -> bool {
        !self.destination.is_empty() && self.start_date.is_some() && self.end_date.is_some()
    }

    /// Merge a partial edit into the form. The destination field arrives from
    /// a blur commit and is trimmed here so downstream consumers never see
    /// padding whitespace.
    pub fn merge(&mut self, patch: InputPatch) {
        if let Some(destination) = patch.destination {
            self.destination = destination.trim().to_string();
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = Some(start_date);
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
        if let Some(passengers) = patch.passengers {
            self.passengers = passengers;
        }
        if let Some(one_way) = patch.one_way {
            self.one_way = one_way;
        }
        if let Some(guests) = patch.guests {
            self.guests = guests;
        }
        if let Some(room_type) = patch.room_type {
            self.room_type = room_type;
        }
    }
}

/// A single form edit. Every field is optional; unset fields are untouched by
/// the merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputPatch {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub passengers: Option<u32>,
    pub one_way: Option<bool>,
    pub guests: Option<u32>,
    pub room_type: Option<RoomType>,
}

impl InputPatch {
    pub fn destination(value: impl Into<String>) -> Self {
        Self {
            destination: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn start_date(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            ..Self::default()
        }
    }

    pub fn end_date(date: NaiveDate) -> Self {
        Self {
            end_date: Some(date),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_default_inputs_are_incomplete() {
        let inputs = SearchInputs::default();
        assert!(!inputs.is_complete());
        assert_eq!(inputs.passengers, 1);
        assert_eq!(inputs.guests, 1);
        assert_eq!(inputs.room_type, RoomType::Standard);
    }

    #[test]
    fn test_merge_trims_destination() {
        let mut inputs = SearchInputs::default();
        inputs.merge(InputPatch::destination("  Paris  "));
        assert_eq!(inputs.destination, "Paris");
    }

    #[test]
    fn test_completion_requires_all_three_fields() {
        let mut inputs = SearchInputs::default();
        inputs.merge(InputPatch::destination("Paris"));
        assert!(!inputs.is_complete());

        inputs.merge(InputPatch::start_date(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ));
        assert!(!inputs.is_complete());

        inputs.merge(InputPatch::end_date(
            NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        ));
        assert!(inputs.is_complete());
    }

    #[test]
    fn test_clearing_destination_makes_inputs_incomplete() {
        let mut inputs = SearchInputs::default();
        inputs.merge(InputPatch::destination("Paris"));
        inputs.merge(InputPatch::start_date(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ));
        inputs.merge(InputPatch::end_date(
            NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
        ));
        assert!(inputs.is_complete());

        inputs.merge(InputPatch::destination(""));
        assert!(!inputs.is_complete());
    }
}
