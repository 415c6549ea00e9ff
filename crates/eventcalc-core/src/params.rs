//! Scenario parameters entered above the table.

use std::fmt;

use crate::error::{CoreError, Result};

pub const DEFAULT_SCENARIO_NAME: &str = "Scenario 1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamField {
    /// Days of the event itself.
    EventDays,
    /// Total placement period in days.
    PlacementDays,
    /// Planned number of visitors.
    PlannedVisitors,
}

impl ParamField {
    pub const ALL: [ParamField; 3] = [
        ParamField::EventDays,
        ParamField::PlacementDays,
        ParamField::PlannedVisitors,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParamField::EventDays => "Event days",
            ParamField::PlacementDays => "Placement period (days)",
            ParamField::PlannedVisitors => "Planned visitors",
        }
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    pub event_days: u32,
    pub placement_days: u32,
    pub planned_visitors: f64,
    /// Venue type from the reference list, when one is loaded.
    pub venue_type: Option<String>,
}

impl Parameters {
    /// Parse and store one field. On error the parameters are unchanged.
    pub fn set_from_text(&mut self, field: ParamField, text: &str) -> Result<()> {
        let text = text.trim();
        let invalid = |message: &str| CoreError::InvalidParameter {
            name: field.label().to_string(),
            message: message.to_string(),
        };
        match field {
            ParamField::EventDays | ParamField::PlacementDays => {
                let days = text
                    .parse::<u32>()
                    .map_err(|_| invalid("expected a whole number of days, 0 or more"))?;
                if field == ParamField::EventDays {
                    self.event_days = days;
                } else {
                    self.placement_days = days;
                }
            }
            ParamField::PlannedVisitors => {
                let visitors = text
                    .replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| invalid("expected a number"))?;
                if !visitors.is_finite() || visitors < 0.0 {
                    return Err(invalid("must be a finite number, 0 or more"));
                }
                self.planned_visitors = visitors;
            }
        }
        Ok(())
    }

    pub fn display(&self, field: ParamField) -> String {
        match field {
            ParamField::EventDays => self.event_days.to_string(),
            ParamField::PlacementDays => self.placement_days.to_string(),
            ParamField::PlannedVisitors => crate::value::format_number(self.planned_visitors),
        }
    }
}
