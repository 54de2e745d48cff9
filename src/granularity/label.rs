use serde::Serialize;

use crate::GranularityType;

/// Text drawn for one header cell. `id` is the index of the first period it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLabel {
    pub title: String,
    pub text:  String,
    pub id:    f64,
}

impl TimelineLabel {
    pub fn new(title: impl Into<String>, text: impl Into<String>, id: f64) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            id,
        }
    }
}

/// Header rows for every granularity coarser than or equal to the one they were built
/// for; finer rows stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedLabel {
    pub year_labels:    Vec<TimelineLabel>,
    pub quarter_labels: Vec<TimelineLabel>,
    pub month_labels:   Vec<TimelineLabel>,
    pub week_labels:    Vec<TimelineLabel>,
    pub day_labels:     Vec<TimelineLabel>,
}

impl ExtendedLabel {
    pub fn labels(&self, kind: GranularityType) -> &[TimelineLabel] {
        match kind {
            GranularityType::Year => &self.year_labels,
            GranularityType::Quarter => &self.quarter_labels,
            GranularityType::Month => &self.month_labels,
            GranularityType::Week => &self.week_labels,
            GranularityType::Day => &self.day_labels,
        }
    }

    pub fn set_labels(&mut self, kind: GranularityType, labels: Vec<TimelineLabel>) {
        let row = match kind {
            GranularityType::Year => &mut self.year_labels,
            GranularityType::Quarter => &mut self.quarter_labels,
            GranularityType::Month => &mut self.month_labels,
            GranularityType::Week => &mut self.week_labels,
            GranularityType::Day => &mut self.day_labels,
        };
        *row = labels;
    }
}
