use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Marital Status", default)]
    marital_status: Option<String>,
    #[serde(rename = "Occupation", default)]
    occupation: Option<String>,
    #[serde(rename = "Education Level", default)]
    education_level: Option<String>,
    #[serde(rename = "Geographic Information", default)]
    location: Option<String>,
    #[serde(rename = "Driving Record", default)]
    driving_record: Option<String>,
}

/// Dropdown values taken from the customer dataset, distinct and in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceData {
    pub genders: Vec<String>,
    pub marital_statuses: Vec<String>,
    pub occupations: Vec<String>,
    pub education_levels: Vec<String>,
    pub locations: Vec<String>,
    pub driving_records: Vec<String>,
}

impl ReferenceData {
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open reference dataset {}", path.display()))?;
        let data = Self::from_reader(file)
            .with_context(|| format!("failed to parse reference dataset {}", path.display()))?;

        info!(
            path = %path.display(),
            occupations = data.occupations.len(),
            driving_records = data.driving_records.len(),
            "Reference dataset loaded"
        );
        Ok(data)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut data = Self::default();
        for row in csv_reader.deserialize::<ReferenceRow>() {
            let row = row?;
            push_distinct(&mut data.genders, row.gender);
            push_distinct(&mut data.marital_statuses, row.marital_status);
            push_distinct(&mut data.occupations, row.occupation);
            push_distinct(&mut data.education_levels, row.education_level);
            push_distinct(&mut data.locations, row.location);
            push_distinct(&mut data.driving_records, row.driving_record);
        }
        Ok(data)
    }
}

fn push_distinct(values: &mut Vec<String>, value: Option<String>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    if !values.contains(&value) {
        values.push(value);
    }
}
