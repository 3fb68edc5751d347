//! DICOM header fields shown alongside the image
//!
//! Parsing the DICOM file is left to whatever parser the host embeds; it
//! only has to expose string lookups by tag through [`TagSource`].

use std::collections::HashMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Tag keys in the `xGGGGEEEE` form used by DICOM parsers
pub mod tags {
    pub const PATIENT_NAME: &str = "x00100010";
    pub const PATIENT_ID: &str = "x00100020";
    pub const STUDY_DATE: &str = "x00080020";
    pub const MODALITY: &str = "x00080060";
}

/// String lookup into a parsed DICOM data set
pub trait TagSource {
    /// Value of `tag`, `Ok(None)` when the element is absent
    fn string(&self, tag: &str) -> anyhow::Result<Option<String>>;
}

impl TagSource for HashMap<String, String> {
    fn string(&self, tag: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get(tag).cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicomMetadata {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub study_date: Option<String>,
    pub modality: Option<String>,
}

impl DicomMetadata {
    pub fn from_tags(source: &impl TagSource) -> anyhow::Result<Self> {
        let read = |tag: &str| -> anyhow::Result<Option<String>> {
            let value = source
                .string(tag)
                .with_context(|| format!("Failed to read DICOM tag {tag}"))?;
            Ok(value.and_then(clean))
        };
        Ok(Self {
            patient_name: read(tags::PATIENT_NAME)?,
            patient_id: read(tags::PATIENT_ID)?,
            study_date: read(tags::STUDY_DATE)?,
            modality: read(tags::MODALITY)?,
        })
    }

    /// Present fields as `(label, value)` pairs for display
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Patient Name", &self.patient_name),
            ("Patient ID", &self.patient_id),
            ("Study Date", &self.study_date),
            ("Modality", &self.modality),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// DICOM strings are padded with spaces or NUL to an even length
fn clean(value: String) -> Option<String> {
    let trimmed = value.trim_end_matches([' ', '\0']);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl TagSource for Broken {
        fn string(&self, _tag: &str) -> anyhow::Result<Option<String>> {
            anyhow::bail!("truncated data set")
        }
    }

    #[test]
    fn test_from_tags() {
        let mut source = HashMap::new();
        source.insert(tags::PATIENT_NAME.to_string(), "Doe^Jane ".to_string());
        source.insert(tags::MODALITY.to_string(), "CT".to_string());
        source.insert(tags::STUDY_DATE.to_string(), "\0".to_string());

        let metadata = DicomMetadata::from_tags(&source).unwrap();
        assert_eq!(metadata.patient_name.as_deref(), Some("Doe^Jane"));
        assert_eq!(metadata.patient_id, None);
        assert_eq!(metadata.study_date, None);
        assert_eq!(metadata.modality.as_deref(), Some("CT"));
        assert_eq!(
            metadata.fields(),
            vec![("Patient Name", "Doe^Jane"), ("Modality", "CT")]
        );
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let err = DicomMetadata::from_tags(&Broken).unwrap_err();
        assert!(format!("{err:#}").contains("x00100010"));
    }
}
