//! The metadata header of a model archive.
use serde::{Deserialize, Serialize};

use crate::model::TrainedModel;

/// Version of the archive layout written by [`super::ModelArchive::save`].
pub const FORMAT_VERSION: u32 = 1;

/// Summary of a trained model, stored next to its tables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelMetadata {
    /// layout version, see [`FORMAT_VERSION`]
    pub format_version: u32,
    /// number of training pairs the emission table was counted from
    pub pairs: usize,
    /// number of correct words
    pub vocabulary_size: usize,
    /// the alphabet letters, concatenated in order
    pub alphabet: String,
    /// where the training corpus came from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ModelMetadata {
    /// Describes `model`, trained on `pairs` pairs from `source`.
    pub fn new(model: &TrainedModel, pairs: usize, source: Option<String>) -> ModelMetadata {
        ModelMetadata {
            format_version: FORMAT_VERSION,
            pairs,
            vocabulary_size: model.vocabulary().len(),
            alphabet: model.alphabet().letters().iter().collect(),
            source,
        }
    }
}

#[test]
fn test_metadata_json() {
    let json = r#"{
        "format_version": 1,
        "pairs": 3,
        "vocabulary_size": 2,
        "alphabet": "acot"
    }"#;

    let metadata: ModelMetadata = serde_json::from_str(json).unwrap();
    assert_eq!(metadata.format_version, FORMAT_VERSION);
    assert_eq!(metadata.alphabet, "acot");
    assert_eq!(metadata.source, None);

    let back = serde_json::to_string(&metadata).unwrap();
    assert!(!back.contains("source"));
}
