//! Model archives: a trained model saved as a JSON document with a
//! metadata header.
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

pub mod error;
pub mod meta;

pub use self::error::ArchiveError;
pub use self::meta::{ModelMetadata, FORMAT_VERSION};
use crate::corpus::{Corpus, Vocabulary};
use crate::model::{EmissionTable, TrainedModel, TrainingError, TransitionTable, WordPrior};
use crate::speller::{HmmSpeller, Speller};

#[derive(Serialize)]
struct ArchiveRef<'a> {
    metadata: &'a ModelMetadata,
    model: &'a TrainedModel,
}

#[derive(Deserialize)]
struct Header {
    metadata: ModelMetadata,
}

#[derive(Deserialize)]
struct RawArchive {
    metadata: ModelMetadata,
    model: RawModel,
}

#[derive(Deserialize)]
struct RawModel {
    vocabulary: Vocabulary,
    prior: WordPrior,
    transition: TransitionTable,
    emission: EmissionTable,
}

/// A trained model together with its metadata, ready to be saved or
/// used for correction.
pub struct ModelArchive {
    metadata: ModelMetadata,
    speller: Arc<HmmSpeller>,
}

impl ModelArchive {
    /// Bundles a model with its metadata.
    pub fn new(model: TrainedModel, metadata: ModelMetadata) -> ModelArchive {
        ModelArchive {
            metadata,
            speller: Arc::new(HmmSpeller::new(model)),
        }
    }

    /// Trains a model on `corpus` and wraps it with matching metadata.
    pub fn train(corpus: &Corpus, source: Option<&str>) -> Result<ModelArchive, TrainingError> {
        let model = TrainedModel::train(corpus)?;
        let metadata = ModelMetadata::new(
            &model,
            corpus.pairs().len(),
            source.map(str::to_string),
        );
        Ok(ModelArchive::new(model, metadata))
    }

    /// Reads and validates an archive file.
    pub fn open(path: &Path) -> Result<ModelArchive, ArchiveError> {
        let name = path.to_string_lossy().to_string();
        let file = std::fs::File::open(path).map_err(|e| ArchiveError::Io(name.clone(), e))?;
        let archive = ModelArchive::from_reader(file, &name)?;

        log::info!(
            "Opened model {} ({} words, {} letters)",
            path.display(),
            archive.metadata.vocabulary_size,
            archive.metadata.alphabet.chars().count()
        );

        Ok(archive)
    }

    /// Reads an archive; `name` is only used in error messages.
    pub fn from_reader<R: Read>(mut reader: R, name: &str) -> Result<ModelArchive, ArchiveError> {
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(|e| ArchiveError::Io(name.to_string(), e))?;
        buf.parse()
    }

    /// Writes the archive as pretty printed JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ArchiveError> {
        let archive = ArchiveRef {
            metadata: &self.metadata,
            model: self.model(),
        };
        serde_json::to_writer_pretty(writer, &archive)?;
        Ok(())
    }

    /// Saves the archive to `path`. The file is written next to its final
    /// location and moved into place, so a failed save leaves any previous
    /// file intact.
    pub fn save(&self, path: &Path) -> Result<(), ArchiveError> {
        let name = path.to_string_lossy().to_string();
        let io = |e: std::io::Error| ArchiveError::Io(name.clone(), e);

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(parent).map_err(io)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.to_writer(&mut writer)?;
            writer.flush().map_err(io)?;
        }
        temp.persist(path).map_err(|e| io(e.error))?;

        log::info!("Saved model to {}", path.display());
        Ok(())
    }

    /// The metadata header.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// The trained model.
    pub fn model(&self) -> &TrainedModel {
        self.speller.model()
    }

    /// A shared speller over the model.
    pub fn speller(&self) -> Arc<dyn Speller + Send + Sync> {
        self.speller.clone()
    }

    /// Takes the model out of the archive, cloning it only if a speller
    /// handed out by [`ModelArchive::speller`] is still alive.
    pub fn into_model(self) -> TrainedModel {
        match Arc::try_unwrap(self.speller) {
            Ok(speller) => speller.into_model(),
            Err(shared) => shared.model().clone(),
        }
    }
}

impl FromStr for ModelArchive {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<ModelArchive, ArchiveError> {
        // The header is checked on its own so that a newer layout reports
        // its version instead of a parse error.
        let header: Header = serde_json::from_str(s)?;
        if header.metadata.format_version != FORMAT_VERSION {
            return Err(ArchiveError::UnsupportedVersion {
                found: header.metadata.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let raw: RawArchive = serde_json::from_str(s)?;
        let model = TrainedModel::new(
            raw.model.vocabulary,
            raw.model.prior,
            raw.model.transition,
            raw.model.emission,
        )?;

        Ok(ModelArchive::new(model, raw.metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &str = "cat: caat ct\ncot: cott\ndog: dgo doog\n";

    fn archive() -> ModelArchive {
        let corpus: Corpus = CORPUS.parse().unwrap();
        ModelArchive::train(&corpus, Some("typos.txt")).unwrap()
    }

    #[test]
    fn save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let archive = archive();
        archive.save(&path).unwrap();

        let opened = ModelArchive::open(&path).unwrap();
        assert_eq!(opened.metadata(), archive.metadata());
        assert_eq!(opened.model(), archive.model());
        assert_eq!(opened.metadata().pairs, 5);
        assert_eq!(opened.metadata().vocabulary_size, 3);
        assert_eq!(opened.metadata().alphabet, "acdgot");
        assert_eq!(opened.metadata().source.as_deref(), Some("typos.txt"));

        let speller = opened.speller();
        assert_eq!(speller.correct("dgo").unwrap().value(), "dog");
        assert_eq!(
            speller.correct("caat").unwrap(),
            archive.speller().correct("caat").unwrap()
        );
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "old").unwrap();

        archive().save(&path).unwrap();
        assert!(ModelArchive::open(&path).is_ok());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json");
        assert!(matches!(archive().save(&path), Err(ArchiveError::Io(..))));
    }

    #[test]
    fn unsupported_version() {
        let archive = archive();
        let mut json = serde_json::to_value(ArchiveRef {
            metadata: archive.metadata(),
            model: archive.model(),
        })
        .unwrap();
        json["metadata"]["format_version"] = 99.into();
        // a future layout need not have the fields this version reads
        json["model"] = serde_json::Value::Null;

        match json.to_string().parse::<ModelArchive>() {
            Err(ArchiveError::UnsupportedVersion { found, expected }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, FORMAT_VERSION);
            }
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("future version was accepted"),
        }
    }

    #[test]
    fn invalid_model() {
        let archive = archive();
        let mut buf = vec![];
        archive.to_writer(&mut buf).unwrap();

        let mut json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        json["model"]["prior"]
            .as_object_mut()
            .unwrap()
            .insert("cow".into(), 0.5.into());

        assert!(matches!(
            json.to_string().parse::<ModelArchive>(),
            Err(ArchiveError::Invalid(_))
        ));
    }

    #[test]
    fn not_an_archive() {
        assert!(matches!(
            "cat: caat".parse::<ModelArchive>(),
            Err(ArchiveError::Json(_))
        ));
        assert!(matches!(
            ModelArchive::from_reader(&b"{}"[..], "empty"),
            Err(ArchiveError::Json(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelArchive::open(&dir.path().join("missing.json")),
            Err(ArchiveError::Io(..))
        ));
    }

    #[test]
    fn into_model() {
        let archive = archive();
        let expected = archive.model().clone();

        let speller = archive.speller();
        let model = archive.into_model();
        assert_eq!(model, expected);
        assert!(speller.is_correct("cot"));
    }
}
