// File: src/persistence.rs
use crate::error::Result;
use crate::vocabulary::VocabularyConfig;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes the vocabulary overlay as pretty JSON with a trailing newline.
///
/// The file is written to a temporary sibling and renamed over `path`, so a
/// failed write never leaves a truncated vocabulary behind. Concurrent writers
/// are not coordinated: the last rename wins.
pub fn save_to_disk(config: &VocabularyConfig, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, config)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    debug!("Vocabulary saved - path={}", path.display());
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<VocabularyConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut config: VocabularyConfig = serde_json::from_reader(reader)?;
    config.auto.fill_defaults();
    config.validate()?;
    Ok(config)
}

/// Loads the overlay, treating a missing file as an empty overlay.
pub fn load_or_default(path: &Path) -> Result<VocabularyConfig> {
    match load_from_disk(path) {
        Err(crate::error::RootError::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!("No vocabulary file at {}, using defaults", path.display());
            Ok(VocabularyConfig::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RootError;

    #[test]
    fn test_save_layout_is_sorted_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");

        let mut config = VocabularyConfig::default();
        config.stopwords.insert("pcs".to_string());
        config.stopwords.insert("inch".to_string());
        config.stopwords.insert("pcs".to_string());
        config.irregular_singulars.insert("wolves".to_string(), "wolf".to_string());
        config.irregular_singulars.insert("children".to_string(), "child".to_string());
        save_to_disk(&config, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let expected = "{\n  \"auto\": {\n    \"stopword_threshold\": 0.9\n  },\n  \"irregular_singulars\": {\n    \"children\": \"child\",\n    \"wolves\": \"wolf\"\n  },\n  \"stopwords\": [\n    \"inch\",\n    \"pcs\"\n  ]\n}\n";
        assert_eq!(text, expected);
        assert_eq!(load_from_disk(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, VocabularyConfig::default());
    }

    #[test]
    fn test_partial_file_gets_defaults_filled_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, r#"{"stopwords": ["oz", "oz", "ct"], "extra": 1}"#).unwrap();
        let config = load_or_default(&path).unwrap();
        assert_eq!(config.stopwords.len(), 2);
        assert_eq!(config.auto.stopword_threshold(), 0.9);
        assert!(config.irregular_singulars.is_empty());
    }

    #[test]
    fn test_auto_section_survives_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, r#"{"auto": {"stopword_threshold": 1, "note": "tuned"}, "stopwords": ["oz"]}"#).unwrap();

        let mut config = load_or_default(&path).unwrap();
        config.stopwords.insert("ct".to_string());
        save_to_disk(&config, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(
            "{\n  \"auto\": {\n    \"note\": \"tuned\",\n    \"stopword_threshold\": 1\n  },\n"
        ));
        assert_eq!(load_from_disk(&path).unwrap(), config);
    }

    #[test]
    fn test_empty_auto_section_gets_the_default_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, r#"{"auto": {}}"#).unwrap();
        let config = load_or_default(&path).unwrap();
        assert_eq!(config, VocabularyConfig::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_or_default(&path), Err(RootError::Json(_))));

        fs::write(&path, r#"{"auto": {"stopword_threshold": 2.0}}"#).unwrap();
        assert!(matches!(load_or_default(&path), Err(RootError::InvalidVocabulary(_))));
    }
}
