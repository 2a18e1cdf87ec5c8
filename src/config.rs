//! Generator configuration.
//!
//! Defaults reproduce the classic benchmark set: Float32 operands, bitvector
//! corner patterns of 8 to 128 bits and the four interchange formats as cast targets.
//! A configuration can be loaded from JSON; command line flags override it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::mpf::Format;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the per-operator output directories are created in
    pub output_dir: PathBuf,

    /// Operand formats for class-driven families
    pub precisions: Vec<Format>,

    /// Widths of the corner patterns used by conversions from bitvectors
    pub bitvector_widths: Vec<usize>,

    /// Widths targeted by conversions to bitvectors
    pub to_bitvector_widths: Vec<usize>,

    /// Result formats for conversions from bitvectors
    pub from_bitvector_formats: Vec<Format>,

    /// Target formats for fp.cast
    pub cast_formats: Vec<Format>,

    /// Target formats for conversions from integers
    pub int_formats: Vec<Format>,

    /// Prepended to every seed string; empty for the canonical run
    pub seed_salt: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            precisions: vec![Format::FLOAT32],
            bitvector_widths: vec![8, 16, 32, 64, 128],
            to_bitvector_widths: vec![8, 32, 64],
            from_bitvector_formats: vec![Format::FLOAT16, Format::FLOAT32, Format::FLOAT64],
            cast_formats: vec![
                Format::FLOAT16,
                Format::FLOAT32,
                Format::FLOAT64,
                Format::FLOAT128,
            ],
            int_formats: vec![Format::FLOAT32, Format::FLOAT64],
            seed_salt: String::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_file(path: &Path) -> GenResult<GeneratorConfig> {
        let text = fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> GenResult<()> {
        let format_lists = [
            ("precisions", &self.precisions),
            ("from_bitvector_formats", &self.from_bitvector_formats),
            ("cast_formats", &self.cast_formats),
            ("int_formats", &self.int_formats),
        ];
        for (name, formats) in format_lists {
            if formats.is_empty() {
                return Err(GenError::Config(format!("{} is empty", name)));
            }
            if let Some(f) = formats.iter().find(|f| f.eb < 2 || f.sb < 2) {
                return Err(GenError::Config(format!(
                    "{} contains {}; exponent and significand need at least 2 bits",
                    name, f
                )));
            }
            if let Some(f) = formats.iter().find(|f| f.eb > 62) {
                return Err(GenError::Config(format!(
                    "{} contains {}; exponent fields wider than 62 bits are not supported",
                    name, f
                )));
            }
        }
        if let Some(f) = self.int_formats.iter().find(|f| f.emax() <= f.precision()) {
            return Err(GenError::Config(format!(
                "int_formats contains {}; integer conversions need a maximum exponent above the precision",
                f
            )));
        }
        let width_lists = [
            ("bitvector_widths", &self.bitvector_widths),
            ("to_bitvector_widths", &self.to_bitvector_widths),
        ];
        for (name, widths) in width_lists {
            if widths.is_empty() {
                return Err(GenError::Config(format!("{} is empty", name)));
            }
            if let Some(w) = widths.iter().find(|&&w| w < 4) {
                return Err(GenError::Config(format!(
                    "{} contains {}; bitvectors need at least 4 bits",
                    name, w
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.precisions, vec![Format::FLOAT32]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = GeneratorConfig::default();
        config.bitvector_widths = vec![8, 2];
        assert!(matches!(config.validate(), Err(GenError::Config(_))));

        let mut config = GeneratorConfig::default();
        config.cast_formats.push(Format::new(1, 8));
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.int_formats.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_int_formats_need_integral_overflow_range() {
        for f in [Format::new(3, 3), Format::new(4, 7), Format::new(5, 15), Format::new(3, 8)] {
            let mut config = GeneratorConfig::default();
            config.int_formats = vec![Format::FLOAT32, f];
            assert!(matches!(config.validate(), Err(GenError::Config(_))), "{}", f);
        }
        let mut config = GeneratorConfig::default();
        config.int_formats = vec![Format::FLOAT16, Format::new(4, 6)];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fpgen.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"precisions": [{{"eb": 11, "sb": 53}}], "seed_salt": "nightly"}}"#
        )
        .unwrap();
        let config = GeneratorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.precisions, vec![Format::FLOAT64]);
        assert_eq!(config.seed_salt, "nightly");
        assert_eq!(config.to_bitvector_widths, vec![8, 32, 64]);
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ precisions: ").unwrap();
        assert!(matches!(
            GeneratorConfig::from_json_file(&path),
            Err(GenError::Json(_))
        ));
    }
}
