//! End-to-end generation into a scratch directory: layout, naming, file
//! structure and reproducibility of whole runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use fpgen::{Counts, Format, GenError, Generator, GeneratorConfig};

fn config_for(root: &Path) -> GeneratorConfig {
    GeneratorConfig {
        output_dir: root.to_path_buf(),
        precisions: vec![Format::FLOAT16],
        bitvector_widths: vec![8],
        to_bitvector_widths: vec![8],
        from_bitvector_formats: vec![Format::FLOAT16],
        cast_formats: vec![Format::FLOAT16, Format::FLOAT32],
        int_formats: vec![Format::FLOAT16],
        ..GeneratorConfig::default()
    }
}

/// Relative path -> contents for every file below `root`.
fn snapshot(root: &Path) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    for dir in fs::read_dir(root).unwrap() {
        let dir = dir.unwrap().path();
        for file in fs::read_dir(&dir).unwrap() {
            let path = file.unwrap().path();
            let key = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
            files.insert(key, fs::read_to_string(&path).unwrap());
        }
    }
    files
}

fn generate(root: &Path, salt: &str, counts: &Counts) -> usize {
    let mut config = config_for(root);
    config.seed_salt = salt.to_string();
    Generator::new(config).unwrap().run(counts).unwrap()
}

#[test]
fn test_files_are_complete_benchmarks() {
    let dir = tempfile::tempdir().unwrap();
    let counts = Counts {
        classify: 1,
        binary: 1,
        ..Counts::default()
    };
    let written = generate(dir.path(), "", &counts);
    let files = snapshot(dir.path());
    assert_eq!(files.len(), written);

    for (name, text) in &files {
        assert!(name.ends_with(".smt2"), "{}", name);
        let statuses = text.matches("(set-info :status ").count();
        assert_eq!(statuses, 1, "{}", name);
        assert!(
            text.contains("(set-info :status sat)") || text.contains("(set-info :status unsat)"),
            "{}",
            name
        );
        assert_eq!(text.matches("(check-sat)").count(), 1, "{}", name);
        assert!(text.contains("(assert goal)"), "{}", name);
        assert!(text.trim_end().ends_with("(exit)"), "{}", name);
    }

    assert!(files.contains_key("fp.isZero/isZero_00001.smt2"));
    assert!(files.contains_key("fp.add/add_rne_00001.smt2"));
    assert!(files.keys().all(|k| !k.starts_with("fp.fma/")));
}

#[test]
fn test_runs_are_reproducible() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let counts = Counts {
        relations: 1,
        unary: 2,
        ..Counts::default()
    };
    generate(first.path(), "", &counts);
    generate(second.path(), "", &counts);
    assert_eq!(snapshot(first.path()), snapshot(second.path()));
}

#[test]
fn test_family_output_does_not_depend_on_other_families() {
    let alone = tempfile::tempdir().unwrap();
    let together = tempfile::tempdir().unwrap();
    generate(
        alone.path(),
        "",
        &Counts {
            unary: 1,
            ..Counts::default()
        },
    );
    generate(
        together.path(),
        "",
        &Counts {
            classify: 1,
            unary: 1,
            ..Counts::default()
        },
    );
    let together: BTreeMap<_, _> = snapshot(together.path())
        .into_iter()
        .filter(|(k, _)| !k.starts_with("fp.is"))
        .collect();
    assert_eq!(snapshot(alone.path()), together);
}

#[test]
fn test_salt_gives_a_different_run() {
    let plain = tempfile::tempdir().unwrap();
    let salted = tempfile::tempdir().unwrap();
    let counts = Counts {
        classify: 1,
        ..Counts::default()
    };
    generate(plain.path(), "", &counts);
    generate(salted.path(), "nightly", &counts);
    assert_ne!(snapshot(plain.path()), snapshot(salted.path()));
}

#[test]
fn test_rerun_replaces_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let counts = Counts {
        classify: 1,
        ..Counts::default()
    };
    let first = generate(dir.path(), "", &counts);
    let stray = dir.path().join("fp.isNaN").join("stray.smt2");
    fs::write(&stray, "(exit)\n").unwrap();
    let second = generate(dir.path(), "", &counts);
    assert_eq!(first, second);
    assert!(!stray.exists());
}

#[test]
fn test_invalid_config_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let keep = dir.path().join("fp.isNaN");
    fs::create_dir_all(&keep).unwrap();
    let mut config = config_for(dir.path());
    config.bitvector_widths = vec![3];
    assert!(matches!(Generator::new(config), Err(GenError::Config(_))));
    assert!(keep.is_dir());
}

#[test]
fn test_bitvector_corner_file_count() {
    let dir = tempfile::tempdir().unwrap();
    let counts = Counts {
        conversion: 1,
        ..Counts::default()
    };
    generate(dir.path(), "", &counts);
    // 16 corner patterns, 5 rounding modes, zeros + ones + 1 random interior
    let from_ubv = fs::read_dir(dir.path().join("fp.from.ubv")).unwrap().count();
    assert_eq!(from_ubv, 16 * 5 * 3);
    let from_sbv = fs::read_dir(dir.path().join("fp.from.sbv")).unwrap().count();
    assert_eq!(from_sbv, 16 * 5 * 3);
}
