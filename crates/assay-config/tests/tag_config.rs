use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;
use assay_config::{ConfigError, TagConfig};

#[test]
fn loads_tag_options_from_yaml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.yaml",
            r#"
tagOptions:
  - Backend Developer
  - Frontend Developer
"#,
        )?;

        let config = TagConfig::load(Path::new("config.yaml")).expect("tags load");
        assert_eq!(
            config.tag_options,
            vec!["Backend Developer".to_string(), "Frontend Developer".to_string()]
        );
        Ok(())
    });
}

#[test]
fn missing_file_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let err = TagConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn duplicate_tags_are_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.yaml", "tagOptions: [backend, backend]\n")?;

        let err = TagConfig::load(Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

#[test]
fn file_without_tag_options_fails() {
    Jail::expect_with(|jail| {
        jail.create_file("config.yaml", "somethingElse: true\n")?;

        let err = TagConfig::load(Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
