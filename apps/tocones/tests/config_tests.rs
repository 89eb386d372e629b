//! Configuration files on disk.

use tocones::config::AppConfig;
use tocones_core::{PersonnelRole, ToconesError};

#[test]
fn explicit_file_overrides_roster() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[roster]
chainsaw_operators = ["Operario, Uno", "Operario, Dos"]

[output]
directory = "salidas"
"#,
    )
    .expect("write config");

    let config = AppConfig::load(Some(&path)).expect("load");
    assert_eq!(
        config.roster.names(PersonnelRole::ChainsawOperator),
        ["Operario, Uno".to_string(), "Operario, Dos".to_string()]
    );
    assert_eq!(config.roster.names(PersonnelRole::Supervisor).len(), 6);
    assert_eq!(
        config.output.directory.as_deref(),
        Some(std::path::Path::new("salidas"))
    );
}

#[test]
fn unknown_types_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[output]\ndirectory = 42\n").expect("write config");

    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ToconesError::ConfigError(_))
    ));
}
