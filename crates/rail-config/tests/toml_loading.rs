//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed working directory and env vars.

use figment::Jail;
use rail_config::{ConfigError, RailConfig};
use rail_core::EntityKind;
use std::path::{Path, PathBuf};

#[test]
fn loads_full_config_from_local_file() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.create_file(
            "railshift.toml",
            r#"
[testrail]
base_url = "https://acme.testrail.io"
username = "qa@acme.test"
api_key = "toml-key"
timeout_secs = 5

[project]
source_id = 2
destination_id = 14

[general]
data_dir = "export"

[entities]
milestones = false
test_plans = true
tests = true
"#,
        )?;

        let config = RailConfig::load(None).expect("config loads");

        assert!(config.testrail.is_configured());
        assert_eq!(config.testrail.timeout_secs, 5);
        assert_eq!(config.project.destination_id, 14);
        assert_eq!(config.general.data_dir, PathBuf::from("export"));

        let selection = config.selection().expect("known names");
        assert!(!selection.is_enabled(EntityKind::Milestones));
        // Untouched defaults survive the merge.
        assert!(selection.is_enabled(EntityKind::TestCases));
        assert!(selection.is_enabled(EntityKind::TestPlans));
        assert!(selection.is_enabled(EntityKind::Tests));
        assert!(!selection.is_enabled(EntityKind::Users));
        Ok(())
    });
}

#[test]
fn explicit_path_replaces_local_file() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.create_file("railshift.toml", "[project]\nsource_id = 3\n")?;
        jail.create_file("other.toml", "[project]\nsource_id = 9\n")?;

        let config = RailConfig::load(Some(Path::new("other.toml"))).expect("config loads");
        assert_eq!(config.project.source_id, 9);
        Ok(())
    });
}

#[test]
fn global_file_is_overridden_by_local_file() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.create_dir("xdg/railshift")?;
        jail.create_file(
            "xdg/railshift/config.toml",
            "[testrail]\nusername = \"global@acme.test\"\napi_key = \"global-key\"\n",
        )?;
        jail.create_file("railshift.toml", "[testrail]\napi_key = \"local-key\"\n")?;

        let config = RailConfig::load(None).expect("config loads");
        assert_eq!(config.testrail.username, "global@acme.test");
        assert_eq!(config.testrail.api_key, "local-key");
        Ok(())
    });
}

#[test]
fn unknown_entity_in_toml_fails_selection() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.create_file("railshift.toml", "[entities]\nsections = true\n")?;

        let config = RailConfig::load(None).expect("config loads");
        assert!(matches!(
            config.selection(),
            Err(ConfigError::UnknownEntity(name)) if name == "sections"
        ));
        Ok(())
    });
}

#[test]
fn wrong_type_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
        jail.create_file("railshift.toml", "[project]\nsource_id = \"two\"\n")?;

        assert!(matches!(
            RailConfig::load(None),
            Err(ConfigError::Figment(_))
        ));
        Ok(())
    });
}
