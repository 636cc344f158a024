use figment::Jail;
use pms_config::{ConfigError, PmsConfig};

#[test]
fn env_vars_fill_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("PMS_GENERAL__VESSEL_ID", "vsl-env");
        jail.set_env("PMS_GENERAL__DEFAULT_LIMIT", "5");
        jail.set_env("PMS_STORAGE__TRAIL_ENABLED", "false");

        let config = PmsConfig::load().expect("config loads");
        assert_eq!(config.general.vessel_id, "vsl-env");
        assert_eq!(config.general.default_limit, 5);
        assert!(!config.storage.trail_enabled);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".pms")?;
        jail.create_file(
            ".pms/config.toml",
            r#"
[general]
user_id = "usr-file"
"#,
        )?;
        jail.set_env("PMS_GENERAL__USER_ID", "usr-env");

        let config = PmsConfig::load().expect("config loads");
        assert_eq!(config.general.user_id, "usr-env");
        Ok(())
    });
}

#[test]
fn out_of_range_env_value_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("PMS_API__TIMEOUT_SECS", "0");

        let err = PmsConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "api.timeout_secs"));
        Ok(())
    });
}
