use pms_config::PmsConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PmsConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PmsConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.api.is_configured() && has_env_prefix(&env_keys, "PMS_API") {
        warnings.push(
            "API config appears default while PMS_API* env vars exist. Use double underscores (example: PMS_API__BASE_URL)."
                .to_string(),
        );
    }

    if !config.general.has_user() && has_env_prefix(&env_keys, "PMS_GENERAL") {
        warnings.push(
            "No user id configured while PMS_GENERAL* env vars exist. Use double underscores (example: PMS_GENERAL__USER_ID)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
