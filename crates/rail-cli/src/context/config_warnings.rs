use rail_config::{ENV_PREFIX, RailConfig};

/// Config sections that env vars can target.
const SECTIONS: &[&str] = &["TESTRAIL", "PROJECT", "GENERAL", "ENTITIES"];

/// Warn about `RAILSHIFT_*` variables that figment silently ignored because
/// they use a single underscore after the section name.
pub fn warn_unconfigured(config: &RailConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &RailConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    for section in SECTIONS {
        let prefix = format!("{ENV_PREFIX}{section}");
        let nested = format!("{prefix}__");
        let mistyped = keys
            .iter()
            .filter(|key| key.starts_with(&prefix) && !key.starts_with(&nested))
            .collect::<Vec<_>>();
        for key in mistyped {
            warnings.push(format!(
                "{key} is ignored; use a double underscore after the section (example: {nested}{})",
                example_field(section)
            ));
        }
    }

    if !config.testrail.is_configured() && keys.iter().any(|key| key.starts_with(ENV_PREFIX)) {
        let missing = config.testrail.missing_fields().join(", ");
        warnings.push(format!("[testrail] is incomplete (missing: {missing})"));
    }

    warnings
}

fn example_field(section: &str) -> &'static str {
    match section {
        "TESTRAIL" => "API_KEY",
        "PROJECT" => "SOURCE_ID",
        "GENERAL" => "DATA_DIR",
        _ => "MILESTONES",
    }
}
