use tb_config::ENV_PREFIX;

const SECTIONS: [&str; 3] = ["STORE", "IDENTITY", "GENERAL"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured() {
    for warning in collect_unconfigured_warnings(std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    SECTIONS
        .into_iter()
        .filter_map(|section| {
            let single = format!("{ENV_PREFIX}{section}_");
            let double = format!("{ENV_PREFIX}{section}__");
            let offending = env_keys
                .iter()
                .find(|key| key.starts_with(&single) && !key.starts_with(&double))?;
            Some(format!(
                "{offending} is ignored. Use double underscores between section and key (example: {double}{})",
                example_key(section)
            ))
        })
        .collect()
}

fn example_key(section: &str) -> &'static str {
    match section {
        "STORE" => "DB_PATH",
        "IDENTITY" => "DISPLAY_NAME",
        _ => "DATA_DIR",
    }
}
