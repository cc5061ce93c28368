use std::{env, str::FromStr};

use eqc_lang_printer::ColorChoice;

/// Settings which are read from the environment
#[derive(Debug, Clone)]
pub struct GlobalSettings {
    pub colorize: ColorChoice,
    pub log_level: log::LevelFilter,
}

impl GlobalSettings {
    pub fn from_env() -> Self {
        let colorize = if env::var_os("NO_COLOR").is_some() {
            ColorChoice::Never
        } else {
            env::var("EQC_COLORIZE")
                .ok()
                .and_then(|var| ColorChoice::from_str(&var).ok())
                .unwrap_or(ColorChoice::Auto)
        };

        let log_level = env::var("EQC_LOG_LEVEL")
            .ok()
            .and_then(|var| log::LevelFilter::from_str(&var.to_uppercase()).ok())
            .unwrap_or(log::LevelFilter::Warn);

        Self { colorize, log_level }
    }
}
