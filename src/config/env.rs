use log::warn;
use std::env;

pub const REQUIRED_ENV_VARS: &[&str] = &["REDIS_URL"];

pub fn check_and_print_env_vars() {
    let mut missing = Vec::new();

    for &key in REQUIRED_ENV_VARS {
        if env::var(key).is_err() {
            warn!("{key} is not set; falling back to its default");
            missing.push(key);
        }
    }

    if !missing.is_empty() {
        warn!("Environment variables using defaults: {:?}", missing);
    }
}
