use anyhow::Error;
use leadquiz_config::ConfigError;
use leadquiz_core::domain::PhoneRejection;
use leadquiz_core::CoreError;
use leadquiz_services::ServiceError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(service_err) = cause.downcast_ref::<ServiceError>() {
            return ExitCode::from(service_exit_code(service_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(_phone_err) = cause.downcast_ref::<PhoneRejection>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidWebhookUrl(_)
        | ConfigError::InvalidEndpoint(_)
        | ConfigError::InvalidField { .. }
        | ConfigError::InvalidSequenceWindow(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn service_exit_code(err: &ServiceError) -> u8 {
    match err {
        ServiceError::Unavailable(_) | ServiceError::MissingApiKey(_) => EXIT_INVALID_INPUT,
        ServiceError::Core(_)
        | ServiceError::Json(_)
        | ServiceError::Parse(_)
        | ServiceError::EmptyResponse(_) => EXIT_FAILURE,
        #[cfg(feature = "remote")]
        ServiceError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "remote")]
        ServiceError::Url(_) => EXIT_INVALID_INPUT,
    }
}
