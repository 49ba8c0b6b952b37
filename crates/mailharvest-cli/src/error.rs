use anyhow::Error;
use mailharvest_config::ConfigError;
use mailharvest_core::CoreError;
use mailharvest_sheets::SheetsError;
use std::process::ExitCode;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(sheets_err) = cause.downcast_ref::<SheetsError>() {
            return ExitCode::from(sheets_exit_code(sheets_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
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
        | ConfigError::MissingKey(_)
        | ConfigError::EmptySources
        | ConfigError::InvalidSourceRange { .. }
        | ConfigError::InvalidAnchor { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn sheets_exit_code(err: &SheetsError) -> u8 {
    match err {
        SheetsError::WorkbookNotFound(_) | SheetsError::SheetNotFound(_) => EXIT_NOT_FOUND,
        SheetsError::CredentialsNotFound(_) | SheetsError::Core(_) => EXIT_INVALID_INPUT,
        SheetsError::Io(_)
        | SheetsError::Http(_)
        | SheetsError::Url(_)
        | SheetsError::Json(_)
        | SheetsError::Auth(_)
        | SheetsError::Api { .. } => EXIT_FAILURE,
    }
}
