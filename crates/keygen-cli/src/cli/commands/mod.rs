use super::args::*;

pub mod cache;
pub mod validate;

use crate::exit_codes::EXIT_INTERNAL_ERROR;
use keygen_verify::{VerifiedPayload, VerifyError};

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Validate(args) => validate::run(args).await,
        Command::Cache(args) => match args.cmd {
            CacheSub::Check(check_args) => cache::cmd_check(check_args).await,
            CacheSub::List(list_args) => cache::cmd_list(list_args).await,
            CacheSub::Evict(evict_args) => cache::cmd_evict(evict_args).await,
            CacheSub::Clear(clear_args) => cache::cmd_clear(clear_args).await,
        },
    }
}

/// Print a one-line diagnostic and pick the exit code for a fatal error.
pub fn report_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<VerifyError>() {
        Some(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
        None => {
            eprintln!("error: {:#}", err);
            EXIT_INTERNAL_ERROR
        }
    }
}

/// Human-readable summary of a validation payload.
pub(crate) fn describe(payload: &VerifiedPayload) -> String {
    match payload.meta() {
        Some(meta) => {
            let detail = meta.detail.as_deref().unwrap_or("-");
            let code = meta.code.as_deref().unwrap_or("-");
            if meta.valid {
                format!("License is valid! detail={} code={}", detail, code)
            } else {
                format!("License invalid! detail={} code={}", detail, code)
            }
        }
        None => "Response carries no validation metadata".to_string(),
    }
}

pub(crate) fn print_payload(payload: &VerifiedPayload, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(payload.as_map())?);
    } else {
        println!("{}", describe(payload));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_error_uses_library_exit_code() {
        let err = anyhow::Error::new(VerifyError::CacheTampered {
            key: "validate".to_string(),
            reason: "signature mismatch".to_string(),
        });
        assert_eq!(report_error(&err), 4);
    }

    #[test]
    fn test_report_error_other_errors() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(report_error(&err), EXIT_INTERNAL_ERROR);
    }

    #[test]
    fn test_config_error_is_not_internal_error() {
        let err = anyhow::Error::new(VerifyError::Config {
            message: "invalid public key".to_string(),
        });
        assert_eq!(report_error(&err), 1);
        assert_ne!(report_error(&err), EXIT_INTERNAL_ERROR);
    }
}
