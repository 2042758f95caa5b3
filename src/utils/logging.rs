use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system.
///
/// Console output goes to stderr so results printed on stdout stay parseable.
pub fn init_logging(verbose: bool, log_file: Option<PathBuf>) -> Result<()> {
    // Our own crate follows --verbose, dependencies only report warnings
    let env_filter = EnvFilter::from_default_env()
        .add_directive(crate_directive(verbose).parse()?)
        .add_directive("warn".parse()?);

    // Console layer, kept off stdout
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Optional plain-text copy of every line
    let file_layer = match log_file {
        Some(log_file) => {
            if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let file = fs::File::create(log_file)?;
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn crate_directive(verbose: bool) -> &'static str {
    if verbose {
        "job_scraper=debug"
    } else {
        "job_scraper=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_directive_follows_verbosity() {
        assert_eq!(crate_directive(true), "job_scraper=debug");
        assert_eq!(crate_directive(false), "job_scraper=info");
        assert!(crate_directive(false).parse::<tracing_subscriber::filter::Directive>().is_ok());
    }
}
