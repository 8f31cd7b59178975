use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

fn build_filter(verbosity_level: Level) -> Result<EnvFilter> {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("tokio=error".parse()?);

    Ok(filter)
}

/// Initialize logging with a pretty fmt layer and env-based filtering.
///
/// # Errors
///
/// Returns an error if subscriber initialization fails, including when a
/// global subscriber is already set.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let fmt_layer = fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_target(false)
        .pretty();

    let filter = build_filter(verbosity_level)?;

    let subscriber = Registry::default().with(fmt_layer).with(filter);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build_filter;
    use tracing::Level;

    #[test]
    fn build_filter_accepts_all_levels() {
        assert!(build_filter(Level::ERROR).is_ok());
        assert!(build_filter(Level::DEBUG).is_ok());
        assert!(build_filter(Level::TRACE).is_ok());
    }
}
