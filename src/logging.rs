use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` wins over `level`. Output goes to stderr so it never mixes
/// with the board on stdout.
pub fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}
