//! Logger initialization.
//!
//! Library code only talks to the `log` facade.  Natively the binary
//! and the tests install `env_logger` through [`init_logging`]; in the
//! browser `web::start` installs a console logger that formats lines
//! with [`console_line`].

#[cfg(not(target_arch = "wasm32"))]
pub use native::{init_logging, LoggingConfig};

/// One console line: `LEVEL target: message`.
pub fn console_line(record: &log::Record<'_>) -> String {
    format!("{} {}: {}", record.level(), record.target(), record.args())
}

/// Default filter for records outside `RUST_LOG` control: `info`, with
/// wgpu's internals held at `warn`.
pub fn default_level(target: &str) -> log::LevelFilter {
    const NOISY: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];
    if NOISY.iter().any(|prefix| target.starts_with(prefix)) {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::Once;

    /// Logger configuration.
    ///
    /// `env_filter` follows the `env_logger` filter syntax
    /// (e.g. `"debug"` or `"gpu_vector_add=debug,wgpu_core=warn"`).
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub env_filter: Option<String>,
        pub write_style: env_logger::WriteStyle,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                env_filter: None,
                write_style: env_logger::WriteStyle::Auto,
            }
        }
    }

    static INIT: Once = Once::new();

    /// Initializes the global logger once; later calls are ignored.
    ///
    /// Filter precedence: `config.env_filter`, then `RUST_LOG`, then
    /// [`super::default_level`].
    pub fn init_logging(config: LoggingConfig) {
        INIT.call_once(|| {
            let mut builder = env_logger::Builder::new();

            if let Some(filter) = config.env_filter {
                builder.parse_filters(&filter);
            } else if let Ok(filter) = std::env::var("RUST_LOG") {
                builder.parse_filters(&filter);
            } else {
                builder.filter_level(super::default_level(""));
                for module in ["wgpu_core", "wgpu_hal", "naga"] {
                    builder.filter_module(module, super::default_level(module));
                }
            }

            builder.write_style(config.write_style);
            // A test harness may already have installed a logger.
            if builder.try_init().is_err() {
                return;
            }

            log::debug!("logging initialized");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_line_carries_level_target_and_message() {
        let line = console_line(
            &log::Record::builder()
                .level(log::Level::Debug)
                .target("gpu_vector_add::compute")
                .args(format_args!("dispatched {} workgroups", 1000))
                .build(),
        );
        assert_eq!(line, "DEBUG gpu_vector_add::compute: dispatched 1000 workgroups");
    }

    #[test]
    fn wgpu_internals_are_quieter_than_the_crate() {
        assert_eq!(default_level("wgpu_core::device"), log::LevelFilter::Warn);
        assert_eq!(default_level("naga::front::wgsl"), log::LevelFilter::Warn);
        assert_eq!(default_level("gpu_vector_add::buffer"), log::LevelFilter::Info);
    }
}
