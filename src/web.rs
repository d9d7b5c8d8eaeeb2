//! Browser entry point.
//!
//! Routes `log` records to the developer console, runs the pipeline
//! once when the module is instantiated and writes the result, or the
//! failure message, to the console.

use wasm_bindgen::prelude::*;

use crate::compute::run;
use crate::context::ContextOptions;
use crate::inputs::Inputs;
use crate::kernel::KernelParams;
use crate::logging::{console_line, default_level};

/// Sends each record to the console method matching its level.  The
/// crate's own stage transitions are kept down to `debug`.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        let max = if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            log::LevelFilter::Debug
        } else {
            default_level(metadata.target())
        };
        metadata.level() <= max
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from(console_line(record));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

#[wasm_bindgen(start)]
pub fn start() {
    // Fails only if the embedding page already installed a logger.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Debug);
    }

    wasm_bindgen_futures::spawn_local(async {
        let options = ContextOptions::default();
        match run(&options, KernelParams::default(), &Inputs::default()).await {
            Ok(result) => web_sys::console::log_1(&format!("{result:?}").into()),
            Err(err) => web_sys::console::error_1(&err.to_string().into()),
        }
    });
}
