//! Logger bootstrap

/// Initialize `env_logger`, honouring `RUST_LOG`.
///
/// Defaults to `info`, or `debug` when `verbose` is set. Calling it twice is
/// harmless, which keeps tests free to initialise logging themselves.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Route `log` to the browser console and panics to `console.error`
#[cfg(target_arch = "wasm32")]
pub fn init(verbose: bool) {
    console_error_panic_hook::set_once();
    let level = if verbose { log::Level::Debug } else { log::Level::Info };
    let _ = console_log::init_with_level(level);
}
