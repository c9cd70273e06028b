//! Logging bootstrap shared by embedding hosts.

use log::LevelFilter;

/// Installs the colored logger and a panic hook that reports the owning
/// thread. Later calls keep the first logger.
pub fn init_logging() {
    let mut clog = colog::default_builder();
    clog.filter(None, LevelFilter::Debug);
    let _ = clog.try_init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));
}
