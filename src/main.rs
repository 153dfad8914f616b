use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use studio_desk::browser::{
    HttpListingSource, MemoryObjectStore, ObjectStoreSource, TreePath, TreeSource,
};
use studio_desk::components::Profile;
use studio_desk::config::DeskConfig;
use studio_desk::constants::FRAME_INTERVAL;
use studio_desk::drivers::OutputDriver;
use studio_desk::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use studio_desk::geometry::{FileKv, GeometryStore, KeyValueStore, MemoryKv};
use studio_desk::log_buffer::{LogHandle, install_panic_hook, set_global_log};
use studio_desk::runner;
use studio_desk::shell::{HostShell, desk_viewport};
use studio_desk::tracing_sub;
use studio_desk::window::WindowManager;

#[derive(Parser, Debug)]
#[command(version, about = "Terminal studio desk with a remote audio library")]
struct Args {
    /// Config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP listing endpoint; overrides `listing.url`.
    #[arg(long, value_name = "URL")]
    listing_url: Option<String>,

    /// Browse the built-in demo library even when a URL is configured.
    #[arg(long)]
    demo: bool,

    /// Where window geometry is persisted.
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,

    /// Folder the library opens on.
    #[arg(long, value_name = "PATH")]
    start_path: Option<String>,

    #[arg(long)]
    user: Option<String>,

    #[arg(long)]
    role: Option<String>,

    /// trace, debug, info, warn or error.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut config = DeskConfig::load(args.config.as_deref()).map_err(io::Error::other)?;
    apply_overrides(&mut config, &args);
    config.validate().map_err(io::Error::other)?;

    let log = LogHandle::new(config.log.max_lines);
    set_global_log(log.clone());
    install_panic_hook();
    tracing_sub::init(tracing_sub::parse_level(&config.log.level));

    let kv: Arc<dyn KeyValueStore> = match config.state_file_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "window geometry file");
            Arc::new(FileKv::open(path))
        }
        None => Arc::new(MemoryKv::new()),
    };

    let source: Arc<dyn TreeSource> = match (&config.listing.url, args.demo) {
        (Some(url), false) => {
            tracing::info!(url = %url, "remote library");
            let http = HttpListingSource::new(url.clone(), config.listing_timeout())
                .map_err(io::Error::other)?;
            Arc::new(http)
        }
        _ => {
            tracing::info!("demo library");
            Arc::new(ObjectStoreSource::new(MemoryObjectStore::demo()))
        }
    };

    let mut output = ConsoleOutputDriver::new()?;
    let (width, height) = output.size()?;
    let windows = WindowManager::new(GeometryStore::new(kv), desk_viewport(width, height))
        .with_defaults(config.geometry_defaults())
        .with_limits(config.size_limits());
    let mut shell = HostShell::new(windows, source, config.profile.clone())
        .with_browser_options(config.browser_options())
        .with_log(log);

    runner::run(&mut shell, ConsoleInputDriver::new(), &mut output, FRAME_INTERVAL)
}

fn apply_overrides(config: &mut DeskConfig, args: &Args) {
    if let Some(url) = &args.listing_url {
        config.listing.url = Some(url.clone());
    }
    if let Some(path) = &args.state_file {
        config.state_file = Some(path.clone());
    }
    if let Some(start) = &args.start_path {
        config.listing.start_path = TreePath::parse(start).as_str().to_string();
    }
    if let Some(level) = &args.log_level {
        config.log.level = level.clone();
    }
    if args.user.is_some() || args.role.is_some() {
        let current = std::mem::take(&mut config.profile);
        config.profile = Profile::new(
            args.user.clone().unwrap_or(current.name),
            args.role.clone().unwrap_or(current.role),
        );
    }
}
