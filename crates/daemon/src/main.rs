//! brim Daemon
//!
//! A single-instance daemon that draws decorative borders around
//! application windows.
//!
//! Responsibilities:
//! - Detect an already-running instance and forward directives to it
//! - Maintain the registry of tracked windows
//! - Apply configuration directives from the command line, the rc file,
//!   and the coordination socket
//! - Dispatch the minimal redraw action per applied message

mod config;
mod windows;

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use brim_core_state::{parse_directive, Settings, UpdateMask};
use brim_ipc::{decode_message, encode_args, socket_path};
use brim_platform::headless::{HeadlessRenderer, HeadlessWindowSystem};
use brim_platform::{WindowEvent, WindowSystem};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use windows::WindowManager;

/// Events the daemon run loop processes.
enum DaemonEvent {
    /// An inbound wire message from a forwarding client.
    Message(Vec<u8>),
    /// A window lifecycle event from the window system.
    Window(WindowEvent),
    /// Shutdown signal.
    Shutdown,
}

/// Queue depth of the run-loop event channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Parser)]
#[command(
    name = "brim",
    version,
    disable_version_flag = true,
    about = "Draws decorative borders around application windows",
    after_help = "Directives are key=value tokens, e.g. `brim border_width=6`.\n\
                  When an instance is already running, directives are forwarded to it.\n\
                  See the project documentation for the full directive list."
)]
struct Cli {
    /// Print version information and exit.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Configuration directives to apply (`key=value`).
    #[arg(value_name = "DIRECTIVE")]
    directives: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Probe the well-known name. Its existence is the sole signal that an
    // instance is already serving this session.
    let socket = socket_path();
    match std::os::unix::net::UnixStream::connect(&socket) {
        Ok(stream) => return forward_to_server(stream, &cli.directives),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) if err.kind() == std::io::ErrorKind::ConnectionRefused => {
            // A previous instance died without unlinking its socket.
            info!("removing stale socket at {}", socket.display());
            std::fs::remove_file(&socket).with_context(|| {
                format!("failed to remove stale socket {}", socket.display())
            })?;
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to probe {}", socket.display()));
        }
    }

    run_server(&socket, cli.directives)
}

/// Forward this invocation's directives to the running instance and exit.
///
/// An invocation with no actionable directive is a conflict, not a
/// forward: starting a second server would break the single-instance
/// guarantee, so the process reports it and fails instead.
fn forward_to_server(
    mut stream: std::os::unix::net::UnixStream,
    directives: &[String],
) -> Result<()> {
    let mut probe = Settings::default();
    let mut mask = UpdateMask::NONE;
    for token in directives {
        match parse_directive(&mut probe, token) {
            Ok(bits) => mask |= bits,
            Err(err) => warn!("{}", err),
        }
    }

    if mask.is_empty() {
        bail!(
            "a brim instance is already running and no valid directives were \
             provided; to modify the running instance, pass directives as arguments"
        );
    }

    let message = encode_args(directives)?;
    stream
        .write_all(&message)
        .context("failed to send directives to the running instance")?;
    info!(
        "forwarded {} directive(s) to the running instance",
        directives.len()
    );
    Ok(())
}

/// Become the server: claim the endpoint, bootstrap the window registry,
/// then serve wire messages and window events on one cooperative loop
/// until shutdown is requested.
#[tokio::main(flavor = "current_thread")]
async fn run_server(socket: &Path, directives: Vec<String>) -> Result<()> {
    info!("brim {} starting", env!("CARGO_PKG_VERSION"));

    let mut settings = Settings::default();
    let mut startup_mask = UpdateMask::NONE;
    for token in &directives {
        match parse_directive(&mut settings, token) {
            Ok(bits) => startup_mask |= bits,
            Err(err) => warn!("{}", err),
        }
    }

    // The rc file only applies when the command line had nothing to say.
    if startup_mask.is_empty() {
        for token in config::load_directives()? {
            if let Err(err) = parse_directive(&mut settings, &token) {
                warn!("rc file: {}", err);
            }
        }
    }

    // Claiming the well-known name is the registration step. Two processes
    // can both observe "not found" and race here; the loser's bind fails
    // and is fatal.
    let listener = UnixListener::bind(socket).map_err(|err| {
        if err.kind() == std::io::ErrorKind::AddrInUse {
            anyhow::anyhow!("another brim instance claimed {} first", socket.display())
        } else {
            anyhow::Error::from(err)
                .context(format!("failed to bind {}", socket.display()))
        }
    })?;
    info!("serving on {}", socket.display());

    let mut window_system = HeadlessWindowSystem::new();
    let window_events = window_system
        .subscribe()
        .context("window event subscription failed")?;

    let mut manager = WindowManager::new(HeadlessRenderer::new());
    let tracked = manager
        .bootstrap(&window_system, &settings)
        .context("window enumeration failed")?;
    info!("tracking {} existing window(s)", tracked);

    let (event_tx, mut event_rx) = mpsc::channel::<DaemonEvent>(EVENT_CHANNEL_CAPACITY);

    // Accept task: each client connection carries one wire message, read
    // to EOF and handed to the run loop.
    let accept_tx = event_tx.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _)) => {
                    let mut buf = Vec::new();
                    match stream.read_to_end(&mut buf).await {
                        Ok(_) => {
                            if accept_tx.send(DaemonEvent::Message(buf)).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!("failed to read client message: {}", err),
                    }
                }
                Err(err) => warn!("failed to accept client: {}", err),
            }
        }
    });

    // Bridge the window system's sync event stream onto the loop channel.
    spawn_forwarding_thread("window-events", window_events, event_tx.clone())?;

    // Ctrl-C requests a graceful shutdown.
    let shutdown_tx = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(DaemonEvent::Shutdown).await;
        }
    });

    // The run loop exclusively owns the settings and the window registry;
    // messages and events are processed strictly in arrival order.
    while let Some(event) = event_rx.recv().await {
        match event {
            DaemonEvent::Message(buf) => {
                let mask = apply_message(&mut settings, &buf);
                manager.dispatch(mask, &settings);
            }
            DaemonEvent::Window(event) => {
                manager.handle_event(event, &window_system, &settings);
            }
            DaemonEvent::Shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    if let Err(err) = std::fs::remove_file(socket) {
        warn!("failed to remove {}: {}", socket.display(), err);
    }
    Ok(())
}

/// Decode one wire message and apply its directives, OR-combining the
/// update-mask bits across the whole message. Bad tokens are logged and
/// skipped; whatever parsed cleanly is applied.
fn apply_message(settings: &mut Settings, buf: &[u8]) -> UpdateMask {
    let mut mask = UpdateMask::NONE;
    for token in decode_message(buf) {
        match parse_directive(settings, &token) {
            Ok(bits) => {
                debug!(directive = %token, "applied");
                mask |= bits;
            }
            Err(err) => warn!("{}", err),
        }
    }
    mask
}

/// Forward events from a sync receiver onto the run-loop channel.
fn spawn_forwarding_thread(
    name: &str,
    receiver: std::sync::mpsc::Receiver<WindowEvent>,
    sender: mpsc::Sender<DaemonEvent>,
) -> Result<()> {
    std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            while let Ok(event) = receiver.recv() {
                if sender.blocking_send(DaemonEvent::Window(event)).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .map_err(|err| anyhow::anyhow!("failed to spawn {} thread: {}", name, err))
}
