/*!
`mtpd`: one Meshed Tree Protocol daemon instance per emulated switch
(spec.md §2, §6).
*/
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use deku::prelude::*;
use tracing_subscriber::EnvFilter;

use mtpd::config::{self, ConfigFile};
use mtpd::daemon::{Daemon, FrameSink};
use mtpd::datalink::pnet::PnetPort;
use mtpd::error::DaemonError;
use mtpd::layer::{Ether, EtherType, Ipv4};
use mtpd::mtp::{decode_frame, MtpError, MtpMessage};
use mtpd::ports::PortHandle;
use mtpd::timers::now_ms;
use mtpd::{flood, forwarding, handshake, keepalive, signal};

#[derive(Parser)]
#[command(name = "mtpd", author, version, about = "Meshed Tree Protocol (MTP-DCN) switch daemon")]
struct Cli {
    /// Name prefix of this node's interfaces, e.g. `l1` or `t3`.
    node_name: String,
    /// Directory containing `<node_name>.conf`.
    config_dir: PathBuf,
    /// Raise the log level from info to debug.
    #[arg(short, long)]
    verbose: bool,
}

/// `FrameSink` backed by one `PnetPort` per classified interface.
struct RealSink {
    control: Vec<PnetPort>,
    compute: Option<PnetPort>,
}

impl FrameSink for RealSink {
    fn send_control(&mut self, port: PortHandle, frame: &[u8]) -> Result<(), DaemonError> {
        Ok(self.control[port.0].send(frame)?)
    }

    fn send_compute(&mut self, frame: &[u8]) -> Result<(), DaemonError> {
        match &mut self.compute {
            Some(c) => Ok(c.send(frame)?),
            None => Ok(()),
        }
    }
}

/// All diagnostics go to `<config_dir>/<node_name>.log` (spec.md §4.8, §6),
/// not stdout: `Arc<File>` fits `tracing_subscriber`'s `MakeWriter` directly,
/// since `&File` is itself `Write`.
fn init_tracing(verbose: bool, log_file: Arc<File>) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(log_file)
        .init();
}

fn dispatch_control(
    daemon: &mut Daemon,
    sink: &mut RealSink,
    port: PortHandle,
    bytes: &[u8],
    now: u64,
) -> Result<(), DaemonError> {
    let (_ether, msg) = decode_frame(bytes)?;
    match msg {
        MtpMessage::HelloNr { tier, vids } => handshake::handle_hello_nr(daemon, sink, port, tier, &vids),
        MtpMessage::JoinReq { vids } => handshake::handle_join_req(daemon, sink, port, &vids),
        MtpMessage::JoinRes { vids } => handshake::handle_join_res(daemon, sink, port, &vids),
        MtpMessage::JoinAck { vids } => handshake::handle_join_ack(daemon, sink, port, &vids),
        MtpMessage::StartHello => {
            handshake::handle_start_hello(daemon, port);
            Ok(())
        }
        MtpMessage::KeepAlive => keepalive::handle_keep_alive(daemon, sink, port, now),
        MtpMessage::FailureUpdate { option, vids } => {
            flood::handle_failure_update(daemon, sink, port, option, &vids)
        }
        MtpMessage::RecoverUpdate { option, vids } => {
            flood::handle_recover_update(daemon, sink, port, option, &vids)
        }
        MtpMessage::DataMsg { src_vid, dest_vid, payload } => {
            if daemon.is_leaf() {
                forwarding::leaf_egress(daemon, sink, &payload)
            } else {
                forwarding::spine_forward(daemon, sink, src_vid, dest_vid, &payload)
            }
        }
    }
}

fn dispatch_compute(daemon: &mut Daemon, sink: &mut RealSink, bytes: &[u8], now: u64) -> Result<(), DaemonError> {
    let (rest, ether) = Ether::from_bytes((bytes, 0)).map_err(MtpError::from)?;
    if ether.ether_type != EtherType::IPv4 {
        return Ok(());
    }
    let payload = rest.0;
    let (_rest, ipv4) = Ipv4::from_bytes((payload, 0)).map_err(MtpError::from)?;
    forwarding::leaf_ingress(daemon, sink, ipv4.src_addr(), ipv4.dst_addr(), payload, now)
}

fn run() -> Result<(), DaemonError> {
    let cli = Cli::parse();
    let log_file = Arc::new(config::open_node_log(&cli.config_dir, &cli.node_name)?);
    init_tracing(cli.verbose, log_file);

    let cfg = ConfigFile::read(&cli.config_dir, &cli.node_name)?;
    let (control_ifaces, compute_iface) = config::classify_interfaces(&cli.node_name, cfg.is_leaf());

    let mut daemon = Daemon::new(cli.node_name.clone(), &cfg, now_ms());
    let mut sink = RealSink {
        control: Vec::new(),
        compute: None,
    };

    for iface in &control_ifaces {
        let port = config::build_control_port(iface)?;
        daemon.add_control_port(port);
        sink.control.push(PnetPort::open(&iface.name)?);
    }

    if let Some(iface) = &compute_iface {
        daemon.my_vid = Some(config::derive_root_vid(iface)?);
        daemon.compute = Some(config::build_compute_port(iface)?);
        sink.compute = Some(PnetPort::open(&iface.name)?);
    }

    let shutdown = signal::install()?;

    tracing::info!(
        node = %daemon.node_name,
        tier = daemon.tier,
        top_spine = daemon.is_top_spine,
        control_ports = daemon.ports.len(),
        "mtpd started"
    );

    while !shutdown.load(Ordering::SeqCst) {
        let now = now_ms();

        handshake::start_bootstrap(&mut daemon, &mut sink, now)?;

        for handle in daemon.ports.handles().collect::<Vec<_>>() {
            if let Some(bytes) = sink.control[handle.0].try_recv()? {
                if let Err(e) = dispatch_control(&mut daemon, &mut sink, handle, &bytes, now) {
                    tracing::debug!(error = %e, "dropping malformed control frame");
                }
            }
        }

        if sink.compute.is_some() {
            let received = sink.compute.as_mut().expect("checked above").try_recv()?;
            if let Some(bytes) = received {
                if let Err(e) = dispatch_compute(&mut daemon, &mut sink, &bytes, now) {
                    tracing::debug!(error = %e, "dropping malformed compute frame");
                }
            }
        }

        keepalive::tick(&mut daemon, &mut sink, now)?;

        #[cfg(debug_assertions)]
        daemon.debug_assert_invariants();

        std::thread::sleep(Duration::from_millis(5));
    }

    // `tracing_subscriber::fmt().init()` installs a process-global
    // subscriber with no handle to swap its writer out mid-run, so the
    // per-node log closes the way any other fd does: when the process
    // exits and the last `Arc<File>` drops. node_down.log is a separate,
    // un-tracing'd file, so this ordering doesn't race it.
    tracing::info!("mtpd shutting down");
    signal::write_node_down_log()?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("mtpd: {}", e);
        std::process::exit(1);
    }
}
