/*!
Failure / recover flood: scoped propagation of unreachability and
reachability between downstream (accepted) and upstream (offered) peers,
with clean/dirty gating (spec.md §4.5).
*/
use crate::daemon::{Daemon, FrameSink};
use crate::error::DaemonError;
use crate::mtp::{MtpMessage, UpdateOption, Vid, VidList};
use crate::ports::PortHandle;

fn send_update(
    daemon: &Daemon,
    sink: &mut impl FrameSink,
    ports: &[PortHandle],
    make: impl Fn(UpdateOption, VidList) -> MtpMessage,
    option: UpdateOption,
    vids: &std::collections::BTreeSet<Vid>,
) -> Result<(), DaemonError> {
    if vids.is_empty() {
        return Ok(());
    }
    let vids: Vec<Vid> = vids.iter().cloned().collect();
    let msg = make(option, VidList::from_vids(&vids));
    daemon.send_to_many(sink, ports, &msg)
}

/// A port just went down. Run the asymmetric failure-flood described in
/// spec.md §4.5.
pub fn run_failure(
    daemon: &Daemon,
    sink: &mut impl FrameSink,
    failed_port: PortHandle,
) -> Result<(), DaemonError> {
    if daemon.all_offered_ports_down() && !daemon.is_top_spine {
        let vids = daemon.accepted.all_vids();
        let out = daemon.up_accepted_ports();
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::FailureUpdate { option: o, vids: v },
            UpdateOption::Reachable,
            &vids,
        );
    }

    if daemon.is_accepted_port(failed_port) {
        let vids = daemon
            .accepted
            .find(failed_port)
            .map(|e| e.vids.clone())
            .unwrap_or_default();
        let out = daemon.up_ports_except(failed_port);
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::FailureUpdate { option: o, vids: v },
            UpdateOption::Unreachable,
            &vids,
        );
    }

    if !daemon.offered.all_clean() {
        let vids = daemon.offered.all_unreachable();
        let out = daemon.up_offered_ports();
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::FailureUpdate { option: o, vids: v },
            UpdateOption::Unreachable,
            &vids,
        );
    }

    Ok(())
}

/// A port just came back up (`continue_count` reached 3). Mirror-image of
/// [`run_failure`]. `was_isolated` is whether every offered port (including
/// `recovered_port` itself) was down immediately before this recovery —
/// callers must snapshot it before marking `recovered_port` back up, since
/// by the time this runs `recovered_port` is already up and the live check
/// would never see the isolated state it exists to catch.
pub fn run_recover(
    daemon: &Daemon,
    sink: &mut impl FrameSink,
    recovered_port: PortHandle,
    was_isolated: bool,
) -> Result<(), DaemonError> {
    if daemon.is_accepted_port(recovered_port) {
        let vids = daemon
            .accepted
            .find(recovered_port)
            .map(|e| e.vids.clone())
            .unwrap_or_default();
        let out = daemon.up_ports_except(recovered_port);
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::RecoverUpdate { option: o, vids: v },
            UpdateOption::Unreachable,
            &vids,
        );
    }

    if was_isolated && !daemon.is_top_spine {
        let vids = daemon.accepted.all_vids();
        let out = daemon.up_accepted_ports();
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::RecoverUpdate { option: o, vids: v },
            UpdateOption::Reachable,
            &vids,
        );
    }

    let vids = daemon.offered.all_unreachable();
    let out = daemon.up_offered_ports();
    send_update(
        daemon,
        sink,
        &out,
        |o, v| MtpMessage::RecoverUpdate { option: o, vids: v },
        UpdateOption::Unreachable,
        &vids,
    )
}

/// FAILURE_UPDATE received on port `q`.
pub fn handle_failure_update(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    q: PortHandle,
    option: UpdateOption,
    vids: &VidList,
) -> Result<(), DaemonError> {
    let parsed = vids.to_vids()?;

    if daemon.is_accepted_port(q) {
        {
            let entry = daemon.accepted.entry(q);
            for vid in &parsed {
                entry.unreachable.insert(vid.clone());
            }
        }
        let out = daemon.up_ports_except(q);
        let vids: std::collections::BTreeSet<Vid> = parsed.into_iter().collect();
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::FailureUpdate { option: o, vids: v },
            UpdateOption::Unreachable,
            &vids,
        );
    }

    if daemon.is_offered_port(q) {
        {
            let entry = daemon.offered.entry(q);
            entry.reachable.clear();
            match option {
                UpdateOption::Unreachable => {
                    for vid in &parsed {
                        entry.unreachable.insert(vid.clone());
                    }
                }
                UpdateOption::Reachable => {
                    for vid in &parsed {
                        entry.reachable.insert(vid.clone());
                    }
                }
            }
        }

        if daemon.is_leaf() {
            return Ok(());
        }

        if !daemon.offered.all_clean() {
            let vids = daemon.offered.all_unreachable();
            let out = daemon.up_accepted_ports();
            return send_update(
                daemon,
                sink,
                &out,
                |o, v| MtpMessage::FailureUpdate { option: o, vids: v },
                UpdateOption::Unreachable,
                &vids,
            );
        }
    }

    Ok(())
}

/// RECOVER_UPDATE received on port `q`: mirror-image of [`handle_failure_update`].
pub fn handle_recover_update(
    daemon: &mut Daemon,
    sink: &mut impl FrameSink,
    q: PortHandle,
    option: UpdateOption,
    vids: &VidList,
) -> Result<(), DaemonError> {
    let parsed = vids.to_vids()?;

    if daemon.is_accepted_port(q) {
        {
            let entry = daemon.accepted.entry(q);
            for vid in &parsed {
                entry.unreachable.remove(vid);
            }
        }
        let out = daemon.up_ports_except(q);
        let vids: std::collections::BTreeSet<Vid> = parsed.into_iter().collect();
        return send_update(
            daemon,
            sink,
            &out,
            |o, v| MtpMessage::RecoverUpdate { option: o, vids: v },
            UpdateOption::Unreachable,
            &vids,
        );
    }

    if daemon.is_offered_port(q) {
        let was_dirty = !daemon.offered.all_clean();

        {
            let entry = daemon.offered.entry(q);
            match option {
                UpdateOption::Unreachable => {
                    for vid in &parsed {
                        entry.unreachable.remove(vid);
                    }
                }
                UpdateOption::Reachable => {
                    for vid in &parsed {
                        entry.reachable.remove(vid);
                    }
                }
            }
        }

        if daemon.is_leaf() {
            return Ok(());
        }

        let is_dirty = !daemon.offered.all_clean();
        if was_dirty && is_dirty {
            let vids = daemon.offered.all_unreachable();
            let out = daemon.up_accepted_ports();
            return send_update(
                daemon,
                sink,
                &out,
                |o, v| MtpMessage::RecoverUpdate { option: o, vids: v },
                UpdateOption::Unreachable,
                &vids,
            );
        }
    }

    Ok(())
}
