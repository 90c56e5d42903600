// Reduce a raw Docker stats sample into ContainerStats.

use super::model::ContainerStats;
use bollard::models::{ContainerCpuStats, ContainerMemoryStats, ContainerStatsResponse};

/// Computes percentages and totals from one stats sample. The daemon fills
/// `precpu_stats` with the previous reading, so a single sample carries both
/// points of the CPU delta.
pub(crate) fn process_statistics(s: &ContainerStatsResponse) -> ContainerStats {
    let cpu_percent = cpu_percent(s.cpu_stats.as_ref(), s.precpu_stats.as_ref());

    let (memory_usage, memory_limit) = s
        .memory_stats
        .as_ref()
        .map_or((0, 0), |m| (memory_usage(m), m.limit.unwrap_or(0)));
    let memory_percent = if memory_limit > 0 {
        memory_usage as f64 / memory_limit as f64 * 100.0
    } else {
        0.0
    };

    let (network_in, network_out) = s.networks.as_ref().map_or((0u64, 0u64), |n| {
        n.values().fold((0u64, 0u64), |(rx, tx), v| {
            (rx + v.rx_bytes.unwrap_or(0), tx + v.tx_bytes.unwrap_or(0))
        })
    });

    let (block_read, block_write) = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map_or((0u64, 0u64), |b| {
            let mut read = 0u64;
            let mut write = 0u64;
            for e in b {
                if e.op
                    .as_ref()
                    .is_some_and(|op| op.eq_ignore_ascii_case("read"))
                {
                    read += e.value.unwrap_or(0);
                } else if e
                    .op
                    .as_ref()
                    .is_some_and(|op| op.eq_ignore_ascii_case("write"))
                {
                    write += e.value.unwrap_or(0);
                }
            }
            (read, write)
        });

    let pids = s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0);

    ContainerStats {
        cpu_percent,
        memory_usage,
        memory_limit,
        memory_percent,
        network_in,
        network_out,
        block_read,
        block_write,
        pids,
    }
}

fn cpu_percent(cpu: Option<&ContainerCpuStats>, precpu: Option<&ContainerCpuStats>) -> f64 {
    let (Some(cpu), Some(precpu)) = (cpu, precpu) else {
        return 0.0;
    };
    let total = |c: &ContainerCpuStats| {
        c.cpu_usage
            .as_ref()
            .and_then(|u| u.total_usage)
            .unwrap_or(0) as i64
    };
    let cpu_delta = total(cpu) - total(precpu);
    let system_delta =
        cpu.system_cpu_usage.unwrap_or(0) as i64 - precpu.system_cpu_usage.unwrap_or(0) as i64;
    if system_delta <= 0 {
        return 0.0;
    }

    // Older daemons leave online_cpus unset; fall back to the per-CPU vector.
    let online = match cpu.online_cpus {
        Some(n) if n > 0 => n as f64,
        _ => cpu
            .cpu_usage
            .as_ref()
            .and_then(|u| u.percpu_usage.as_ref())
            .map_or(0.0, |p| p.len() as f64),
    };

    (cpu_delta as f64 / system_delta as f64) * online * 100.0
}

/// Usage minus page cache: `cache` on cgroup v1, `inactive_file` on v2.
fn memory_usage(m: &ContainerMemoryStats) -> u64 {
    let usage = m.usage.unwrap_or(0);
    let cache = m
        .stats
        .as_ref()
        .and_then(|s| s.get("cache").or_else(|| s.get("inactive_file")).copied())
        .unwrap_or(0);
    usage.saturating_sub(cache)
}
