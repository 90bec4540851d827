//! Host identification collection (uname, CPU brand)

use crate::data::HostProfile;
use crate::utils::parsing::{extract_after_colon, or_unknown};

/// Kernel identification as returned by uname(2)
#[derive(Debug, Clone, Default)]
struct Uname {
    system: String,
    node: String,
    release: String,
    version: String,
    machine: String,
}

/// Read a fresh host profile. Never fails: unreadable fields become "unknown".
pub fn report() -> HostProfile {
    // Kernel identification and CPU brand come from different sources
    let (uname, processor) = rayon::join(read_uname, read_processor);

    HostProfile {
        system: or_unknown(uname.system),
        node_name: or_unknown(uname.node),
        release: or_unknown(uname.release),
        version: or_unknown(uname.version),
        machine: or_unknown(uname.machine),
        processor: or_unknown(processor),
    }
}

#[cfg(unix)]
fn read_uname() -> Uname {
    use std::ffi::CStr;

    fn field(raw: &[libc::c_char]) -> String {
        // SAFETY: uname NUL-terminates every field within its buffer.
        unsafe { CStr::from_ptr(raw.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    // SAFETY: utsname is plain old data; zeroed is a valid initial state.
    let mut buf: libc::utsname = unsafe { std::mem::zeroed() };
    // SAFETY: buf is a valid, writable utsname.
    if unsafe { libc::uname(&mut buf) } != 0 {
        tracing::debug!(error = %std::io::Error::last_os_error(), "uname failed");
        return Uname::default();
    }

    Uname {
        system: field(&buf.sysname),
        node: field(&buf.nodename),
        release: field(&buf.release),
        version: field(&buf.version),
        machine: field(&buf.machine),
    }
}

#[cfg(windows)]
fn read_uname() -> Uname {
    use crate::utils::command::run_command;

    // `ver` prints e.g. "Microsoft Windows [Version 10.0.19045.3930]"
    let release = run_command("cmd", &["/C", "ver"])
        .ok()
        .and_then(|out| {
            out.split("Version")
                .nth(1)
                .map(|v| v.trim_matches(|c: char| c == ']' || c.is_whitespace()).to_string())
        })
        .unwrap_or_default();
    let major = release.split('.').next().unwrap_or_default().to_string();

    Uname {
        system: "Windows".to_string(),
        node: std::env::var("COMPUTERNAME").unwrap_or_default(),
        release: major,
        version: release,
        machine: std::env::var("PROCESSOR_ARCHITECTURE")
            .unwrap_or_else(|_| std::env::consts::ARCH.to_string()),
    }
}

#[cfg(not(any(unix, windows)))]
fn read_uname() -> Uname {
    Uname {
        system: std::env::consts::OS.to_string(),
        machine: std::env::consts::ARCH.to_string(),
        ..Uname::default()
    }
}

#[cfg(target_os = "linux")]
fn read_processor() -> String {
    std::fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|content| cpu_model_name(&content))
        .unwrap_or_default()
}

#[cfg(target_os = "macos")]
fn read_processor() -> String {
    crate::utils::command::run_command("sysctl", &["-n", "machdep.cpu.brand_string"])
        .unwrap_or_default()
}

#[cfg(windows)]
fn read_processor() -> String {
    std::env::var("PROCESSOR_IDENTIFIER").unwrap_or_default()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn read_processor() -> String {
    String::new()
}

/// First CPU model string in /proc/cpuinfo content
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn cpu_model_name(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        // ARM kernels report "Processor" or "model name"
        .find(|line| line.starts_with("model name") || line.starts_with("Processor"))
        .and_then(extract_after_colon)
}
