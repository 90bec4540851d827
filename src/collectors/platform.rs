//! Operating system family detection

use crate::data::{LinuxDistro, OsFamily};
use crate::utils::parsing::os_release_value;

/// Detect the running OS family. Linux hosts also resolve their distribution.
pub fn detect_os_family() -> OsFamily {
    family_for(std::env::consts::OS, read_os_release)
}

fn family_for(target_os: &str, os_release: impl FnOnce() -> Option<String>) -> OsFamily {
    match target_os {
        "windows" => OsFamily::Windows,
        "macos" => OsFamily::MacOs,
        "linux" => OsFamily::Linux(distro_from_os_release(
            os_release().as_deref().unwrap_or_default(),
        )),
        other => OsFamily::Other(other.to_string()),
    }
}

/// Resolve the distribution from os-release text
pub fn distro_from_os_release(content: &str) -> LinuxDistro {
    let id = os_release_value(content, "ID").unwrap_or_else(|| "unknown".to_string());
    let id_like = os_release_value(content, "ID_LIKE");
    LinuxDistro::from_os_release(&id, id_like.as_deref())
}

fn read_os_release() -> Option<String> {
    ["/etc/os-release", "/usr/lib/os-release"]
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_os_maps_to_family() {
        assert_eq!(family_for("windows", || None), OsFamily::Windows);
        assert_eq!(family_for("macos", || None), OsFamily::MacOs);
        assert_eq!(
            family_for("freebsd", || None),
            OsFamily::Other("freebsd".into())
        );
    }

    #[test]
    fn linux_reads_distribution() {
        let family = family_for("linux", || Some("ID=fedora\nVERSION_ID=39\n".into()));
        assert_eq!(family, OsFamily::Linux(LinuxDistro::Dnf { id: "fedora".into() }));
    }

    #[test]
    fn blank_id_is_unknown_distro() {
        let distro = distro_from_os_release("NAME=\"Custom\"\nID=\n");
        assert_eq!(distro, LinuxDistro::Unknown { id: "unknown".into() });
        assert_eq!(OsFamily::Linux(distro).to_string(), "linux (unknown)");
    }

    #[test]
    fn missing_os_release_is_unknown_distro() {
        let family = family_for("linux", || None);
        assert_eq!(
            family,
            OsFamily::Linux(LinuxDistro::Unknown { id: "unknown".into() })
        );
    }
}
