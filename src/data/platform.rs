//! Operating system families and Linux distribution mapping

use std::fmt;

/// Package manager family of a Linux distribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinuxDistro {
    Apt { id: String },     // Debian, Ubuntu
    Dnf { id: String },     // Fedora, CentOS
    Pacman { id: String },  // Arch Linux
    Unknown { id: String },
}

impl LinuxDistro {
    /// Map an os-release `ID` to its package family
    pub fn from_id(id: &str) -> Self {
        Self::from_os_release(id, None)
    }

    /// Map `ID`, falling back to each `ID_LIKE` token in order
    pub fn from_os_release(id: &str, id_like: Option<&str>) -> Self {
        let id = id.trim().to_lowercase();
        let family = family_of(&id).or_else(|| {
            id_like
                .unwrap_or_default()
                .split_whitespace()
                .find_map(|like| family_of(&like.to_lowercase()))
        });

        match family {
            Some(Family::Apt) => LinuxDistro::Apt { id },
            Some(Family::Dnf) => LinuxDistro::Dnf { id },
            Some(Family::Pacman) => LinuxDistro::Pacman { id },
            None => LinuxDistro::Unknown { id },
        }
    }

    /// The distribution identifier as reported by the host
    pub fn id(&self) -> &str {
        match self {
            LinuxDistro::Apt { id }
            | LinuxDistro::Dnf { id }
            | LinuxDistro::Pacman { id }
            | LinuxDistro::Unknown { id } => id,
        }
    }
}

enum Family {
    Apt,
    Dnf,
    Pacman,
}

fn family_of(id: &str) -> Option<Family> {
    match id {
        "ubuntu" | "debian" => Some(Family::Apt),
        "fedora" | "centos" => Some(Family::Dnf),
        "arch" => Some(Family::Pacman),
        _ => None,
    }
}

/// Operating system family, decided once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    MacOs,
    Linux(LinuxDistro),
    Other(String),
}

impl OsFamily {
    /// Family key used for inventory commands and log messages
    pub fn name(&self) -> &str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::MacOs => "darwin",
            OsFamily::Linux(_) => "linux",
            OsFamily::Other(name) => name,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Linux(distro) => write!(f, "linux ({})", distro.id()),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_map_to_families() {
        assert!(matches!(LinuxDistro::from_id("ubuntu"), LinuxDistro::Apt { .. }));
        assert!(matches!(LinuxDistro::from_id("debian"), LinuxDistro::Apt { .. }));
        assert!(matches!(LinuxDistro::from_id("fedora"), LinuxDistro::Dnf { .. }));
        assert!(matches!(LinuxDistro::from_id("centos"), LinuxDistro::Dnf { .. }));
        assert!(matches!(LinuxDistro::from_id("arch"), LinuxDistro::Pacman { .. }));
    }

    #[test]
    fn unknown_id_is_kept() {
        let distro = LinuxDistro::from_id("gentoo");
        assert_eq!(distro, LinuxDistro::Unknown { id: "gentoo".into() });
        assert_eq!(distro.id(), "gentoo");
    }

    #[test]
    fn id_like_resolves_derivatives() {
        let mint = LinuxDistro::from_os_release("linuxmint", Some("ubuntu debian"));
        assert_eq!(mint, LinuxDistro::Apt { id: "linuxmint".into() });

        let rocky = LinuxDistro::from_os_release("rocky", Some("rhel centos fedora"));
        assert_eq!(rocky, LinuxDistro::Dnf { id: "rocky".into() });

        let void = LinuxDistro::from_os_release("void", None);
        assert_eq!(void, LinuxDistro::Unknown { id: "void".into() });
    }

    #[test]
    fn family_names() {
        assert_eq!(OsFamily::MacOs.name(), "darwin");
        assert_eq!(OsFamily::Linux(LinuxDistro::from_id("arch")).name(), "linux");
        assert_eq!(OsFamily::Other("freebsd".into()).name(), "freebsd");
    }
}
