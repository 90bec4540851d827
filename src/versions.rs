//! Latest-version lookup and version ordering

use crate::config::VersionOrdering;
use crate::data::{LinuxDistro, OsFamily};
use crate::error::{PatchnovaError, Result};
use crate::utils::command::{CommandRunner, CommandSpec};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Answers "what is the newest version of this program?"
pub trait VersionSource {
    /// Newest known version, or `None` when the installed one is current
    fn latest(&self, name: &str) -> Option<String>;
}

/// Compare two version strings under the configured ordering
pub fn compare(ordering: VersionOrdering, a: &str, b: &str) -> Ordering {
    match ordering {
        VersionOrdering::Lexicographic => a.cmp(b),
        VersionOrdering::Natural => natural_cmp(a, b),
    }
}

pub fn is_newer(ordering: VersionOrdering, installed: &str, candidate: &str) -> bool {
    compare(ordering, installed, candidate) == Ordering::Less
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Number(&'a str),
    Word(&'a str),
}

fn tokens(version: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    // (start offset, numeric run) of the token being read
    let mut current: Option<(usize, bool)> = None;

    for (i, c) in version.char_indices() {
        let class = if c.is_ascii_digit() {
            Some(true)
        } else if c.is_alphanumeric() {
            Some(false)
        } else {
            None
        };

        match (current, class) {
            (Some((_, numeric)), Some(is_num)) if numeric == is_num => {}
            (Some((start, numeric)), _) => {
                out.push(token(&version[start..i], numeric));
                current = class.map(|is_num| (i, is_num));
            }
            (None, _) => current = class.map(|is_num| (i, is_num)),
        }
    }
    if let Some((start, numeric)) = current {
        out.push(token(&version[start..], numeric));
    }
    out
}

fn token(text: &str, numeric: bool) -> Token<'_> {
    if numeric {
        Token::Number(text)
    } else {
        Token::Word(text)
    }
}

fn cmp_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Segment-wise ordering: separators are ignored, digit runs compare as
/// numbers, letter runs compare as text and sort below numbers. A trailing
/// letter segment marks a pre-release (`1.0rc1 < 1.0`).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = tokens(a);
    let right = tokens(b);

    for (l, r) in left.iter().zip(&right) {
        let ord = match (l, r) {
            (Token::Number(x), Token::Number(y)) => cmp_numbers(x, y),
            (Token::Word(x), Token::Word(y)) => x.cmp(y),
            (Token::Number(_), Token::Word(_)) => Ordering::Greater,
            (Token::Word(_), Token::Number(_)) => Ordering::Less,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    match left.len().cmp(&right.len()) {
        Ordering::Greater => tail_ordering(&left[right.len()]),
        Ordering::Less => tail_ordering(&right[left.len()]).reverse(),
        Ordering::Equal => Ordering::Equal,
    }
}

fn tail_ordering(first_extra: &Token<'_>) -> Ordering {
    match first_extra {
        Token::Word(_) => Ordering::Less,
        Token::Number(_) => Ordering::Greater,
    }
}

/// Output format of a package manager's "outdated" listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutdatedFormat {
    Apt,
    Dnf,
    Pacman,
    Brew,
    Choco,
}

impl OutdatedFormat {
    pub fn for_family(family: &OsFamily) -> Result<Self> {
        match family {
            OsFamily::Linux(LinuxDistro::Apt { .. }) => Ok(Self::Apt),
            OsFamily::Linux(LinuxDistro::Dnf { .. }) => Ok(Self::Dnf),
            OsFamily::Linux(LinuxDistro::Pacman { .. }) => Ok(Self::Pacman),
            OsFamily::MacOs => Ok(Self::Brew),
            OsFamily::Windows => Ok(Self::Choco),
            OsFamily::Linux(LinuxDistro::Unknown { .. }) | OsFamily::Other(_) => {
                Err(PatchnovaError::UnsupportedOs(family.to_string()))
            }
        }
    }

    pub fn command(&self) -> CommandSpec {
        match self {
            Self::Apt => CommandSpec::new("apt", ["list", "--upgradable"]),
            Self::Dnf => CommandSpec::new("dnf", ["list", "--upgrades", "-q"]),
            Self::Pacman => CommandSpec::new("pacman", ["-Qu"]),
            Self::Brew => CommandSpec::new("brew", ["outdated", "--verbose"]),
            Self::Choco => CommandSpec::new("choco", ["outdated", "-r"]),
        }
    }

    /// Parse the listing into name -> newest version
    pub fn parse(&self, output: &str) -> HashMap<String, String> {
        output
            .lines()
            .filter_map(|line| self.parse_line(line.trim()))
            .map(|(name, version)| (name.to_string(), version.to_string()))
            .collect()
    }

    fn parse_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match self {
            // bash/jammy-updates 5.1-6ubuntu1.1 amd64 [upgradable from: 5.1-6ubuntu1]
            Self::Apt => {
                let first: &'a str = fields.first().copied()?;
                let (name, _suite) = first.split_once('/')?;
                Some((name, fields.get(1).copied()?))
            }
            // curl.x86_64  8.2.1-3.fc39  updates
            Self::Dnf => {
                if fields.len() != 3 {
                    return None;
                }
                let (name, _arch) = fields[0].rsplit_once('.')?;
                Some((name, fields[1]))
            }
            // linux 6.6.1.arch1-1 -> 6.6.2.arch1-1
            Self::Pacman => match fields.as_slice() {
                [name, _, "->", latest, ..] => Some((*name, *latest)),
                _ => None,
            },
            // wget (1.21.3) < 1.21.4
            Self::Brew => match fields.as_slice() {
                [name, .., "<", latest] => Some((*name, *latest)),
                _ => None,
            },
            // git|2.40.0|2.41.0|false
            Self::Choco => {
                let mut parts = line.split('|');
                let name = parts.next()?.trim();
                let _current = parts.next()?;
                let latest = parts.next()?.trim();
                (!name.is_empty() && !latest.is_empty()).then_some((name, latest))
            }
        }
    }
}

/// Newest versions of every outdated package, fetched in one query
#[derive(Debug, Default, Clone)]
pub struct OutdatedIndex {
    latest: HashMap<String, String>,
}

impl OutdatedIndex {
    pub fn query(format: OutdatedFormat, runner: &dyn CommandRunner) -> Result<Self> {
        let output = match runner.capture(&format.command()) {
            Ok(output) => output,
            // pacman -Qu exits 1 when nothing is outdated
            Err(PatchnovaError::CommandFailed { code: Some(1), .. })
                if format == OutdatedFormat::Pacman =>
            {
                String::new()
            }
            Err(err) => return Err(err),
        };
        let index = Self {
            latest: format.parse(&output),
        };
        tracing::debug!(outdated = index.latest.len(), "queried outdated packages");
        Ok(index)
    }
}

impl VersionSource for OutdatedIndex {
    fn latest(&self, name: &str) -> Option<String> {
        self.latest
            .get(name)
            // dpkg lists multiarch packages as "name:arch"
            .or_else(|| name.split_once(':').and_then(|(base, _)| self.latest.get(base)))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_keeps_string_order() {
        // Documented parity behavior: "9" sorts after "10" as text
        assert_eq!(compare(VersionOrdering::Lexicographic, "9", "10"), Ordering::Greater);
        assert!(!is_newer(VersionOrdering::Lexicographic, "9", "10"));
        assert!(is_newer(VersionOrdering::Lexicographic, "1.2", "1.3"));
    }

    #[test]
    fn natural_compares_numbers() {
        assert_eq!(compare(VersionOrdering::Natural, "9", "10"), Ordering::Less);
        assert!(is_newer(VersionOrdering::Natural, "1.9.0", "1.10.0"));
        assert_eq!(natural_cmp("2.0", "2.0"), Ordering::Equal);
        assert_eq!(natural_cmp("1.02", "1.2"), Ordering::Equal);
        assert_eq!(natural_cmp("1.0.1", "1.0"), Ordering::Greater);
    }

    #[test]
    fn natural_handles_prerelease_and_suffixes() {
        assert_eq!(natural_cmp("1.0rc1", "1.0"), Ordering::Less);
        assert_eq!(natural_cmp("1.0", "1.0-beta"), Ordering::Greater);
        assert_eq!(natural_cmp("5.1-6ubuntu1", "5.1-6ubuntu1.1"), Ordering::Less);
        assert_eq!(natural_cmp("1:2.3", "1:2.10"), Ordering::Less);
    }

    #[test]
    fn natural_handles_huge_numbers() {
        assert_eq!(
            natural_cmp("20240101000000000000001", "20240101000000000000002"),
            Ordering::Less
        );
    }

    #[test]
    fn parses_apt_upgradable() {
        let out = "Listing... Done\nbash/jammy-updates 5.1-6ubuntu1.1 amd64 [upgradable from: 5.1-6ubuntu1]\n";
        let parsed = OutdatedFormat::Apt.parse(out);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["bash"], "5.1-6ubuntu1.1");
    }

    #[test]
    fn parses_dnf_upgrades() {
        let out = "Available Upgrades\ncurl.x86_64   8.2.1-3.fc39   updates\n";
        let parsed = OutdatedFormat::Dnf.parse(out);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["curl"], "8.2.1-3.fc39");
    }

    #[test]
    fn parses_pacman_brew_and_choco() {
        let pacman = OutdatedFormat::Pacman.parse("linux 6.6.1-1 -> 6.6.2-1\n");
        assert_eq!(pacman["linux"], "6.6.2-1");

        let brew = OutdatedFormat::Brew.parse("wget (1.21.3) < 1.21.4\nnode (20.1.0, 20.2.0) < 21.0.0\n");
        assert_eq!(brew["wget"], "1.21.4");
        assert_eq!(brew["node"], "21.0.0");

        let choco = OutdatedFormat::Choco.parse("git|2.40.0|2.41.0|false\n\n");
        assert_eq!(choco.len(), 1);
        assert_eq!(choco["git"], "2.41.0");
    }

    #[test]
    fn index_matches_multiarch_names() {
        let index = OutdatedIndex {
            latest: HashMap::from([("libc6".to_string(), "2.35-0ubuntu3.6".to_string())]),
        };
        assert_eq!(index.latest("libc6:amd64").as_deref(), Some("2.35-0ubuntu3.6"));
        assert_eq!(index.latest("zlib1g"), None);
    }

    #[test]
    fn unknown_distro_has_no_source() {
        let family = OsFamily::Linux(LinuxDistro::from_id("void"));
        assert!(matches!(
            OutdatedFormat::for_family(&family),
            Err(PatchnovaError::UnsupportedOs(_))
        ));
    }
}
