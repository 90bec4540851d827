//! Installed package inventory collection

use crate::config::{InventoryConfig, ListingLayout};
use crate::data::{Inventory, LinuxDistro, OsFamily};
use crate::error::{PatchnovaError, Result};
use crate::utils::command::{CommandRunner, CommandSpec};

/// Pick the listing layout for an OS family; Linux picks by distribution
pub fn layout_for<'a>(family: &OsFamily, config: &'a InventoryConfig) -> Result<&'a ListingLayout> {
    match family {
        OsFamily::Linux(LinuxDistro::Apt { .. }) => Ok(&config.apt),
        OsFamily::Linux(LinuxDistro::Dnf { .. }) => Ok(&config.dnf),
        OsFamily::Linux(LinuxDistro::Pacman { .. }) => Ok(&config.pacman),
        OsFamily::MacOs => Ok(&config.macos),
        OsFamily::Windows => Ok(&config.windows),
        OsFamily::Linux(LinuxDistro::Unknown { .. }) | OsFamily::Other(_) => {
            Err(PatchnovaError::UnsupportedOs(family.to_string()))
        }
    }
}

/// Run the family's listing command and parse it into name -> version
pub fn scan(family: &OsFamily, config: &InventoryConfig, runner: &dyn CommandRunner) -> Result<Inventory> {
    let layout = layout_for(family, config)?;
    let spec = CommandSpec::new(&layout.program, layout.args.iter().cloned());
    let output = runner.capture(&spec)?;
    let inventory = parse_listing(&output, layout);
    tracing::debug!(command = %spec, programs = inventory.len(), "scanned installed software");
    Ok(inventory)
}

/// Best-effort tabular extraction. Malformed lines are skipped and a later
/// duplicate name replaces the earlier entry.
pub fn parse_listing(output: &str, layout: &ListingLayout) -> Inventory {
    let mut inventory = Inventory::new();

    for line in output.lines().skip(layout.skip_lines) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < layout.min_fields {
            continue;
        }
        if layout.max_fields.is_some_and(|max| fields.len() > max) {
            continue;
        }
        if let (Some(name), Some(version)) = (
            fields.get(layout.name_column),
            fields.get(layout.version_column),
        ) {
            inventory.insert(name.to_string(), version.to_string());
        }
    }

    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const DPKG_HEADER: &str = "Desired=Unknown/Install/Remove/Purge/Hold\n\
| Status=Not/Inst/Conf-files/Unpacked/halF-conf/Half-inst/trig-aWait/Trig-pend\n\
|/ Err?=(none)/Reinst-required (Status,Err: uppercase=bad)\n\
||/ Name           Version      Architecture Description\n\
+++-==============-============-============-=================================\n";

    struct FakeRunner {
        output: String,
        seen: RefCell<Vec<String>>,
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, spec: &CommandSpec) -> Result<()> {
            self.seen.borrow_mut().push(spec.to_string());
            Ok(())
        }

        fn capture(&self, spec: &CommandSpec) -> Result<String> {
            self.seen.borrow_mut().push(spec.to_string());
            Ok(self.output.clone())
        }
    }

    #[test]
    fn short_output_is_empty() {
        let layout = ListingLayout::dpkg();
        assert!(parse_listing("", &layout).is_empty());
        assert!(parse_listing(DPKG_HEADER, &layout).is_empty());
    }

    #[test]
    fn three_fields_make_an_entry() {
        let output = format!("{}ii foo 1.2.3\n", DPKG_HEADER);
        let inventory = parse_listing(&output, &ListingLayout::dpkg());
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory["foo"], "1.2.3");
    }

    #[test]
    fn two_fields_are_skipped() {
        let output = format!("{}ii foo\n\nii bar 2.0 amd64 the bar tool\n", DPKG_HEADER);
        let inventory = parse_listing(&output, &ListingLayout::dpkg());
        assert!(!inventory.contains_key("foo"));
        assert_eq!(inventory["bar"], "2.0");
    }

    #[test]
    fn later_duplicate_overwrites() {
        let output = format!("{}ii foo 1.0\nii foo 1.1\n", DPKG_HEADER);
        let inventory = parse_listing(&output, &ListingLayout::dpkg());
        assert_eq!(inventory["foo"], "1.1");
    }

    #[test]
    fn brew_layout_has_no_header() {
        let inventory = parse_listing("git 2.43.0\nopenssl@3 3.2.0 3.1.4\n", &ListingLayout::brew());
        assert_eq!(inventory["git"], "2.43.0");
        assert_eq!(inventory["openssl@3"], "3.2.0");
    }

    #[test]
    fn choco_layout_drops_banner_and_summary() {
        let output = "Chocolatey v1.4.0\ngit 2.43.0\n7zip 23.1.0\n2 packages installed.\n";
        let inventory = parse_listing(output, &ListingLayout::choco());
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory["7zip"], "23.1.0");
        assert!(!inventory.contains_key("packages"));
    }

    #[test]
    fn scan_runs_family_listing() {
        let runner = FakeRunner {
            output: format!("{}ii curl 8.5.0-2 amd64 tool\n", DPKG_HEADER),
            seen: RefCell::new(Vec::new()),
        };
        let family = OsFamily::Linux(LinuxDistro::from_id("debian"));
        let inventory = scan(&family, &InventoryConfig::default(), &runner).unwrap();

        assert_eq!(inventory["curl"], "8.5.0-2");
        assert_eq!(*runner.seen.borrow(), vec!["dpkg -l".to_string()]);
    }

    #[test]
    fn rpm_and_pacman_layouts() {
        let rpm = parse_listing("curl 8.2.1-3.fc39\nbash 5.2.21-1.fc39\n", &ListingLayout::rpm());
        assert_eq!(rpm["curl"], "8.2.1-3.fc39");
        assert_eq!(rpm.len(), 2);

        let pacman = parse_listing("linux 6.6.1.arch1-1\n", &ListingLayout::pacman());
        assert_eq!(pacman["linux"], "6.6.1.arch1-1");
    }

    #[test]
    fn layout_follows_distribution() {
        let config = InventoryConfig::default();
        let layout = |id: &str| layout_for(&OsFamily::Linux(LinuxDistro::from_id(id)), &config);

        assert_eq!(layout("ubuntu").unwrap().program, "dpkg");
        assert_eq!(layout("fedora").unwrap().program, "rpm");
        assert_eq!(layout("arch").unwrap().program, "pacman");
        assert!(matches!(
            layout("gentoo"),
            Err(PatchnovaError::UnsupportedOs(ref os)) if os == "linux (gentoo)"
        ));
    }

    #[test]
    fn scan_rejects_other_families() {
        let runner = FakeRunner {
            output: String::new(),
            seen: RefCell::new(Vec::new()),
        };
        let err = scan(&OsFamily::Other("haiku".into()), &InventoryConfig::default(), &runner)
            .unwrap_err();
        assert!(matches!(err, PatchnovaError::UnsupportedOs(ref os) if os == "haiku"));
        assert!(runner.seen.borrow().is_empty());
    }
}
