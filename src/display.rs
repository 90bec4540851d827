use crate::data::HostProfile;
use unicode_width::UnicodeWidthStr;

const RESET: &str = "\x1b[0m";
// #4609d4 as a 24-bit foreground
const KEY_COLOR: &str = "\x1b[38;2;70;9;212m";

/// Hardware readout with the labels padded into one column
pub fn render_host_profile(profile: &HostProfile, colored: bool) -> String {
    let fields = profile.fields();
    let key_width = fields.iter().map(|(key, _)| key.width()).max().unwrap_or(0);
    let key_color = if colored { KEY_COLOR } else { "" };
    let reset = if colored { RESET } else { "" };

    fields
        .iter()
        .map(|(key, value)| {
            let padding = " ".repeat(key_width - key.width());
            format!("{}{}{}:{} {}", key_color, key, reset, padding, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Frame a titled message the way a dialog window would show it
pub fn render_dialog(title: &str, message: &str) -> String {
    let lines: Vec<&str> = message.lines().collect();
    let inner = lines
        .iter()
        .map(|line| line.width())
        .chain(std::iter::once(title.width() + 2))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let title_fill = "─".repeat(inner - title.width() - 1);
    out.push_str(&format!("┌─ {} {}┐\n", title, title_fill));
    for line in &lines {
        let padding = " ".repeat(inner - line.width());
        out.push_str(&format!("│ {}{} │\n", line, padding));
    }
    out.push_str(&format!("└{}┘", "─".repeat(inner + 2)));
    out
}

pub fn render_menu() -> &'static str {
    "  1) Check for Updates\n  2) Check Software Updates\n  3) Choose Log Location\n  4) Refresh hardware info\n  q) Quit"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> HostProfile {
        HostProfile {
            system: "Linux".into(),
            node_name: "build-01".into(),
            release: "6.6.2-arch1-1".into(),
            version: "#1 SMP PREEMPT_DYNAMIC".into(),
            machine: "x86_64".into(),
            processor: "unknown".into(),
        }
    }

    #[test]
    fn readout_aligns_values() {
        let text = render_host_profile(&profile(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "System:    Linux");
        assert_eq!(lines[1], "Node Name: build-01");
        assert_eq!(lines[5], "Processor: unknown");
    }

    #[test]
    fn colored_readout_resets() {
        let text = render_host_profile(&profile(), true);
        assert!(text.starts_with(KEY_COLOR));
        assert_eq!(text.matches(RESET).count(), 6);
    }

    #[test]
    fn dialog_lines_share_width() {
        let framed = render_dialog("Update Information", "For your system (arch):\nsudo pacman -Syu");
        let widths: Vec<usize> = framed.lines().map(|l| l.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
        assert!(framed.contains("Update Information"));
    }
}
