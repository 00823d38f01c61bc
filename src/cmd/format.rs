/*!
format.rs

Terminal formatting primitives for the human-readable `show` output.

  - StyleOptions::detect() / with_overrides()
  - color(role, text, &StyleOptions) -> String
  - emoji(tag, &StyleOptions) -> &'static str
  - box_header(title, subtitle_opt, &StyleOptions) -> String
  - table(headers, rows, &StyleOptions) -> String
  - hex_dump(bytes, base_offset) -> Vec<String>

Everything returns strings; nothing here prints. JSON output never goes
through these helpers.

Color and emoji are on by default and disabled by NO_COLOR / NO_EMOJI (or the
`color` / `emoji` config keys). Width comes from COLUMNS, clamped to 40..=220,
default 100.
*/

use std::borrow::Cow;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
    pub padding: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            use_emoji: std::env::var_os("NO_EMOJI").is_none(),
            term_width: width,
            padding: 1,
        }
    }

    /// Config file switches can only turn decorations off.
    pub fn with_overrides(mut self, color: Option<bool>, emoji: Option<bool>) -> Self {
        if color == Some(false) {
            self.use_color = false;
        }
        if emoji == Some(false) {
            self.use_emoji = false;
        }
        self
    }

    /// No color, no emoji, fixed width.
    #[cfg(test)]
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width: 100,
            padding: 1,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color / Emoji                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Warning,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",    // cyan-ish
        Role::Secondary => "38;5;250", // gray
        Role::Accent => "38;5;213",    // magenta
        Role::Warning => "38;5;214",   // orange
        Role::Error => "38;5;196",     // red
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "error" => "✖",
        "warn" => "⚠",
        "info" => "ℹ",
        "table" => "📜",
        _ => "",
    }
}

/* -------------------------------------------------------------------------- */
/* Box Header                                                                 */
/* -------------------------------------------------------------------------- */

/// Single-line boxed title. Long titles are truncated rather than wrapped.
pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let title_styled = color(Role::Primary, title.as_ref(), style);
    let inner = match subtitle {
        Some(sub) => format!(
            "{title_styled}  {}",
            color(Role::Secondary, sub.as_ref(), style)
        ),
        None => title_styled,
    };

    let pad = style.padding;
    let max_inner = style.term_width.clamp(20, 200) - 2 - pad * 2;
    let inner_len = display_width(&inner);
    let (content, content_len) = if inner_len > max_inner {
        let cut = truncate_ellipsis(&strip_ansi(&inner), max_inner);
        let len = display_width(&cut);
        (cut, len)
    } else {
        (inner, inner_len)
    };

    let hline = "─".repeat(content_len + pad * 2);
    let pad_str = " ".repeat(pad);
    [
        format!("┌{hline}┐"),
        format!("│{pad_str}{content}{pad_str}│"),
        format!("└{hline}┘"),
    ]
    .join("\n")
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                             */
/* -------------------------------------------------------------------------- */

/// Columns never shrink below this many characters.
const MIN_COL_WIDTH: usize = 2;

/// Left-aligned columns with a dashed separator under the header row.
/// The widest columns shrink first (with an ellipsis) to fit the terminal.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();
    let width_limit = style.term_width;

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    // Shrink the widest columns first until the row fits.
    let total_raw: usize = widths.iter().sum::<usize>() + (col_count - 1) * 2;
    if total_raw > width_limit {
        let mut overflow = total_raw - width_limit;
        let mut ordered: Vec<(usize, usize)> = widths.iter().copied().enumerate().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (idx, _) in ordered {
            if overflow == 0 {
                break;
            }
            if widths[idx] > MIN_COL_WIDTH {
                let shrink = (widths[idx] - MIN_COL_WIDTH).min(overflow);
                widths[idx] -= shrink;
                overflow -= shrink;
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| color(Role::Accent, pad_or_truncate(h, widths[i]), style))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(header_line);

    let sep = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(color(Role::Dim, sep, style));

    for row in rows {
        let line = (0..col_count)
            .map(|c| {
                let raw = row.get(c).map(|s| s.as_str()).unwrap_or("");
                pad_or_truncate(raw, widths[c])
            })
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

fn pad_or_truncate(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len <= width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    let cut = truncate_ellipsis(&strip_ansi(s), width);
    let cut_len = display_width(&cut);
    format!("{cut}{}", " ".repeat(width.saturating_sub(cut_len)))
}

/* -------------------------------------------------------------------------- */
/* Hex Dump                                                                    */
/* -------------------------------------------------------------------------- */

/// Classic 16-bytes-per-line dump: offset, hex bytes, printable ASCII.
pub fn hex_dump(bytes: &[u8], base_offset: usize) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let hex = chunk
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ");
            let text: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!("{:08x}  {hex:<47}  |{text}|", base_offset + i * 16)
        })
        .collect()
}

/* -------------------------------------------------------------------------- */
/* Text Helpers                                                                */
/* -------------------------------------------------------------------------- */

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    // Scans for ESC '[' ... <letter>
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for t in chars.by_ref() {
                if t.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                       */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_header_plain() {
        let b = box_header("NFIT", Some("rev 1"), &StyleOptions::plain());
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "│ NFIT  rev 1 │");
        assert_eq!(display_width(lines[0]), display_width(lines[1]));
    }

    #[test]
    fn box_header_truncates_long_title() {
        let mut style = StyleOptions::plain();
        style.term_width = 40;
        let b = box_header("x".repeat(100), None::<&str>, &style);
        assert!(b.lines().all(|l| display_width(l) <= 40));
        assert!(b.contains('…'));
    }

    #[test]
    fn table_aligns_columns() {
        let t = table(
            &["FIELD", "VALUE"],
            &[
                vec!["Signature".into(), "NFIT".into()],
                vec!["Length".into(), "40".into()],
            ],
            &StyleOptions::plain(),
        );
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], "FIELD      VALUE");
        assert_eq!(lines[1], "---------  -----");
        assert_eq!(lines[2], "Signature  NFIT");
        assert_eq!(lines[3], "Length     40");
    }

    #[test]
    fn table_shrinks_widest_column() {
        let mut style = StyleOptions::plain();
        style.term_width = 40;
        let t = table(
            &["FIELD", "VALUE"],
            &[vec!["OEM ID".into(), "v".repeat(60)]],
            &style,
        );
        assert!(t.lines().all(|l| display_width(l) <= 40));
        let row = t.lines().nth(2).unwrap();
        assert!(row.starts_with("OEM ID  "));
        assert!(row.ends_with('…'));
    }

    #[test]
    fn hex_dump_layout() {
        let lines = hex_dump(b"NFIT\x00\x01", 0x24);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("00000024  4e 46 49 54 00 01"));
        assert!(lines[0].ends_with("|NFIT..|"));
        assert_eq!(hex_dump(&[0u8; 33], 0).len(), 3);
        assert!(hex_dump(&[], 0).is_empty());
    }

    #[test]
    fn truncate() {
        assert_eq!(truncate_ellipsis("abcdef", 4), "abc…");
        assert_eq!(truncate_ellipsis("abc", 4), "abc");
    }

    #[test]
    fn strip_ansi_sequences() {
        assert_eq!(strip_ansi("\x1b[31mRED\x1b[0m"), "RED");
        let style = StyleOptions {
            use_color: true,
            ..StyleOptions::plain()
        };
        assert_eq!(display_width(&color(Role::Error, "abc", &style)), 3);
    }
}
