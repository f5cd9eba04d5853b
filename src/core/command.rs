//! Command parser for the : command system

use crate::domain::access::Role;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Tab navigation
    Overview,
    Courses,
    Portfolio,
    Patterns,
    Reports,
    Members,
    Payments,

    // Course session
    Course(String),
    Chapter(String),
    Next,
    Prev,
    Done,

    // Portfolio / pattern gallery
    Track(String),
    Untrack(String),
    Note { symbol: String, text: String },
    Pattern { name: String, note: String },

    // Admin (member management)
    Invite(String),
    Promote { name: String, role: Role },
    Charge { member: String, amount_cents: i64 },

    // Misc
    Export,
    Share,
    Reload,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim().to_string());

    match cmd.to_lowercase().as_str() {
        // Tab navigation
        "overview" | "home" => Command::Overview,
        "courses" => Command::Courses,
        "portfolio" | "watchlist" => Command::Portfolio,
        "patterns" | "gallery" => Command::Patterns,
        "reports" => Command::Reports,
        "members" => Command::Members,
        "payments" => Command::Payments,

        // Course session
        "course" | "open" => match args {
            Some(id) => Command::Course(id),
            None => Command::Unknown(input.to_string()),
        },
        "chapter" | "ch" => match args {
            Some(id) => Command::Chapter(id),
            None => Command::Unknown(input.to_string()),
        },
        "next" | "n" => Command::Next,
        "prev" | "back" => Command::Prev,
        "done" | "complete" => Command::Done,

        // Portfolio / pattern gallery
        "track" | "watch" => match args {
            Some(symbol) => Command::Track(normalize_symbol(&symbol)),
            None => Command::Unknown(input.to_string()),
        },
        "untrack" | "unwatch" => match args {
            Some(symbol) => Command::Untrack(normalize_symbol(&symbol)),
            None => Command::Unknown(input.to_string()),
        },
        "note" | "tag" => match split_once_arg(args.as_deref()) {
            Some((symbol, text)) => Command::Note {
                symbol: normalize_symbol(symbol),
                text: text.to_string(),
            },
            None => Command::Unknown(input.to_string()),
        },
        "pattern" | "save" => match split_once_arg(args.as_deref()) {
            Some((name, note)) => Command::Pattern {
                name: name.to_string(),
                note: note.to_string(),
            },
            None => Command::Unknown(input.to_string()),
        },

        // Admin
        "invite" => match args {
            Some(name) => Command::Invite(name),
            None => Command::Unknown(input.to_string()),
        },
        "promote" => match split_once_arg(args.as_deref()) {
            Some((name, role)) => match Role::parse(role) {
                Some(role) => Command::Promote {
                    name: name.to_string(),
                    role,
                },
                None => Command::Unknown(input.to_string()),
            },
            None => Command::Unknown(input.to_string()),
        },
        "charge" => match split_once_arg(args.as_deref()) {
            Some((member, amount)) => match parse_amount_cents(amount) {
                Some(amount_cents) => Command::Charge {
                    member: member.to_string(),
                    amount_cents,
                },
                None => Command::Unknown(input.to_string()),
            },
            None => Command::Unknown(input.to_string()),
        },

        // Misc
        "export" => Command::Export,
        "share" | "link" => Command::Share,
        "reload" | "refresh" => Command::Reload,

        _ => Command::Unknown(input.to_string()),
    }
}

fn split_once_arg(args: Option<&str>) -> Option<(&str, &str)> {
    let args = args?.trim();
    let (head, tail) = args.split_once(' ')?;
    let tail = tail.trim();
    if head.is_empty() || tail.is_empty() {
        return None;
    }
    Some((head, tail))
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Accepts "49.90", "49.5" or "49" and yields cents. Negative or
/// malformed amounts are rejected.
fn parse_amount_cents(value: &str) -> Option<i64> {
    let value = value.trim();
    let (whole, frac) = match value.split_once('.') {
        None => (value, ""),
        Some((whole, frac)) => (whole, frac),
    };
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !matches!(frac.len(), 0 | 1 | 2) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let mut cents: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    if frac.len() == 1 {
        cents *= 10;
    }
    Some(whole * 100 + cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_jumps() {
        assert_eq!(parse_command("overview"), Command::Overview);
        assert_eq!(parse_command("Members"), Command::Members);
        assert_eq!(parse_command("watchlist"), Command::Portfolio);
    }

    #[test]
    fn parses_course_commands() {
        assert_eq!(
            parse_command("course candlesticks-101"),
            Command::Course("candlesticks-101".into())
        );
        assert_eq!(parse_command("ch intro"), Command::Chapter("intro".into()));
        assert_eq!(parse_command("next"), Command::Next);
        assert_eq!(parse_command("course"), Command::Unknown("course".into()));
    }

    #[test]
    fn parses_portfolio_commands() {
        assert_eq!(parse_command("track aapl"), Command::Track("AAPL".into()));
        assert_eq!(
            parse_command("note msft gap fill pending"),
            Command::Note {
                symbol: "MSFT".into(),
                text: "gap fill pending".into()
            }
        );
        assert_eq!(parse_command("note msft"), Command::Unknown("note msft".into()));
    }

    #[test]
    fn parses_admin_commands() {
        assert_eq!(
            parse_command("promote dana admin"),
            Command::Promote {
                name: "dana".into(),
                role: Role::Admin
            }
        );
        assert_eq!(
            parse_command("promote dana king"),
            Command::Unknown("promote dana king".into())
        );
        assert_eq!(
            parse_command("charge kim 49.90"),
            Command::Charge {
                member: "kim".into(),
                amount_cents: 4990
            }
        );
        assert_eq!(
            parse_command("charge kim 49"),
            Command::Charge {
                member: "kim".into(),
                amount_cents: 4900
            }
        );
        assert_eq!(
            parse_command("charge kim 49.5"),
            Command::Charge {
                member: "kim".into(),
                amount_cents: 4950
            }
        );
    }

    #[test]
    fn unknown_commands_pass_through() {
        assert_eq!(parse_command("frobnicate"), Command::Unknown("frobnicate".into()));
    }
}
