//! Pending (to-add) list: candidate names, one per line

use super::record::names_match;

/// Parse the pending list file: trimmed lines, blanks skipped
pub fn parse_pending_list(content: &str) -> Vec<String> {
    split_names(content)
}

/// Serialize names newline-joined with a trailing newline
pub fn serialize_pending_list(names: &[String]) -> String {
    let mut out = names.join("\n");
    out.push('\n');
    out
}

/// Split free text (a textarea submission or file contents) into names
pub fn split_names(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove every entry matching `name` case-insensitively, preserving order
///
/// Returns true if anything was removed.
pub fn remove_name(names: &mut Vec<String>, name: &str) -> bool {
    let before = names.len();
    names.retain(|n| !names_match(n, name));
    names.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_parse_skips_blank_lines_and_trims() {
        let parsed = parse_pending_list("Ada\n\n  Bo  \r\n\t\nCy\n");
        assert_eq!(parsed, list(&["Ada", "Bo", "Cy"]));
    }

    #[test]
    fn test_serialize_round_trip() {
        let names = list(&["Ada", "Bo"]);
        let text = serialize_pending_list(&names);
        assert_eq!(text, "Ada\nBo\n");
        assert_eq!(parse_pending_list(&text), names);
    }

    #[test]
    fn test_serialize_empty_list() {
        assert_eq!(serialize_pending_list(&[]), "\n");
        assert!(parse_pending_list("\n").is_empty());
    }

    #[test]
    fn test_remove_absent_name_leaves_list_unchanged() {
        let mut names = list(&["Ada", "Bo", "Cy"]);
        assert!(!remove_name(&mut names, "Dee"));
        assert_eq!(names, list(&["Ada", "Bo", "Cy"]));
    }

    #[test]
    fn test_remove_is_case_insensitive_and_keeps_order() {
        let mut names = list(&["Ada", "Bo", "Cy", "Dee"]);
        assert!(remove_name(&mut names, "bO"));
        assert_eq!(names, list(&["Ada", "Cy", "Dee"]));
    }

    #[test]
    fn test_remove_drops_every_duplicate() {
        let mut names = list(&["Ada", "ada", "Bo", "ADA"]);
        assert!(remove_name(&mut names, "Ada"));
        assert_eq!(names, list(&["Bo"]));
    }
}
