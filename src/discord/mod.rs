//! Discord-facing constants and message header rendering
//!
//! Everything the published message is made of besides the changelog itself
//! lives here: the announcement line, the footer call-to-action sections, the
//! length ceiling, and the project -> emoji association.

pub mod budget;
pub mod components;

/// Role ping prepended to every published message.
pub const ANNOUNCEMENT: &str =
    "<@&1294334876803137536> A new update to Kings Beta has been released!";

/// Maximum combined character length Discord accepts for the text content of
/// a Components V2 message.
pub const COMPONENT_MAX_LENGTH: i64 = 4_000;

/// Per-attachment upload ceiling.
/// https://discord.com/developers/docs/reference#uploading-files
pub const ATTACHMENT_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Maximum number of attachments per message.
pub const MAX_ATTACHMENTS: usize = 10;

/// Projects the form accepts. Closed set; adding a project means editing this
/// table and, if it has one, [`project_emoji`].
pub const KNOWN_PROJECTS: [&str; 2] = ["Kings Beta", "Kings Utility"];

/// Fixed call-to-action entry appended after the changelog divider.
#[derive(Debug, Clone, Copy)]
pub struct FooterSection {
    pub content: &'static str,
    pub button_label: &'static str,
    pub button_url: &'static str,
}

/// The two trailing sections every message carries, in render order.
pub const FOOTER_SECTIONS: [FooterSection; 2] = [
    FooterSection {
        content: "-# Found an issue? Report it here:",
        button_label: "#support",
        button_url: "https://discord.com/channels/1294330613859356824/1294340420268195904",
    },
    FooterSection {
        content: "-# Got ideas to share? Send them here:",
        button_label: "#suggestions",
        button_url: "https://discord.com/channels/1294330613859356824/1295107367037435955",
    },
];

/// Custom emoji id for a project's header decoration, if it has one.
pub fn project_emoji(project: &str) -> Option<&'static str> {
    match project {
        "Kings Beta" => Some("1296261614630076426"),
        _ => None,
    }
}

/// Render the header line: `# <:name:id> Project vX.Y.Z`, emoji markup
/// (trailing space included) only for projects with a known emoji. Unknown
/// projects render with their raw name; never an error.
pub fn project_header(project: &str, version: &str) -> String {
    match project_emoji(project) {
        Some(id) => format!(
            "# <:{}:{}> {} v{}",
            emoji_name(project),
            id,
            project,
            version
        ),
        None => format!("# {} v{}", project, version),
    }
}

/// Emoji slug: lowercased project name with whitespace runs collapsed to "_".
fn emoji_name(project: &str) -> String {
    let mut out = String::with_capacity(project.len());
    let mut in_whitespace = false;
    for c in project.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_with_emoji() {
        assert_eq!(
            project_header("Kings Beta", "1.0.0"),
            "# <:kings_beta:1296261614630076426> Kings Beta v1.0.0"
        );
    }

    #[test]
    fn test_header_without_emoji() {
        assert_eq!(
            project_header("Kings Utility", "2.3.1"),
            "# Kings Utility v2.3.1"
        );
    }

    #[test]
    fn test_header_unknown_project_renders_raw() {
        assert_eq!(project_header("Not A Project", "0.1.0"), "# Not A Project v0.1.0");
    }

    #[test]
    fn test_emoji_name_collapses_whitespace() {
        assert_eq!(emoji_name("Kings  Beta"), "kings_beta");
        assert_eq!(emoji_name("Kings\tBeta Two"), "kings_beta_two");
    }

    #[test]
    fn test_emoji_lookup_is_closed() {
        assert_eq!(project_emoji("Kings Beta"), Some("1296261614630076426"));
        assert_eq!(project_emoji("Kings Utility"), None);
        assert_eq!(project_emoji(""), None);
    }
}
