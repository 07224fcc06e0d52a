//! Release submission types
//!
//! One [`ReleaseSubmission`] is built per form post, validated, turned into a
//! webhook payload, and dropped once delivery returns. Nothing here persists.

pub mod validate;

/// Template text the changelog editor starts from. A submission that still
/// equals it carries no actual changes and is rejected.
pub const CHANGELOG_PRESET: &str = "## Features\n- \n\n## Bug Fixes\n- \n\n## Other Changes\n- ";

/// One uploaded file, as received from the form.
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Everything a single form post carries.
#[derive(Debug, Clone, Default)]
pub struct ReleaseSubmission {
    pub project: String,
    pub version: String,
    pub changelog: String,
    pub secret_key: String,
    pub files: Vec<AttachmentFile>,
}

/// Combined size of the attachments, for the byte counter in the form.
pub fn total_file_size(files: &[AttachmentFile]) -> u64 {
    files.iter().map(AttachmentFile::size).sum()
}
