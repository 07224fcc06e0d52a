//! Components V2 message layout and document assembly
//!
//! Models the subset of Discord's Components V2 wire format this service
//! emits and turns a validated [`ReleaseSubmission`] into the payload plus
//! the attachment uploads that travel with it. Assembly performs no
//! validation; the caller is expected to have run the schema and budget
//! checks already.

use serde::Serialize;
use uuid::Uuid;

use super::{project_header, ANNOUNCEMENT, FOOTER_SECTIONS};
use crate::release::ReleaseSubmission;

/// Message flag marking a payload as Components V2.
const FLAG_IS_COMPONENTS_V2: u64 = 1 << 15;

// Component type discriminants, per the Discord API reference.
const TYPE_BUTTON: u8 = 2;
const TYPE_SECTION: u8 = 9;
const TYPE_TEXT_DISPLAY: u8 = 10;
const TYPE_MEDIA_GALLERY: u8 = 12;
const TYPE_SEPARATOR: u8 = 14;
const TYPE_CONTAINER: u8 = 17;

const BUTTON_STYLE_LINK: u8 = 5;
const SEPARATOR_SPACING_SMALL: u8 = 1;

/// One layout block. Serializes without an enum tag; each variant carries its
/// wire `type` discriminant as a field.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Component {
    TextDisplay(TextDisplay),
    Container(Container),
    Separator(Separator),
    Section(Section),
    MediaGallery(MediaGallery),
}

#[derive(Debug, Serialize)]
pub struct TextDisplay {
    #[serde(rename = "type")]
    kind: u8,
    pub content: String,
}

impl TextDisplay {
    fn new(content: impl Into<String>) -> Self {
        Self {
            kind: TYPE_TEXT_DISPLAY,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Container {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<Component>,
}

#[derive(Debug, Serialize)]
pub struct Separator {
    #[serde(rename = "type")]
    kind: u8,
    pub divider: bool,
    pub spacing: u8,
}

/// Text content with a link-button accessory.
#[derive(Debug, Serialize)]
pub struct Section {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<TextDisplay>,
    pub accessory: Button,
}

#[derive(Debug, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    pub style: u8,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MediaGallery {
    #[serde(rename = "type")]
    kind: u8,
    pub items: Vec<MediaGalleryItem>,
}

#[derive(Debug, Serialize)]
pub struct MediaGalleryItem {
    pub media: UnfurledMedia,
}

#[derive(Debug, Serialize)]
pub struct UnfurledMedia {
    pub url: String,
    pub content_type: String,
}

/// The message body posted to the webhook as `payload_json`.
#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub flags: u64,
    pub components: Vec<Component>,
}

/// An attachment as uploaded alongside the payload, renamed to its generated
/// identifier.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Build the full message document and the uploads it references.
///
/// Block order is fixed: announcement, container (header, changelog, divider,
/// footer sections in declared order), then a media gallery iff any
/// attachments exist, listing them in submission order. Each attachment gets
/// a fresh short identifier with the original extension preserved, so
/// colliding or transport-unsafe file names never reach Discord.
pub fn assemble(submission: &ReleaseSubmission) -> (WebhookPayload, Vec<AttachmentUpload>) {
    let uploads: Vec<AttachmentUpload> = submission
        .files
        .iter()
        .map(|file| AttachmentUpload {
            name: format!("{}{}", generated_id(), file_ext(&file.name)),
            bytes: file.bytes.clone(),
            content_type: file.content_type.clone(),
        })
        .collect();

    let mut container = vec![
        Component::TextDisplay(TextDisplay::new(project_header(
            &submission.project,
            &submission.version,
        ))),
        Component::TextDisplay(TextDisplay::new(&submission.changelog)),
        Component::Separator(Separator {
            kind: TYPE_SEPARATOR,
            divider: true,
            spacing: SEPARATOR_SPACING_SMALL,
        }),
    ];
    container.extend(FOOTER_SECTIONS.iter().map(|section| {
        Component::Section(Section {
            kind: TYPE_SECTION,
            components: vec![TextDisplay::new(section.content)],
            accessory: Button {
                kind: TYPE_BUTTON,
                style: BUTTON_STYLE_LINK,
                label: section.button_label.to_string(),
                url: section.button_url.to_string(),
            },
        })
    }));

    let mut components = vec![
        Component::TextDisplay(TextDisplay::new(ANNOUNCEMENT)),
        Component::Container(Container {
            kind: TYPE_CONTAINER,
            components: container,
        }),
    ];
    if !uploads.is_empty() {
        components.push(Component::MediaGallery(MediaGallery {
            kind: TYPE_MEDIA_GALLERY,
            items: uploads
                .iter()
                .map(|upload| MediaGalleryItem {
                    media: UnfurledMedia {
                        url: format!("attachment://{}", upload.name),
                        content_type: upload.content_type.clone(),
                    },
                })
                .collect(),
        }));
    }

    (
        WebhookPayload {
            flags: FLAG_IS_COMPONENTS_V2,
            components,
        },
        uploads,
    )
}

/// Short random identifier for attachment cross-referencing.
fn generated_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Extension including the dot, or "" for dotless and dotfile names.
fn file_ext(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => &filename[index..],
        _ => "",
    }
}
