//! Slack response types and the boundary escaping applied before sending

use serde::Serialize;

use super::Request;

/// Who gets to see the response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Only the caller sees it (Slack's `ephemeral`)
    #[default]
    Private,
    /// Posted in the channel (Slack's `in_channel`)
    Public,
}

/// A response message for Slack
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    pub text: String,
    #[serde(rename = "response_type", skip_serializing_if = "is_private", serialize_with = "serialize_visibility")]
    visibility: Visibility,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unfurl_links: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unfurl_media: bool,
}

/// An attachment within a response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "pretext", skip_serializing_if = "Option::is_none")]
    pub pre_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    #[serde(rename = "mrkdwn_in", skip_serializing_if = "Vec::is_empty")]
    pub markdown_in: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
}

/// A field within an attachment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub short: bool,
}

fn is_private(visibility: &Visibility) -> bool {
    *visibility == Visibility::Private
}

fn serialize_visibility<S: serde::Serializer>(
    visibility: &Visibility,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match visibility {
        Visibility::Public => serializer.serialize_str("in_channel"),
        Visibility::Private => serializer.serialize_str("ephemeral"),
    }
}

impl Response {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Make the response show up in the channel. There is no way back.
    pub fn set_public(&mut self) {
        self.visibility = Visibility::Public;
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Response for when no plugin could handle the request
    pub fn nothing_found(request: &Request) -> Self {
        let mut response = Self::new("Our apologies. No Igor was able to handle your request.");
        let invocation = format!("{} {}", request.command, request.text);
        let mut attach = Attachment::new("")
            .with_text(format!(
                "You tried to look for *{}*\nPlease try *{} help* to see which Igors are available",
                invocation.trim(),
                request.command
            ))
            .with_color("danger");
        attach.enable_markdown_for("text");
        response.add_attachment(attach);
        response
    }

    /// Response for when a plugin matched but failed to deliver
    pub fn something_went_wrong() -> Self {
        let mut response = Self::new("Something went wrong while an Igor was handling your request.");
        response.add_attachment(
            Attachment::new("")
                .with_text("Please try again later.")
                .with_color("danger"),
        );
        response
    }

    /// Response for requests that fail token validation
    pub fn invalid_token() -> Self {
        Self::new("Invalid token.")
    }

    /// Escape every free-text value as Slack demands
    pub fn escape(&mut self) {
        self.text = escape(&self.text);
        for attach in &mut self.attachments {
            attach.title = escape(&attach.title);
            attach.text = escape(&attach.text);
            if let Some(pre_text) = attach.pre_text.as_mut() {
                *pre_text = escape(pre_text);
            }
            for field in &mut attach.fields {
                field.title = escape(&field.title);
                field.value = escape(&field.value);
            }
        }
    }
}

impl Attachment {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_pre_text(mut self, pre_text: impl Into<String>) -> Self {
        self.pre_text = Some(pre_text.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_title_link(mut self, link: impl Into<String>) -> Self {
        self.title_link = Some(link.into());
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_thumb(mut self, url: impl Into<String>) -> Self {
        self.thumb_url = Some(url.into());
        self
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Enable Slack markdown for one of the attachment's parts
    pub fn enable_markdown_for(&mut self, part: impl Into<String>) {
        let part = part.into();
        if !self.markdown_in.contains(&part) {
            self.markdown_in.push(part);
        }
    }
}

impl Field {
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// HTML escape `&`, `<` and `>` without ever double escaping.
///
/// Known entities are reverted first, so `&amp;` stays `&amp;`.
pub fn escape(raw: &str) -> String {
    raw.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
