//! Embed sub-object value types.
//!
//! Each sub-object is a small struct with all-optional extras instead of
//! an untyped mapping, so field names are checked at compile time while
//! absent fields stay absent from the serialized form.

use serde::Serialize;

/// Footer shown at the bottom of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
    /// Footer icon URL (http(s) and attachments only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Proxied footer icon URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_icon_url: Option<String>,
}

impl EmbedFooter {
    /// Creates a footer with only its text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon_url: None,
            proxy_icon_url: None,
        }
    }

    /// Sets the footer icon URL.
    #[must_use]
    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    /// Sets the proxied footer icon URL.
    #[must_use]
    pub fn with_proxy_icon_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_icon_url = Some(url.into());
        self
    }
}

/// Image displayed in an embed. Also used for thumbnails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedImage {
    /// Source URL (http(s) and attachments only).
    pub url: String,
    /// Proxied image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Image height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Image width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl EmbedImage {
    /// Creates an image with only its source URL set.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            proxy_url: None,
            height: None,
            width: None,
        }
    }

    /// Sets the proxied image URL.
    #[must_use]
    pub fn with_proxy_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    /// Sets the image height.
    #[must_use]
    pub const fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the image width.
    #[must_use]
    pub const fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// Video displayed in an embed. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbedVideo {
    /// Source URL of the video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Video height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Video width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl EmbedVideo {
    /// Creates an empty video object.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            url: None,
            height: None,
            width: None,
        }
    }

    /// Sets the video URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the video height.
    #[must_use]
    pub const fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the video width.
    #[must_use]
    pub const fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// Provider information of an embed. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbedProvider {
    /// Provider name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EmbedProvider {
    /// Creates an empty provider object.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            url: None,
        }
    }

    /// Sets the provider name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the provider URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Author information of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedAuthor {
    /// Author name.
    pub name: String,
    /// Author URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Author icon URL (http(s) and attachments only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Proxied author icon URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_icon_url: Option<String>,
}

impl EmbedAuthor {
    /// Creates an author with only its name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            icon_url: None,
            proxy_icon_url: None,
        }
    }

    /// Sets the author URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the author icon URL.
    #[must_use]
    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    /// Sets the proxied author icon URL.
    #[must_use]
    pub fn with_proxy_icon_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_icon_url = Some(url.into());
        self
    }
}

/// A name/value pair in the ordered embed field sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: String,
    /// Whether the field displays inline.
    pub inline: bool,
}
