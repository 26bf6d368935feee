//! Message builder: a rich-content embed and its sub-objects.
//!
//! [`Embed`] is pure data shaping, no I/O: configure it with setters,
//! attach it to a webhook client, and it serializes on demand into the
//! wire-format mapping, omitting everything that was never set.

mod color;
mod error;
mod types;

#[cfg(test)]
mod embed_tests;

pub use color::Color;
pub use error::EmbedError;
pub use types::{EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, EmbedProvider, EmbedVideo};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// A point in time accepted by [`Embed::set_timestamp`].
///
/// Converts from a unix-epoch second count (`f64`/`i64`, fractional
/// seconds preserved) or an already-structured [`DateTime<Utc>`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    /// Seconds since the unix epoch.
    Epoch(f64),
    /// An already-structured UTC datetime.
    DateTime(DateTime<Utc>),
}

impl From<f64> for Timestamp {
    fn from(secs: f64) -> Self {
        Self::Epoch(secs)
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let secs = secs as f64;
        Self::Epoch(secs)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(when: DateTime<Utc>) -> Self {
        Self::DateTime(when)
    }
}

impl Timestamp {
    /// Normalizes to an ISO-8601 string with a UTC `Z` suffix.
    fn to_iso8601(self) -> String {
        let when = match self {
            // Epochs outside chrono's representable range clamp to the epoch.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Self::Epoch(secs) => {
                let whole = secs.div_euclid(1.0) as i64;
                let nanos = (secs.rem_euclid(1.0) * 1e9) as u32;
                DateTime::from_timestamp(whole, nanos).unwrap_or(DateTime::UNIX_EPOCH)
            }
            Self::DateTime(when) => when,
        };
        when.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// One rich message unit: title, description, images, fields and friends.
///
/// Serialization emits only fields that are currently set; a freshly
/// constructed embed serializes to an empty object.
///
/// # Example
///
/// ```
/// use hookline::embed::{Embed, EmbedFooter};
///
/// let mut embed = Embed::new();
/// embed.set_title("deploy finished");
/// embed.set_color(0x00FF00).unwrap();
/// embed.set_footer(EmbedFooter::new("ci"));
/// embed.add_field("duration", "42s", true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "text_unset")]
    title: Option<String>,
    #[serde(skip_serializing_if = "text_unset")]
    description: Option<String>,
    #[serde(skip_serializing_if = "text_unset")]
    url: Option<String>,
    #[serde(skip_serializing_if = "text_unset")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<EmbedVideo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<EmbedProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<EmbedField>,
}

/// Empty strings count as unset, matching the omit-absent wire schema.
#[allow(clippy::ref_option)]
fn text_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl Embed {
    /// Creates an embed with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title of the embed.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Sets the description of the embed.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Sets the URL that makes the embed title a clickable link.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    /// Sets the embed timestamp from an epoch value or a UTC datetime.
    ///
    /// The value is normalized to an ISO-8601 string immediately.
    pub fn set_timestamp(&mut self, when: impl Into<Timestamp>) {
        self.timestamp = Some(when.into().to_iso8601());
    }

    /// Sets the embed timestamp to the current UTC time.
    pub fn set_timestamp_now(&mut self) {
        self.set_timestamp(Utc::now());
    }

    /// Sets the embed color from a decimal value or a hex string.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::ColorNotInRange`] outside `[0, 16777215]`
    /// and [`EmbedError::InvalidColor`] for unparsable hex strings.
    pub fn set_color<C>(&mut self, color: C) -> Result<(), EmbedError>
    where
        C: TryInto<Color, Error = EmbedError>,
    {
        self.color = Some(color.try_into()?);
        Ok(())
    }

    /// Removes the color. "No color" is valid and never an error.
    pub fn clear_color(&mut self) {
        self.color = None;
    }

    /// Returns the current color, if set.
    #[must_use]
    pub const fn color(&self) -> Option<Color> {
        self.color
    }

    /// Sets footer information.
    pub fn set_footer(&mut self, footer: EmbedFooter) {
        self.footer = Some(footer);
    }

    /// Sets the image displayed in the embed.
    pub fn set_image(&mut self, image: EmbedImage) {
        self.image = Some(image);
    }

    /// Sets the thumbnail displayed in the embed.
    pub fn set_thumbnail(&mut self, thumbnail: EmbedImage) {
        self.thumbnail = Some(thumbnail);
    }

    /// Sets the video displayed in the embed.
    pub fn set_video(&mut self, video: EmbedVideo) {
        self.video = Some(video);
    }

    /// Sets provider information.
    pub fn set_provider(&mut self, provider: EmbedProvider) {
        self.provider = Some(provider);
    }

    /// Sets author information.
    pub fn set_author(&mut self, author: EmbedAuthor) {
        self.author = Some(author);
    }

    /// Appends a field to the ordered field sequence.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    /// Removes and returns the field at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbedError::FieldIndexOutOfRange`] if `index` does not
    /// refer to a stored field.
    pub fn remove_field(&mut self, index: usize) -> Result<EmbedField, EmbedError> {
        if index >= self.fields.len() {
            return Err(EmbedError::FieldIndexOutOfRange {
                index,
                len: self.fields.len(),
            });
        }
        Ok(self.fields.remove(index))
    }

    /// Returns the stored fields in order.
    #[must_use]
    pub fn fields(&self) -> &[EmbedField] {
        &self.fields
    }

    /// Total character count of title, description, footer text, author
    /// name and every field name/value pair.
    ///
    /// The remote imposes a 6000-character limit per embed; this only
    /// reports the count, enforcement is the caller's call.
    #[must_use]
    pub fn length(&self) -> usize {
        let text = |value: &Option<String>| value.as_deref().map_or(0, |s| s.chars().count());
        let mut total = text(&self.title) + text(&self.description);
        if let Some(footer) = &self.footer {
            total += footer.text.chars().count();
        }
        if let Some(author) = &self.author {
            total += author.name.chars().count();
        }
        for field in &self.fields {
            total += field.name.chars().count() + field.value.chars().count();
        }
        total
    }

    /// True when serialization would produce an empty object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        text_unset(&self.title)
            && text_unset(&self.description)
            && text_unset(&self.url)
            && text_unset(&self.timestamp)
            && self.color.is_none()
            && self.footer.is_none()
            && self.image.is_none()
            && self.thumbnail.is_none()
            && self.video.is_none()
            && self.provider.is_none()
            && self.author.is_none()
            && self.fields.is_empty()
    }

    /// Serializes into the wire-format mapping, omitting absent fields.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("embed serialization is infallible")
    }
}
