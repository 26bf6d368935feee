//! Tests for [`Embed`] and its sub-objects.

use super::{Color, Embed, EmbedAuthor, EmbedError, EmbedFooter, EmbedImage, EmbedProvider};
use serde_json::json;

fn to_map(embed: &Embed) -> serde_json::Map<String, serde_json::Value> {
    embed
        .to_json()
        .as_object()
        .expect("embed serializes to an object")
        .clone()
}

mod color {
    use super::*;

    #[test]
    fn accepts_full_rgb_range() {
        for value in [0, 1, 0x7F_FF_FF, Color::MAX] {
            let color = Color::new(value).unwrap();
            assert_eq!(color.value(), value);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Color::new(Color::MAX + 1),
            Err(EmbedError::ColorNotInRange(16_777_216))
        );
        assert!(Color::new(u32::MAX).is_err());
    }

    #[test]
    fn hex_strings_parse_like_their_decimal_equivalent() {
        let decimal = Color::new(16_711_680).unwrap();
        assert_eq!("ff0000".parse::<Color>().unwrap(), decimal);
        assert_eq!("FF0000".parse::<Color>().unwrap(), decimal);
        assert_eq!("0xff0000".parse::<Color>().unwrap(), decimal);
        assert_eq!("#ff0000".parse::<Color>().unwrap(), decimal);
    }

    #[test]
    fn garbage_hex_is_invalid() {
        assert!(matches!(
            "not-a-color".parse::<Color>(),
            Err(EmbedError::InvalidColor(_))
        ));
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn set_color_round_trips_through_serialization() {
        for value in [0, 42, Color::MAX] {
            let mut embed = Embed::new();
            embed.set_color(value).unwrap();
            assert_eq!(to_map(&embed)["color"], json!(value));
        }
    }

    #[test]
    fn set_color_rejects_out_of_range() {
        let mut embed = Embed::new();
        assert!(embed.set_color(16_777_216).is_err());
        assert!(embed.color().is_none());
    }

    #[test]
    fn clear_color_removes_the_color_without_error() {
        let mut embed = Embed::new();
        embed.set_color("abcdef").unwrap();
        embed.clear_color();
        assert!(embed.color().is_none());
        assert!(!to_map(&embed).contains_key("color"));
    }
}

mod serialization {
    use super::*;

    #[test]
    fn fresh_embed_serializes_to_empty_object() {
        let embed = Embed::new();
        assert!(embed.is_empty());
        assert_eq!(embed.to_json(), json!({}));
    }

    #[test]
    fn only_set_fields_appear() {
        let mut embed = Embed::new();
        embed.set_title("title");
        embed.set_description("description");
        assert_eq!(
            embed.to_json(),
            json!({"title": "title", "description": "description"})
        );
    }

    #[test]
    fn empty_strings_are_treated_as_unset() {
        let mut embed = Embed::new();
        embed.set_title("");
        assert!(embed.is_empty());
        assert_eq!(embed.to_json(), json!({}));
    }

    #[test]
    fn sub_objects_omit_absent_parameters() {
        let mut embed = Embed::new();
        embed.set_image(EmbedImage::new("https://example.com/a.png"));
        embed.set_footer(EmbedFooter::new("footer").with_icon_url("https://example.com/i.png"));
        embed.set_provider(EmbedProvider::new());

        let map = to_map(&embed);
        assert_eq!(map["image"], json!({"url": "https://example.com/a.png"}));
        assert_eq!(
            map["footer"],
            json!({"text": "footer", "icon_url": "https://example.com/i.png"})
        );
        assert_eq!(map["provider"], json!({}));
    }

    #[test]
    fn image_extras_appear_when_supplied() {
        let mut embed = Embed::new();
        embed.set_thumbnail(
            EmbedImage::new("https://example.com/t.png")
                .with_height(64)
                .with_width(128),
        );
        assert_eq!(
            to_map(&embed)["thumbnail"],
            json!({"url": "https://example.com/t.png", "height": 64, "width": 128})
        );
    }
}

mod fields {
    use super::*;

    #[test]
    fn add_field_appends_in_order() {
        let mut embed = Embed::new();
        embed.add_field("first", "1", true);
        embed.add_field("second", "2", false);

        assert_eq!(
            to_map(&embed)["fields"],
            json!([
                {"name": "first", "value": "1", "inline": true},
                {"name": "second", "value": "2", "inline": false},
            ])
        );
    }

    #[test]
    fn remove_field_restores_the_empty_state() {
        let mut embed = Embed::new();
        embed.add_field("only", "one", true);
        let removed = embed.remove_field(0).unwrap();

        assert_eq!(removed.name, "only");
        assert!(embed.fields().is_empty());
        assert_eq!(embed.to_json(), json!({}));
    }

    #[test]
    fn remove_field_rejects_bad_index() {
        let mut embed = Embed::new();
        embed.add_field("a", "b", true);
        assert_eq!(
            embed.remove_field(1),
            Err(EmbedError::FieldIndexOutOfRange { index: 1, len: 1 })
        );
    }
}

mod timestamps {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn epoch_seconds_normalize_to_iso8601() {
        let mut embed = Embed::new();
        embed.set_timestamp(0.0);
        assert_eq!(to_map(&embed)["timestamp"], json!("1970-01-01T00:00:00.000000Z"));
    }

    #[test]
    fn fractional_epochs_keep_sub_second_precision() {
        let mut embed = Embed::new();
        embed.set_timestamp(1_609_459_200.5);
        assert_eq!(
            to_map(&embed)["timestamp"],
            json!("2021-01-01T00:00:00.500000Z")
        );
    }

    #[test]
    fn structured_datetimes_are_accepted() {
        let mut embed = Embed::new();
        let when = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        embed.set_timestamp(when);
        assert_eq!(
            to_map(&embed)["timestamp"],
            json!("2024-06-01T12:00:00.000000Z")
        );
    }

    #[test]
    fn now_produces_a_parsable_timestamp() {
        let mut embed = Embed::new();
        embed.set_timestamp_now();
        let map = to_map(&embed);
        let raw = map["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(raw).is_ok());
    }
}

mod length {
    use super::*;

    #[test]
    fn sums_title_description_footer_author_and_fields() {
        let mut embed = Embed::new();
        embed.set_title("title"); // 5
        embed.set_description("desc"); // 4
        embed.set_footer(EmbedFooter::new("foot").with_icon_url("ignored")); // 4
        embed.set_author(EmbedAuthor::new("me").with_url("ignored")); // 2
        embed.add_field("name", "value", true); // 9

        assert_eq!(embed.length(), 5 + 4 + 4 + 2 + 9);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut embed = Embed::new();
        embed.set_title("héllo"); // 5 chars, 6 bytes
        assert_eq!(embed.length(), 5);
    }

    #[test]
    fn empty_embed_has_zero_length() {
        assert_eq!(Embed::new().length(), 0);
    }
}
