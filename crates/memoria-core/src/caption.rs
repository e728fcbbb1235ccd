//! Captioned image URLs.
//!
//! The image host applies transformations encoded as path segments placed
//! right after the `/upload` segment of a delivery URL. [`apply_caption`]
//! builds a directive that darkens the image and writes the item's caption
//! near the top, then splices it into the URL. No network I/O happens here.

use crate::config::CaptionStyle;
use crate::{Error, ImageRef, Result};

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_chars` characters, marking the cut with
/// an ellipsis.
pub fn truncate_caption(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut out: String = text.chars().take(max_chars).collect();
        out.push_str(ELLIPSIS);
        out
    } else {
        text.to_string()
    }
}

/// Build the captioned URL for `image` using the default style.
pub fn apply_caption(image: &ImageRef, text: &str) -> Result<String> {
    apply_caption_with(&CaptionStyle::default(), image, text)
}

/// Build the captioned URL for `image` using `style`.
///
/// Fails with [`Error::TransformInputInvalid`] when the image has no URL,
/// no positive height, or a URL without the style's marker segment.
pub fn apply_caption_with(style: &CaptionStyle, image: &ImageRef, text: &str) -> Result<String> {
    let url = image
        .secure_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::transform("image has no secure_url"))?;
    let height = image
        .height
        .filter(|h| h.is_finite() && *h > 0.0)
        .ok_or_else(|| Error::transform("image has no positive height"))?;

    let splice_at = url
        .find(&style.marker)
        .map(|i| i + style.marker.len())
        .ok_or_else(|| {
            Error::transform(format!("url has no '{}' segment: {url}", style.marker))
        })?;

    let caption = urlencoding::encode(&truncate_caption(text, style.max_chars)).into_owned();
    let font_size = (height * 0.05).round() as i64;
    let y_offset = (height / 6.0).round() as i64;

    let directive = format!(
        "co_rgb:{overlay},e_colorize:{strength}/co_rgb:{text_color},l_text:{font}_{font_size}_italic_normal_left:{caption}/fl_layer_apply,g_north,x_{x},y_{y_offset}",
        overlay = style.overlay_color,
        strength = style.colorize_strength,
        text_color = style.text_color,
        font = style.font,
        x = style.x_nudge,
    );

    let (head, tail) = url.split_at(splice_at);
    let tail = tail.strip_prefix('/').unwrap_or(tail);
    let mut out = String::with_capacity(url.len() + directive.len() + 2);
    out.push_str(head);
    out.push('/');
    out.push_str(&directive);
    if !tail.is_empty() {
        out.push('/');
        out.push_str(tail);
    }
    Ok(out)
}
