//! Image transform options and their provider token encoding.
//!
//! The primary provider accepts a compact transform syntax where every
//! option becomes a `<key>-<value>` token and all tokens share one
//! query parameter:
//!
//! ```text
//! /images/a.jpg?tr=w-400,h-300,q-80,f-webp
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::TransformError;

/// Query key carrying the joined transform tokens.
pub const TRANSFORM_QUERY_KEY: &str = "tr";

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Let the provider negotiate from the `Accept` header.
    Auto,
    /// WebP.
    Webp,
    /// AVIF.
    Avif,
    /// JPEG.
    #[serde(alias = "jpeg")]
    Jpg,
    /// PNG.
    Png,
}

impl ImageFormat {
    /// Returns the provider token value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "webp" => Ok(Self::Webp),
            "avif" => Ok(Self::Avif),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            _ => Err(TransformError::unknown("format", s)),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the image is fitted into the requested dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    /// Resize keeping the aspect ratio, cropping the overflow.
    MaintainRatio,
    /// Squash or stretch to the exact dimensions.
    Force,
    /// Result is at least the requested size on both axes.
    AtLeast,
    /// Result fits within the requested size on both axes.
    AtMax,
}

impl CropMode {
    /// Returns the provider token value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaintainRatio => "maintain_ratio",
            Self::Force => "force",
            Self::AtLeast => "at_least",
            Self::AtMax => "at_max",
        }
    }
}

impl FromStr for CropMode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "maintain_ratio" => Ok(Self::MaintainRatio),
            "force" => Ok(Self::Force),
            "at_least" => Ok(Self::AtLeast),
            "at_max" => Ok(Self::AtMax),
            _ => Err(TransformError::unknown("crop mode", s)),
        }
    }
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anchor kept in view when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FocusPoint {
    Center,
    Top,
    Left,
    Bottom,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FocusPoint {
    /// Returns the provider token value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Left => "left",
            Self::Bottom => "bottom",
            Self::Right => "right",
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
        }
    }
}

impl FromStr for FocusPoint {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            "left" => Ok(Self::Left),
            "bottom" => Ok(Self::Bottom),
            "right" => Ok(Self::Right),
            "top_left" => Ok(Self::TopLeft),
            "top_right" => Ok(Self::TopRight),
            "bottom_left" => Ok(Self::BottomLeft),
            "bottom_right" => Ok(Self::BottomRight),
            _ => Err(TransformError::unknown("focus", s)),
        }
    }
}

impl fmt::Display for FocusPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aspect ratio written as `W:H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

impl AspectRatio {
    /// Creates a ratio, rejecting zero terms.
    ///
    /// # Errors
    /// Returns error if either term is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::aspect_ratio(
                format!("{width}:{height}"),
                "terms must be greater than zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Returns the width term.
    #[must_use]
    pub const fn width(self) -> u32 {
        self.width
    }

    /// Returns the height term.
    #[must_use]
    pub const fn height(self) -> u32 {
        self.height
    }
}

impl FromStr for AspectRatio {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TransformError::aspect_ratio(s, "expected W:H"))?;

        let parse = |term: &str| {
            term.trim()
                .parse::<u32>()
                .map_err(|e| TransformError::aspect_ratio(s, e.to_string()))
        };

        Self::new(parse(w)?, parse(h)?)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Validated per-call transform options.
///
/// Every field is independently optional and independently encoded. Build
/// through [`TransformOptions::builder`]; an empty value applies no
/// transform at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransformBuilder")]
pub struct TransformOptions {
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u8>,
    format: Option<ImageFormat>,
    blur: Option<u32>,
    aspect_ratio: Option<AspectRatio>,
    crop: Option<CropMode>,
    focus: Option<FocusPoint>,
}

impl TransformOptions {
    /// Returns an empty option set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> TransformBuilder {
        TransformBuilder::default()
    }

    /// Returns a builder seeded with these options.
    #[must_use]
    pub fn to_builder(&self) -> TransformBuilder {
        TransformBuilder {
            width: self.width,
            height: self.height,
            quality: self.quality.map(u32::from),
            format: self.format,
            blur: self.blur,
            aspect_ratio: self.aspect_ratio,
            crop: self.crop,
            focus: self.focus,
        }
    }

    /// Returns a copy with the width replaced.
    ///
    /// # Errors
    /// Returns error if `width` is zero.
    pub fn with_width(&self, width: u32) -> Result<Self, TransformError> {
        self.to_builder().width(width).build()
    }

    /// Returns the target width in pixels.
    #[must_use]
    pub const fn width(&self) -> Option<u32> {
        self.width
    }

    /// Returns the target height in pixels.
    #[must_use]
    pub const fn height(&self) -> Option<u32> {
        self.height
    }

    /// Returns the output quality.
    #[must_use]
    pub const fn quality(&self) -> Option<u8> {
        self.quality
    }

    /// Returns the output format.
    #[must_use]
    pub const fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Returns the blur radius.
    #[must_use]
    pub const fn blur(&self) -> Option<u32> {
        self.blur
    }

    /// Returns the aspect ratio.
    #[must_use]
    pub const fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    /// Returns the crop mode.
    #[must_use]
    pub const fn crop(&self) -> Option<CropMode> {
        self.crop
    }

    /// Returns the crop focus point.
    #[must_use]
    pub const fn focus(&self) -> Option<FocusPoint> {
        self.focus
    }

    /// Returns whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    /// Encodes the set options as provider tokens in a fixed order.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();

        if let Some(width) = self.width {
            tokens.push(format!("w-{width}"));
        }
        if let Some(height) = self.height {
            tokens.push(format!("h-{height}"));
        }
        if let Some(quality) = self.quality {
            tokens.push(format!("q-{quality}"));
        }
        if let Some(format) = self.format {
            tokens.push(format!("f-{format}"));
        }
        if let Some(blur) = self.blur {
            tokens.push(format!("bl-{blur}"));
        }
        // The token grammar reserves ':' so the ratio is dash separated.
        if let Some(ratio) = self.aspect_ratio {
            tokens.push(format!("ar-{}-{}", ratio.width(), ratio.height()));
        }
        if let Some(crop) = self.crop {
            tokens.push(format!("c-{crop}"));
        }
        if let Some(focus) = self.focus {
            tokens.push(format!("fo-{focus}"));
        }

        tokens
    }

    /// Returns `tr=<tokens>`, or `None` when nothing is set.
    #[must_use]
    pub fn to_query_param(&self) -> Option<String> {
        let tokens = self.tokens();
        if tokens.is_empty() {
            None
        } else {
            Some(format!("{TRANSFORM_QUERY_KEY}={}", tokens.join(",")))
        }
    }
}

/// Builder validating [`TransformOptions`] on [`build`](Self::build).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformBuilder {
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u32>,
    format: Option<ImageFormat>,
    blur: Option<u32>,
    aspect_ratio: Option<AspectRatio>,
    crop: Option<CropMode>,
    focus: Option<FocusPoint>,
}

impl TransformBuilder {
    /// Sets target width in pixels.
    #[must_use]
    pub const fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets target height in pixels.
    #[must_use]
    pub const fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets output quality (1-100).
    #[must_use]
    pub const fn quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Sets output format.
    #[must_use]
    pub const fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets gaussian blur radius.
    #[must_use]
    pub const fn blur(mut self, blur: u32) -> Self {
        self.blur = Some(blur);
        self
    }

    /// Sets aspect ratio.
    #[must_use]
    pub const fn aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Sets crop mode.
    #[must_use]
    pub const fn crop(mut self, crop: CropMode) -> Self {
        self.crop = Some(crop);
        self
    }

    /// Sets focus anchor.
    #[must_use]
    pub const fn focus(mut self, focus: FocusPoint) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Validates and builds the options.
    ///
    /// # Errors
    /// Returns error on zero dimensions or quality outside `1..=100`.
    pub fn build(self) -> Result<TransformOptions, TransformError> {
        if self.width == Some(0) {
            return Err(TransformError::ZeroDimension { field: "width" });
        }
        if self.height == Some(0) {
            return Err(TransformError::ZeroDimension { field: "height" });
        }

        let quality = match self.quality {
            Some(value @ 1..=100) => Some(u8::try_from(value).unwrap_or(100)),
            Some(value) => return Err(TransformError::QualityOutOfRange { value }),
            None => None,
        };

        Ok(TransformOptions {
            width: self.width,
            height: self.height,
            quality,
            format: self.format,
            blur: self.blur,
            aspect_ratio: self.aspect_ratio,
            crop: self.crop,
            focus: self.focus,
        })
    }
}

impl TryFrom<TransformBuilder> for TransformOptions {
    type Error = TransformError;

    fn try_from(value: TransformBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_empty_options_have_no_query() {
        let options = TransformOptions::none();

        assert!(options.is_empty());
        assert_eq!(options.to_query_param(), None);
    }

    #[test]
    fn test_all_tokens_in_fixed_order() {
        let options = TransformOptions::builder()
            .focus(FocusPoint::TopLeft)
            .crop(CropMode::AtMax)
            .aspect_ratio("16:9".parse().unwrap())
            .blur(10)
            .format(ImageFormat::Webp)
            .quality(80)
            .height(300)
            .width(400)
            .build()
            .unwrap();

        assert_eq!(
            options.to_query_param().as_deref(),
            Some("tr=w-400,h-300,q-80,f-webp,bl-10,ar-16-9,c-at_max,fo-top_left")
        );
    }

    #[test]
    fn test_zero_blur_is_still_encoded() {
        let options = TransformOptions::builder().blur(0).build().unwrap();
        assert_eq!(options.tokens(), vec!["bl-0".to_string()]);
    }

    #[test_case(0 ; "zero")]
    #[test_case(101 ; "above_max")]
    #[test_case(1000 ; "far_above_max")]
    fn test_quality_out_of_range_rejected(quality: u32) {
        let result = TransformOptions::builder().quality(quality).build();
        assert_eq!(
            result,
            Err(TransformError::QualityOutOfRange { value: quality })
        );
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            TransformOptions::builder().width(0).build(),
            Err(TransformError::ZeroDimension { field: "width" })
        );
        assert_eq!(
            TransformOptions::builder().height(0).build(),
            Err(TransformError::ZeroDimension { field: "height" })
        );
    }

    #[test_case("16:9", Some((16, 9)) ; "widescreen")]
    #[test_case(" 4 : 3 ", Some((4, 3)) ; "padded")]
    #[test_case("16x9", None ; "wrong_separator")]
    #[test_case("0:9", None ; "zero_term")]
    #[test_case("a:b", None ; "not_numeric")]
    #[test_case("", None ; "empty")]
    fn test_aspect_ratio_parsing(input: &str, expected: Option<(u32, u32)>) {
        let parsed = input.parse::<AspectRatio>().ok();
        assert_eq!(parsed.map(|r| (r.width(), r.height())), expected);
    }

    #[test_case("jpeg", ImageFormat::Jpg ; "jpeg_alias")]
    #[test_case("WEBP", ImageFormat::Webp ; "uppercase")]
    #[test_case("avif", ImageFormat::Avif ; "avif")]
    fn test_format_parsing(input: &str, expected: ImageFormat) {
        assert_eq!(input.parse::<ImageFormat>().unwrap(), expected);
    }

    #[test]
    fn test_enum_parsing_accepts_dashes() {
        assert_eq!("at-least".parse::<CropMode>().unwrap(), CropMode::AtLeast);
        assert_eq!(
            "bottom-right".parse::<FocusPoint>().unwrap(),
            FocusPoint::BottomRight
        );
        assert!("diagonal".parse::<FocusPoint>().is_err());
    }

    #[test]
    fn test_with_width_keeps_other_fields() {
        let base = TransformOptions::builder()
            .width(100)
            .format(ImageFormat::Avif)
            .build()
            .unwrap();

        let widened = base.with_width(800).unwrap();

        assert_eq!(widened.width(), Some(800));
        assert_eq!(widened.format(), Some(ImageFormat::Avif));
        assert!(base.with_width(0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let options: TransformOptions = toml::from_str(
            r#"
            width = 640
            quality = 70
            format = "webp"
            aspect_ratio = "3:2"
            crop = "maintain_ratio"
            focus = "center"
            "#,
        )
        .expect("valid preset");

        assert_eq!(options.width(), Some(640));
        assert_eq!(options.aspect_ratio().map(|r| r.to_string()).as_deref(), Some("3:2"));

        let invalid = toml::from_str::<TransformOptions>("quality = 0");
        assert!(invalid.is_err());
    }
}
