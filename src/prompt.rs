//! Prompt composition: style, quality preset and free text into the final prompt.

use std::fmt;
use std::str::FromStr;

use crate::error::GenerationError;

/// Appended to every composed prompt.
pub const BEAUTY_SUFFIX: &str = "beauty portrait, high quality, elegant makeup, professional lighting";

/// Returned when a label doesn't match any known option.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownOption(pub String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown option: {}", self.0)
    }
}

impl std::error::Error for UnknownOption {}

/// Beauty styles offered by the form.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Style {
    #[default]
    /// Bridal Makeup
    BridalMakeup,
    /// Natural Look
    NaturalLook,
    /// Glamorous
    Glamorous,
    /// Korean Glass Skin
    KoreanGlassSkin,
    /// Fantasy Makeup
    FantasyMakeup,
    /// Cyberpunk Look
    CyberpunkLook,
    /// Vintage Beauty
    VintageBeauty,
}

impl Style {
    /// Every style, in form order.
    pub const ALL: [Style; 7] = [
        Style::BridalMakeup,
        Style::NaturalLook,
        Style::Glamorous,
        Style::KoreanGlassSkin,
        Style::FantasyMakeup,
        Style::CyberpunkLook,
        Style::VintageBeauty,
    ];

    /// The label shown to users and placed at the front of the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Style::BridalMakeup => "Bridal Makeup",
            Style::NaturalLook => "Natural Look",
            Style::Glamorous => "Glamorous",
            Style::KoreanGlassSkin => "Korean Glass Skin",
            Style::FantasyMakeup => "Fantasy Makeup",
            Style::CyberpunkLook => "Cyberpunk Look",
            Style::VintageBeauty => "Vintage Beauty",
        }
    }
}

/// Quality presets. These only change the prompt text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub enum Quality {
    /// No extra descriptors
    Standard,
    #[default]
    /// ", high quality, detailed"
    High,
    /// The longest descriptor set
    Ultra,
}

impl Quality {
    /// Every preset, lowest first.
    pub const ALL: [Quality; 3] = [Quality::Standard, Quality::High, Quality::Ultra];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Quality::Standard => "Standard",
            Quality::High => "High",
            Quality::Ultra => "Ultra",
        }
    }

    /// Text appended to the free text before composition.
    pub fn suffix(self) -> &'static str {
        match self {
            Quality::Standard => "",
            Quality::High => ", high quality, detailed",
            Quality::Ultra => ", ultra high quality, extremely detailed, 4K, professional",
        }
    }
}

/// The "API source" selector. Only the Pollinations endpoint is ever called,
/// whatever is picked here.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ApiSource {
    #[default]
    /// Auto (Recommended)
    Auto,
    /// Pollinations
    Pollinations,
    /// Craiyon, not wired
    Craiyon,
    /// Stable Diffusion, not wired
    StableDiffusion,
}

impl ApiSource {
    /// Every source, in form order.
    pub const ALL: [ApiSource; 4] = [
        ApiSource::Auto,
        ApiSource::Pollinations,
        ApiSource::Craiyon,
        ApiSource::StableDiffusion,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ApiSource::Auto => "Auto (Recommended)",
            ApiSource::Pollinations => "Pollinations",
            ApiSource::Craiyon => "Craiyon",
            ApiSource::StableDiffusion => "Stable Diffusion",
        }
    }

    /// True when picking this source actually routes to a different backend.
    pub fn is_wired(self) -> bool {
        matches!(self, ApiSource::Auto | ApiSource::Pollinations)
    }
}

macro_rules! label_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownOption;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|option| option.label().eq_ignore_ascii_case(value))
                    .ok_or_else(|| UnknownOption(value.to_string()))
            }
        }
    };
}

label_impls!(Style);
label_impls!(Quality);
label_impls!(ApiSource);

/// One submit of the generate form. Can only be built with a non-empty description.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerationRequest {
    free_text: String,
    style: Style,
    quality: Quality,
    api_source: ApiSource,
}

impl GenerationRequest {
    /// Fails only when the description is empty. Text is otherwise kept as typed.
    pub fn new(
        free_text: impl Into<String>,
        style: Style,
        quality: Quality,
        api_source: ApiSource,
    ) -> Result<Self, GenerationError> {
        let free_text = free_text.into();
        if free_text.is_empty() {
            return Err(GenerationError::Validation);
        }
        Ok(Self {
            free_text,
            style,
            quality,
            api_source,
        })
    }

    /// The user's description as typed.
    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// Selected style.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Selected quality preset.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Selected API source.
    pub fn api_source(&self) -> ApiSource {
        self.api_source
    }
}

/// Builds the text sent to the image endpoint:
/// `"{style}, {free text}{quality suffix}, {BEAUTY_SUFFIX}"`.
pub fn compose_prompt(request: &GenerationRequest) -> String {
    format!(
        "{}, {}{}, {}",
        request.style.label(),
        request.free_text,
        request.quality.suffix(),
        BEAUTY_SUFFIX
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, style: Style, quality: Quality) -> GenerationRequest {
        GenerationRequest::new(text, style, quality, ApiSource::Auto).expect("valid request")
    }

    #[test]
    fn ultra_glamorous_prompt() {
        let composed = compose_prompt(&request("elegant eyeliner", Style::Glamorous, Quality::Ultra));
        assert_eq!(
            composed,
            "Glamorous, elegant eyeliner, ultra high quality, extremely detailed, 4K, professional, beauty portrait, high quality, elegant makeup, professional lighting"
        );
    }

    #[test]
    fn standard_adds_no_quality_suffix() {
        let composed = compose_prompt(&request(
            "rosy cheeks",
            Style::NaturalLook,
            Quality::Standard,
        ));
        assert_eq!(
            composed,
            format!("Natural Look, rosy cheeks, {BEAUTY_SUFFIX}")
        );
    }

    #[test]
    fn quality_suffixes_are_distinct() {
        assert!(Quality::Standard.suffix().is_empty());
        assert!(!Quality::High.suffix().is_empty());
        assert!(!Quality::Ultra.suffix().is_empty());
        assert_ne!(Quality::High.suffix(), Quality::Ultra.suffix());

        let high = compose_prompt(&request("glow", Style::Glamorous, Quality::High));
        assert!(high.starts_with("Glamorous, glow, high quality, detailed, "));
    }

    #[test]
    fn composition_is_deterministic() {
        for style in Style::ALL {
            for quality in Quality::ALL {
                let req = request("soft smokey eye, ñ & ?", style, quality);
                assert_eq!(compose_prompt(&req), compose_prompt(&req.clone()));
            }
        }
    }

    #[test]
    fn empty_description_is_rejected() {
        assert_eq!(
            GenerationRequest::new("", Style::BridalMakeup, Quality::High, ApiSource::Auto),
            Err(GenerationError::Validation)
        );
    }

    #[test]
    fn blank_description_is_sent_as_typed() {
        let blank = request("   ", Style::Glamorous, Quality::Standard);
        assert_eq!(blank.free_text(), "   ");
        assert_eq!(
            compose_prompt(&blank),
            format!("Glamorous,    , {BEAUTY_SUFFIX}")
        );
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for style in Style::ALL {
            assert_eq!(style.label().parse::<Style>(), Ok(style));
        }
        for source in ApiSource::ALL {
            assert_eq!(source.to_string().parse::<ApiSource>(), Ok(source));
        }
        assert_eq!("ultra".parse::<Quality>(), Ok(Quality::Ultra));
        assert!("Extreme".parse::<Quality>().is_err());
        assert!(Quality::Standard < Quality::High && Quality::High < Quality::Ultra);
    }

    #[test]
    fn only_pollinations_is_wired() {
        let wired: Vec<ApiSource> = ApiSource::ALL
            .into_iter()
            .filter(|source| source.is_wired())
            .collect();
        assert_eq!(wired, vec![ApiSource::Auto, ApiSource::Pollinations]);
    }
}
