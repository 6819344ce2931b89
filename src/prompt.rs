// Prompt composition for the scrollwork fill models. Pure string work:
// caller text (or a fixed default) plus fixed style suffixes. The fallback
// model historically got a shorter negative suffix; both variants are kept.

pub const DEFAULT_PROMPT: &str = "intricate western scrollwork engraving pattern, \
flowing acanthus leaves and baroque flourishes, ornate decorative fill, \
black and white line art, laser engraving ready, detailed filigree design";

pub const PROMPT_SUFFIX: &str = ", ornate pattern filling the white area completely, \
dense scrollwork, decorative engraving design, black line art on white background";

pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, low quality, pixelated, color, photographic, 3d render, text, watermark";

pub const NEGATIVE_SUFFIX: &str = ", empty space, blank areas, void regions, sparse pattern";

pub const NEGATIVE_SUFFIX_FALLBACK: &str = ", empty space, blank areas";

// Final prompt strings sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub positive: String,
    pub negative: String,
    pub negative_fallback: String,
}

pub fn compose(prompt: Option<&str>, negative_prompt: Option<&str>) -> PromptSet {
    let base = non_empty(prompt).unwrap_or(DEFAULT_PROMPT);
    let negative_base = non_empty(negative_prompt).unwrap_or(DEFAULT_NEGATIVE_PROMPT);

    PromptSet {
        positive: format!("{base}{PROMPT_SUFFIX}"),
        negative: format!("{negative_base}{NEGATIVE_SUFFIX}"),
        negative_fallback: format!("{negative_base}{NEGATIVE_SUFFIX_FALLBACK}"),
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_prompt_gets_the_style_suffix() {
        let set = compose(Some("oak leaf border"), Some("color"));
        assert_eq!(set.positive, format!("oak leaf border{PROMPT_SUFFIX}"));
        assert_eq!(set.negative, format!("color{NEGATIVE_SUFFIX}"));
        assert_eq!(
            set.negative_fallback,
            format!("color{NEGATIVE_SUFFIX_FALLBACK}")
        );
    }

    #[test]
    fn empty_input_uses_the_fixed_defaults() {
        let set = compose(None, None);
        assert_eq!(set.positive, format!("{DEFAULT_PROMPT}{PROMPT_SUFFIX}"));
        assert_eq!(
            set.negative,
            format!("{DEFAULT_NEGATIVE_PROMPT}{NEGATIVE_SUFFIX}")
        );

        // Whitespace-only is treated the same as absent.
        let blank = compose(Some("   "), Some(""));
        assert_eq!(blank, set);
    }

    #[test]
    fn composition_is_deterministic() {
        let a = compose(Some("vine scroll"), None);
        let b = compose(Some("vine scroll"), None);
        assert_eq!(a, b);
    }
}
