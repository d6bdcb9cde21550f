//! Text normalization for fuzzy comparison

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold text to a canonical comparable form.
///
/// Decomposes (NFD), drops combining marks, turns anything that is not a
/// letter, digit or whitespace into a space, collapses whitespace runs, trims
/// and upper-cases.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("Café São João"), "CAFE SAO JOAO");
        assert_eq!(normalize("Pingo Doce Água"), "PINGO DOCE AGUA");
    }

    #[test]
    fn punctuation_becomes_space() {
        assert_eq!(normalize("COMPRA*LIDL/VAGOS"), "COMPRA LIDL VAGOS");
        assert_eq!(normalize("amazon.com-marketplace"), "AMAZON COM MARKETPLACE");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(normalize("  lidl \t\n  vagos  "), "LIDL VAGOS");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize("MB WAY 912345678"), "MB WAY 912345678");
    }

    #[test]
    fn symbol_only_text_is_empty() {
        assert_eq!(normalize("*** -- ///"), "");
        assert_eq!(normalize(""), "");
    }
}
