//! URL slugs for artists, posts and services.

use thiserror::Error;

pub const MAX_SLUG_LEN: usize = 80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("cannot derive a slug from {0:?}")]
    Empty(String),
}

fn fold(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    })
}

/// Lowercase ASCII slug: runs of anything that is not `[a-z0-9]` collapse
/// into a single `-`.
pub fn slugify(text: &str) -> Result<String, SlugError> {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        let piece: Option<String> = if c.is_ascii_alphanumeric() {
            Some(c.to_string())
        } else {
            fold(c).map(str::to_string)
        };
        match piece {
            Some(p) => {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push_str(&p);
            }
            None => pending_dash = true,
        }
    }

    if out.len() > MAX_SLUG_LEN {
        // ASCII only at this point; a dash right after the cap means the last word fits.
        let ends_on_word = out.as_bytes()[MAX_SLUG_LEN] == b'-';
        out.truncate(MAX_SLUG_LEN);
        if !ends_on_word {
            if let Some(cut) = out.rfind('-') {
                out.truncate(cut);
            }
        }
    }
    let out = out.trim_matches('-').to_string();
    if out.is_empty() {
        return Err(SlugError::Empty(text.to_string()));
    }
    Ok(out)
}

/// `base` if it is free, otherwise the first free `base-N` with N >= 2.
pub fn unique_slug<F>(base: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_taken(base) {
        return base.to_string();
    }
    (2u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Whether `s` is already in canonical slug form.
pub fn is_valid_slug(s: &str) -> bool {
    matches!(slugify(s), Ok(ref canon) if canon == s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_punctuation_and_spaces() {
        assert_eq!(slugify("  Hello,   World!! ").unwrap(), "hello-world");
        assert_eq!(slugify("Art & Design -- 2024").unwrap(), "art-design-2024");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(slugify("Café Crème Brûlée").unwrap(), "cafe-creme-brulee");
        assert_eq!(slugify("Straße").unwrap(), "strasse");
    }

    #[test]
    fn rejects_text_without_slug_characters() {
        assert!(matches!(slugify("!!!"), Err(SlugError::Empty(_))));
        assert!(slugify("").is_err());
    }

    #[test]
    fn long_titles_are_cut_on_a_word_boundary() {
        let title = "word ".repeat(40);
        let slug = slugify(&title).unwrap();
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
        assert!(slug.split('-').all(|w| w == "word"));
    }

    #[test]
    fn word_ending_exactly_at_the_cap_is_kept() {
        let text = format!("aaaa-{}-c", "b".repeat(75));
        let slug = slugify(&text).unwrap();
        assert_eq!(slug.len(), MAX_SLUG_LEN);
        assert_eq!(slug, format!("aaaa-{}", "b".repeat(75)));
    }

    #[test]
    fn unique_slug_appends_first_free_suffix() {
        let taken = ["mural", "mural-2"];
        assert_eq!(unique_slug("mural", |s| taken.contains(&s)), "mural-3");
        assert_eq!(unique_slug("poster", |s| taken.contains(&s)), "poster");
    }

    #[test]
    fn validates_canonical_slugs() {
        assert!(is_valid_slug("good-slug-1"));
        assert!(!is_valid_slug("Bad Slug"));
        assert!(!is_valid_slug("-edge"));
    }
}
