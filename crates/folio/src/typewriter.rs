//! The cycling title line on the profile card.

/// Time to type one character.
pub const CHAR_MS: u64 = 75;
/// How long a finished title stays up, cursor hidden.
pub const PAUSE_MS: u64 = 2000;

/// What the title line shows at some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typed<'a> {
    /// The part of the title typed so far.
    pub text: &'a str,
    /// Whether the `|` cursor is showing.
    pub cursor: bool,
}

/// How long one title occupies the line, typing plus pause.
fn span_ms(title: &str) -> u64 {
    (title.chars().count() as u64 + 1) * CHAR_MS + PAUSE_MS
}

/// The title line `elapsed_ms` after the card first appeared.
///
/// One character appears every [`CHAR_MS`]; a tick after the last one the
/// cursor disappears for [`PAUSE_MS`], then the next title starts from
/// nothing. Titles repeat forever.
pub fn typed(titles: &[String], elapsed_ms: u64) -> Typed<'_> {
    let cycle: u64 = titles.iter().map(|title| span_ms(title)).sum();
    if cycle == 0 {
        return Typed {
            text: "",
            cursor: false,
        };
    }

    let mut offset = elapsed_ms % cycle;
    for title in titles {
        let span = span_ms(title);
        if offset >= span {
            offset -= span;
            continue;
        }
        let len = title.chars().count();
        let shown = usize::try_from(offset / CHAR_MS).unwrap_or(usize::MAX).min(len);
        let end = title
            .char_indices()
            .nth(shown)
            .map_or(title.len(), |(index, _)| index);
        return Typed {
            text: &title[..end],
            cursor: offset < span - PAUSE_MS,
        };
    }

    Typed {
        text: "",
        cursor: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> Vec<String> {
        vec!["Hi".to_string(), "Welt".to_string()]
    }

    #[test]
    fn test_types_one_char_per_tick() {
        let titles = titles();
        assert_eq!(typed(&titles, 0), Typed { text: "", cursor: true });
        assert_eq!(typed(&titles, 75), Typed { text: "H", cursor: true });
        assert_eq!(typed(&titles, 150), Typed { text: "Hi", cursor: true });
    }

    #[test]
    fn test_cursor_hides_during_pause() {
        let titles = titles();
        assert_eq!(typed(&titles, 225), Typed { text: "Hi", cursor: false });
        assert_eq!(typed(&titles, 2224), Typed { text: "Hi", cursor: false });
    }

    #[test]
    fn test_moves_to_next_title_and_wraps() {
        let titles = titles();
        assert_eq!(typed(&titles, 2225), Typed { text: "", cursor: true });
        assert_eq!(typed(&titles, 2225 + 300), Typed { text: "Welt", cursor: true });

        let cycle = 2225 + 2375;
        assert_eq!(typed(&titles, cycle + 75), typed(&titles, 75));
    }

    #[test]
    fn test_multibyte_titles_cut_on_char_boundaries() {
        let titles = vec!["Ωmega".to_string()];
        assert_eq!(typed(&titles, 75).text, "Ω");
        assert_eq!(typed(&titles, 150).text, "Ωm");
    }

    #[test]
    fn test_no_titles() {
        assert_eq!(typed(&[], 12345), Typed { text: "", cursor: false });
    }
}
