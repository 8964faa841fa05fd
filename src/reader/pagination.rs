pub const WORDS_PER_PAGE: usize = 200;

/// Split `text` into pages of `words_per_page` whitespace-delimited words.
///
/// Words within a page are joined by a single space; the last page may be
/// shorter. A page size of zero is treated as one.
pub fn paginate(text: &str, words_per_page: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_page.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// round((page + 1) / total_pages * 100), capped at 100. Zero pages read as 0%.
pub fn percentage_read(page: usize, total_pages: usize) -> u8 {
    if total_pages == 0 {
        return 0;
    }
    let pct = ((page + 1) as f64 / total_pages as f64 * 100.0).round();
    pct.min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn four_hundred_fifty_words_make_three_pages() {
        let text = words(450);
        let pages = paginate(&text, WORDS_PER_PAGE);
        let lengths: Vec<usize> = pages.iter().map(|p| p.split(' ').count()).collect();
        assert_eq!(lengths, [200, 200, 50]);
        assert!(pages[0].starts_with("w0 w1 "));
        assert!(pages[2].ends_with("w449"));
        assert_eq!(paginate(&text, WORDS_PER_PAGE), pages);
    }

    #[test]
    fn whitespace_runs_collapse() {
        let pages = paginate("  call\tme \n\n Ishmael  ", 2);
        assert_eq!(pages, ["call me", "Ishmael"]);
    }

    #[test]
    fn empty_text_has_no_pages() {
        assert!(paginate("", WORDS_PER_PAGE).is_empty());
        assert!(paginate(" \n\t ", WORDS_PER_PAGE).is_empty());
    }

    #[test]
    fn zero_page_size_does_not_panic() {
        assert_eq!(paginate("a b", 0), ["a", "b"]);
    }

    #[test]
    fn percentages() {
        assert_eq!(percentage_read(0, 3), 33);
        assert_eq!(percentage_read(1, 3), 67);
        assert_eq!(percentage_read(2, 3), 100);
        assert_eq!(percentage_read(0, 1), 100);
        assert_eq!(percentage_read(0, 8), 13);
        assert_eq!(percentage_read(0, 0), 0);
    }
}
