use scraper::ElementRef;

/// Rendered text of an element on a single line
///
/// Text nodes are concatenated in document order, then whitespace runs
/// (including the line breaks of the page source) collapse to one space.
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    normalize_whitespace(&raw)
}

/// Trims the text and collapses every whitespace run into a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   "), "");
        assert_eq!(normalize_whitespace("  Calle\n   Mayor\t 1 "), "Calle Mayor 1");
    }

    #[test]
    fn test_element_text_joins_inline_nodes() {
        let doc = Html::parse_fragment(
            "<span class=\"direccion\">\n  Calle <b>Mayor</b>, 1\n  28013 Madrid\n</span>",
        );
        let selector = Selector::parse(".direccion").unwrap();
        let element = doc.select(&selector).next().unwrap();
        assert_eq!(element_text(element), "Calle Mayor, 1 28013 Madrid");
    }
}
