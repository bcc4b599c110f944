//! Queryable view of a loaded product page.

use scraper::{Html, Selector};

/// Element lookup over a rendered page.
///
/// Lookups never fail: a missing element, or a selector that does not
/// parse, is `None`.
pub trait LoadedPage {
    /// Whitespace-collapsed text of the first element matching `selector`.
    fn select_text(&self, selector: &str) -> Option<String>;

    /// Trimmed value of `attribute` on the first element matching `selector`.
    fn select_attr(&self, selector: &str, attribute: &str) -> Option<String>;
}

/// A page backed by a parsed HTML document.
pub struct HtmlPage {
    url: String,
    document: Html,
}

impl HtmlPage {
    #[must_use]
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
        }
    }
}

impl std::fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPage").field("url", &self.url).finish()
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!(selector = css, error = %e, "ignoring unparseable selector");
            None
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl LoadedPage for HtmlPage {
    fn select_text(&self, selector: &str) -> Option<String> {
        let selector = parse_selector(selector)?;
        let element = self.document.select(&selector).next()?;
        Some(collapse_whitespace(&element.text().collect::<String>()))
    }

    fn select_attr(&self, selector: &str, attribute: &str) -> Option<String> {
        let selector = parse_selector(selector)?;
        let element = self.document.select(&selector).next()?;
        element.value().attr(attribute).map(|v| v.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
          <meta property="product:price:amount" content=" 149.90 ">
        </head><body>
          <div class="price"><span>R$</span>
            <span class="amount">1.299</span><span>,</span><span>99</span>
          </div>
          <div class="price">second</div>
          <span id="empty"></span>
        </body></html>
    "#;

    fn page() -> HtmlPage {
        HtmlPage::parse("https://loja.example/p/1", PAGE)
    }

    #[test]
    fn select_text_returns_first_match_collapsed() {
        assert_eq!(
            page().select_text("div.price").as_deref(),
            Some("R$ 1.299,99")
        );
    }

    #[test]
    fn select_text_missing_element_is_none() {
        assert!(page().select_text("#price-value").is_none());
    }

    #[test]
    fn select_text_present_but_empty_is_found() {
        assert_eq!(page().select_text("#empty").as_deref(), Some(""));
    }

    #[test]
    fn select_attr_reads_trimmed_value() {
        assert_eq!(
            page()
                .select_attr("meta[property='product:price:amount']", "content")
                .as_deref(),
            Some("149.90")
        );
    }

    #[test]
    fn select_attr_missing_attribute_is_none() {
        assert!(page().select_attr("div.price", "data-value").is_none());
    }

    #[test]
    fn invalid_selector_is_none() {
        assert!(page().select_text("div[").is_none());
        assert!(page().select_attr(":::", "content").is_none());
    }

    #[test]
    fn debug_shows_source_url_only() {
        let debug = format!("{:?}", page());
        assert_eq!(debug, r#"HtmlPage { url: "https://loja.example/p/1" }"#);
    }
}
