use std::cell::RefCell;
use std::collections::HashMap;

use pricescout_core::{CanonicalPrice, Domain};

use super::*;
use crate::page::HtmlPage;

/// Serves canned HTML per URL and records every load. URLs without a
/// canned page fail like a dead link.
#[derive(Default)]
struct FakeLoader {
    pages: HashMap<String, String>,
    loads: RefCell<Vec<String>>,
}

impl FakeLoader {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

impl PageLoader for FakeLoader {
    type Page = HtmlPage;

    async fn load(&self, url: &str) -> Result<HtmlPage, ScraperError> {
        self.loads.borrow_mut().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(HtmlPage::parse(url, html)),
            None => Err(ScraperError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

const AMAZON_URL: &str = "https://www.amazon.com.br/dp/B01";
const MAGALU_URL: &str = "https://www.magazineluiza.com.br/p/2";
const AMERICANAS_URL: &str = "https://www.americanas.com.br/produto/3";
const SHOPEE_URL: &str = "https://shopee.com.br/item-i.4";
const DEAD_URL: &str = "https://www.casasbahia.com.br/p/5";

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| (*u).to_string()).collect()
}

fn price(value: f64) -> CanonicalPrice {
    CanonicalPrice::new(value).unwrap()
}

fn mixed_loader() -> FakeLoader {
    FakeLoader::default()
        .with_page(
            AMAZON_URL,
            r#"<span id="priceblock_ourprice">R$ 250,00</span>"#,
        )
        .with_page(
            MAGALU_URL,
            r#"<div data-testid="product-price">R$ 199,90</div>"#,
        )
        // redesigned page: price element gone
        .with_page(AMERICANAS_URL, "<div class=\"new-price\">R$ 10,00</div>")
        // out-of-stock page with no meta price
        .with_page(SHOPEE_URL, "<p>Esgotado</p>")
}

#[tokio::test]
async fn partial_failures_are_skipped_not_raised() {
    let loader = mixed_loader();
    let registry = AdapterRegistry::with_defaults().unwrap();
    let collector = PriceCollector::new(&loader, &registry);

    let input = urls(&[AMAZON_URL, AMERICANAS_URL, DEAD_URL, SHOPEE_URL, MAGALU_URL]);
    let mut offers = Vec::new();
    let summary = collector.collect_into(&input, &mut offers).await;

    assert_eq!(offers.len(), 2);
    assert!(offers.contains(&Offer::new(
        Domain::Known("amazon.com.br".into()),
        AMAZON_URL,
        price(250.0)
    )));
    assert!(offers.contains(&Offer::new(
        Domain::Known("magazineluiza.com.br".into()),
        MAGALU_URL,
        price(199.9)
    )));
    assert_eq!(
        summary,
        CollectSummary {
            attempted: 5,
            collected: 2,
            page_load_failures: 1,
            unknown_domains: 0,
            missing_elements: 2,
            unparseable_prices: 0,
            zero_prices: 0,
        }
    );
    assert_eq!(summary.skipped(), 3);
}

#[tokio::test]
async fn empty_input_yields_no_offers_and_no_loads() {
    let loader = FakeLoader::default();
    let registry = AdapterRegistry::with_defaults().unwrap();
    let offers = PriceCollector::new(&loader, &registry).collect(&[]).await;
    assert!(offers.is_empty());
    assert!(loader.loads.borrow().is_empty());
}

#[tokio::test]
async fn every_url_is_loaded_in_order_including_repeats() {
    let loader = mixed_loader();
    let registry = AdapterRegistry::with_defaults().unwrap();
    let input = urls(&[MAGALU_URL, AMAZON_URL, MAGALU_URL]);

    let offers = PriceCollector::new(&loader, &registry).collect(&input).await;

    assert_eq!(*loader.loads.borrow(), input);
    assert_eq!(offers.len(), 3);
    assert_eq!(offers[0].source_url, MAGALU_URL);
    assert_eq!(offers[1].source_url, AMAZON_URL);
}

#[tokio::test]
async fn unknown_domain_is_counted_separately() {
    let loader = FakeLoader::default().with_page(
        "https://loja.example/p/1",
        r#"<span id="price-value">R$ 5,00</span>"#,
    );
    let registry = AdapterRegistry::with_defaults().unwrap();
    let mut offers = Vec::new();
    let summary = PriceCollector::new(&loader, &registry)
        .collect_into(&urls(&["https://loja.example/p/1"]), &mut offers)
        .await;

    assert!(offers.is_empty());
    assert_eq!(summary.unknown_domains, 1);
    assert_eq!(summary.missing_elements, 0);
}

#[tokio::test]
async fn classifier_domain_without_adapter_is_unknown() {
    let loader = FakeLoader::default().with_page("https://loja.example/p/1", "<p>R$ 5,00</p>");
    let registry = AdapterRegistry::with_defaults().unwrap();
    let classifier = DomainClassifier::new(["loja.example"]);
    let mut offers = Vec::new();
    let summary = PriceCollector::with_classifier(&loader, classifier, &registry)
        .collect_into(&urls(&["https://loja.example/p/1"]), &mut offers)
        .await;

    assert_eq!(summary.unknown_domains, 1);
}

#[tokio::test]
async fn unparseable_and_zero_prices_are_skipped() {
    let loader = FakeLoader::default()
        .with_page(
            AMERICANAS_URL,
            r#"<span id="price-value">Consulte</span>"#,
        )
        .with_page(
            MAGALU_URL,
            r#"<div data-testid="product-price">R$ 0,00</div>"#,
        );
    let registry = AdapterRegistry::with_defaults().unwrap();
    let mut offers = Vec::new();
    let summary = PriceCollector::new(&loader, &registry)
        .collect_into(&urls(&[AMERICANAS_URL, MAGALU_URL]), &mut offers)
        .await;

    assert!(offers.is_empty());
    assert_eq!(summary.unparseable_prices, 1);
    assert_eq!(summary.zero_prices, 1);
}

#[tokio::test]
async fn fraction_cents_page_produces_offer() {
    let url = "https://produto.mercadolivre.com.br/MLB-9";
    let loader = FakeLoader::default().with_page(
        url,
        r#"<span class="price-tag-fraction">1.234</span><span class="price-tag-cents">56</span>"#,
    );
    let registry = AdapterRegistry::with_defaults().unwrap();
    let offers = PriceCollector::new(&loader, &registry)
        .collect(&urls(&[url]))
        .await;

    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].price, price(1234.56));
    assert_eq!(offers[0].domain, Domain::Known("mercadolivre.com.br".into()));
}

/// Delegates to a [`FakeLoader`] but never finishes loading `stall_url`.
struct StallingLoader {
    inner: FakeLoader,
    stall_url: &'static str,
}

impl PageLoader for StallingLoader {
    type Page = HtmlPage;

    async fn load(&self, url: &str) -> Result<HtmlPage, ScraperError> {
        if url == self.stall_url {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        }
        self.inner.load(url).await
    }
}

#[tokio::test]
async fn dropped_collection_keeps_completed_offers() {
    let stalled = "https://www.submarino.com.br/produto/7";
    let loader = StallingLoader {
        inner: mixed_loader(),
        stall_url: stalled,
    };
    let registry = AdapterRegistry::with_defaults().unwrap();
    let collector = PriceCollector::new(&loader, &registry);
    let input = urls(&[MAGALU_URL, stalled, AMAZON_URL]);

    let mut offers = Vec::new();
    let result = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        collector.collect_into(&input, &mut offers),
    )
    .await;

    assert!(result.is_err(), "collection should still be stalled");
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].source_url, MAGALU_URL);
    assert_eq!(*loader.inner.loads.borrow(), urls(&[MAGALU_URL]));
}

#[test]
fn extract_errors_map_onto_skip_reasons() {
    let reason: SkipReason = ExtractError::UnknownDomain {
        domain: "x.example".into(),
    }
    .into();
    assert!(matches!(reason, SkipReason::UnknownDomain { .. }));

    let reason: SkipReason = ExtractError::NoElementFound {
        domain: "x.example".into(),
    }
    .into();
    assert!(matches!(reason, SkipReason::NoElementFound { .. }));
}
