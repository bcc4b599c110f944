//! End-to-end collection against a mock marketplace: real HTTP loads, a
//! registry built from an in-memory site list, then ranking.

use pricescout_core::{Pacing, PriceStrategy, SiteConfig, SitesFile};
use pricescout_scraper::{
    best_price, is_best, rank, AdapterRegistry, CollectSummary, HttpPageLoader, PriceCollector,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_registry() -> AdapterRegistry {
    AdapterRegistry::new(SitesFile {
        sites: vec![SiteConfig {
            domain: "127.0.0.1".to_string(),
            price: PriceStrategy::Text {
                selector: "span.price".to_string(),
            },
        }],
    })
    .expect("local registry should validate")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn collects_priced_pages_and_ranks_cheapest_first() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", r#"<span class="price">R$ 1.234,56</span>"#).await;
    mount_page(&server, "/b", r#"<span class="price">R$ 899,00</span>"#).await;
    mount_page(&server, "/c", r#"<span class="price">Consulte</span>"#).await;
    mount_page(&server, "/d", r#"<p>Produto indisponível</p>"#).await;
    mount_page(&server, "/e", r#"<span class="price">899,00</span>"#).await;
    mount_page(&server, "/f", r#"<span class="price">R$ 0,00</span>"#).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let urls: Vec<String> = ["/a", "/b", "/c", "/d", "/gone", "/e", "/f"]
        .iter()
        .map(|p| format!("{}{p}", server.uri()))
        .collect();

    let registry = local_registry();
    let loader = HttpPageLoader::new(5, "pricescout-test/0.1", 0, 0, Pacing::NONE).unwrap();
    let collector = PriceCollector::new(&loader, &registry);

    let mut offers = Vec::new();
    let summary = collector.collect_into(&urls, &mut offers).await;

    assert_eq!(
        summary,
        CollectSummary {
            attempted: 7,
            collected: 3,
            page_load_failures: 1,
            unknown_domains: 0,
            missing_elements: 1,
            unparseable_prices: 1,
            zero_prices: 1,
        }
    );

    let ranked = rank(offers, 2);
    let links: Vec<&str> = ranked.iter().map(|o| o.source_url.as_str()).collect();
    assert_eq!(links, vec![urls[1].as_str(), urls[5].as_str()]);

    let best = best_price(&ranked);
    assert_eq!(best.map(|p| p.value()), Some(899.0));
    assert!(ranked.iter().all(|o| is_best(o, best)));
    assert!(ranked.iter().all(|o| o.domain.as_str() == "127.0.0.1"));
}

#[tokio::test]
async fn all_failures_yield_no_offers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let urls = vec![format!("{}/x", server.uri()), format!("{}/y", server.uri())];
    let registry = local_registry();
    let loader = HttpPageLoader::new(5, "pricescout-test/0.1", 0, 0, Pacing::NONE).unwrap();

    let offers = PriceCollector::new(&loader, &registry).collect(&urls).await;
    assert!(rank(offers, 5).is_empty());
}
