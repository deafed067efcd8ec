//! Network tests against public STAC catalogs.
//!
//! All tests are `#[ignore]`d. Run with:
//! `cargo test -p geomatica-cloud -- --ignored stac`

use geomatica_cloud::blocking::StacClientBlocking;
use geomatica_cloud::loader::LoadOptions;
use geomatica_cloud::{StacCatalog, StacClient, StacClientOptions, StacSearchParams};

/// The course area around Rancagua, January 2023.
fn course_search(collection: &str) -> StacSearchParams {
    StacSearchParams::new()
        .bbox(-71.399460, -34.366111, -70.633850, -34.084512)
        .datetime("2023-01-01/2023-01-31")
        .collections(&[collection])
        .max_cloud_cover(20.0)
        .limit(10)
}

#[tokio::test]
#[ignore]
async fn stac_planetary_computer_sentinel2() {
    let client = StacClient::new(StacCatalog::PlanetaryComputer, StacClientOptions::default())
        .expect("failed to create client");

    let items = client
        .search_nonempty(&course_search("sentinel-2-l2a"))
        .await
        .expect("search failed");

    for item in &items {
        println!(
            "  {} dt={} cc={:?} day={:?}",
            item.id,
            item.properties.datetime.as_deref().unwrap_or("-"),
            item.properties.eo_cloud_cover,
            item.solar_day()
        );
        assert!(item.properties.eo_cloud_cover.unwrap_or(0.0) < 20.0);
        assert!(item.asset("B04").is_some());
    }

    let signed = client
        .sign_href(&items[0].assets["B04"].href)
        .await
        .expect("signing failed");
    assert!(signed.contains("sig="), "signed href should carry a SAS token");
}

#[tokio::test]
#[ignore]
async fn stac_planetary_computer_landsat_platform_filter() {
    let client = StacClient::new(StacCatalog::PlanetaryComputer, StacClientOptions::default())
        .expect("failed to create client");

    let params = course_search("landsat-c2-l2").platforms(&["landsat-8", "landsat-9"]);
    let items = client.search_nonempty(&params).await.expect("search failed");

    for item in &items {
        let platform = item.properties.platform.as_deref().unwrap_or("");
        assert!(platform == "landsat-8" || platform == "landsat-9");
        let blue = item.asset("blue").expect("blue asset");
        assert!(blue.scale_offset().is_some(), "landsat assets declare raster:bands scaling");
    }
}

#[test]
#[ignore]
fn stac_blocking_load_small_window() {
    let client = StacClientBlocking::new(StacCatalog::PlanetaryComputer, StacClientOptions::default())
        .expect("failed to create client");
    let items = client
        .search_nonempty(&course_search("sentinel-2-l2a").limit(2))
        .expect("search failed");

    let options = LoadOptions {
        bands: vec!["B04".into()],
        bbox: geomatica_core::BBox::new(-70.75, -34.18, -70.74, -34.17),
        ..Default::default()
    };
    let stacks = client.load(&items[..1], &options).expect("load failed");
    let red = stacks[0].band("B04").expect("B04 loaded");
    let stats = red.raster.statistics();
    println!("B04 over the window: {}", stats);
    assert!(stats.valid_count > 0);
}

#[tokio::test]
#[ignore]
async fn stac_empty_search_is_an_error() {
    let client = StacClient::new(StacCatalog::PlanetaryComputer, StacClientOptions::default())
        .expect("failed to create client");
    let params = course_search("sentinel-2-l2a").datetime("1990-01-01/1990-01-02");
    let err = client.search_nonempty(&params).await.unwrap_err();
    assert_eq!(err.to_string(), "search returned no items");
}
