use super::LOCALIZA_SEARCH;
use crate::{config::SuiteConfig, playwright_ext::RentalPage, steps};
use anyhow::Result;
use demoaut_common::site;
use tracing::info;

pub async fn search_available_cars<P: RentalPage + ?Sized>(
    page: &P,
    config: &SuiteConfig,
) -> Result<()> {
    steps::open_home(page, config).await?;

    info!(term = LOCALIZA_SEARCH, "filling search form");
    steps::search(page, LOCALIZA_SEARCH).await?;
    page.wait_for_selector(site::SEARCH_RESULTS).await?;

    let results = page.count(site::SEARCH_RESULT_ITEM).await?;
    assert!(results > 0, "no results for {:?}", LOCALIZA_SEARCH);

    info!(results, "checking first result");
    let first = page
        .first_text(site::SEARCH_RESULT_ITEM)
        .await?
        .unwrap_or_default();
    assert!(first.contains("Localiza"), "first result: {:?}", first);
    assert!(first.contains("Aluguel"), "first result: {:?}", first);

    Ok(())
}
