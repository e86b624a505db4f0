use super::GENERIC_SEARCH;
use crate::{config::SuiteConfig, playwright_ext::RentalPage, steps};
use anyhow::Result;
use demoaut_common::{is_ascending, price::first_descent, site};
use tracing::info;

pub async fn filter_by_lowest_price<P: RentalPage + ?Sized>(
    page: &P,
    config: &SuiteConfig,
) -> Result<()> {
    steps::open_home(page, config).await?;
    steps::search(page, GENERIC_SEARCH).await?;

    info!("ordering by lowest price");
    page.click(site::FILTERS).await?;
    page.click(site::PRICE_FILTER).await?;
    page.click(site::LOWEST_PRICE).await?;
    page.wait_for_selector(site::LOWEST_PRICE_RESULTS).await?;

    let prices = steps::read_prices(page, site::PRICE_VALUE, config.price_parsing).await?;
    info!(?prices, "checking price order");
    assert!(
        is_ascending(&prices),
        "prices out of order at position {:?}: {:?}",
        first_descent(&prices),
        prices
    );

    Ok(())
}
