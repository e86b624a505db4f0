use super::GENERIC_SEARCH;
use crate::{config::SuiteConfig, playwright_ext::RentalPage, steps};
use anyhow::Result;
use demoaut_common::site;

pub async fn show_vehicle_details<P: RentalPage + ?Sized>(
    page: &P,
    config: &SuiteConfig,
) -> Result<()> {
    steps::open_home(page, config).await?;
    steps::open_first_result(page, GENERIC_SEARCH).await?;

    for selector in [
        site::VEHICLE_DETAILS,
        site::VEHICLE_SPECS,
        site::RENTAL_PRICE,
        site::AVAILABILITY,
    ] {
        steps::expect_visible(page, selector, config.action_timeout()).await?;
    }

    Ok(())
}
