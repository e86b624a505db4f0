use super::LOCALIZA_SEARCH;
use crate::{config::SuiteConfig, playwright_ext::RentalPage, steps};
use anyhow::Result;
use demoaut_common::{site, ReservationField};
use tracing::info;

/// Opens the first Localiza offer and presses "Reservar".
async fn open_reservation<P: RentalPage + ?Sized>(page: &P, config: &SuiteConfig) -> Result<()> {
    steps::open_home(page, config).await?;
    steps::open_first_result(page, LOCALIZA_SEARCH).await?;
    page.click(site::RESERVE_BUTTON).await
}

pub async fn start_reservation<P: RentalPage + ?Sized>(
    page: &P,
    config: &SuiteConfig,
) -> Result<()> {
    open_reservation(page, config).await?;

    let timeout = config.action_timeout();
    steps::expect_url_contains(page, site::RESERVATION_PATH_FRAGMENT, timeout).await?;
    steps::expect_visible(page, site::RESERVATION_FORM, timeout).await?;
    steps::expect_visible(page, ReservationField::PickupLocation.selector(), timeout).await?;
    steps::expect_visible(page, ReservationField::PickupDate.selector(), timeout).await?;

    Ok(())
}

pub async fn validate_required_fields<P: RentalPage + ?Sized>(
    page: &P,
    config: &SuiteConfig,
) -> Result<()> {
    open_reservation(page, config).await?;
    let timeout = config.action_timeout();

    info!("submitting empty reservation form");
    page.click(site::SUBMIT_BUTTON).await?;
    steps::expect_visible(page, site::ERROR_MESSAGE, timeout).await?;
    steps::expect_count(
        page,
        site::ERROR_MESSAGE,
        site::REQUIRED_FIELD,
        ReservationField::ALL.len(),
        timeout,
    )
    .await?;

    info!("filling pickup location");
    page.fill(
        ReservationField::PickupLocation.selector(),
        &config.reservation.pickup_location,
    )
    .await?;
    steps::expect_count(
        page,
        site::ERROR_MESSAGE,
        site::REQUIRED_FIELD,
        ReservationField::ALL.len() - 1,
        timeout,
    )
    .await?;

    Ok(())
}

pub async fn complete_reservation_form<P: RentalPage + ?Sized>(
    page: &P,
    config: &SuiteConfig,
) -> Result<()> {
    open_reservation(page, config).await?;
    let timeout = config.action_timeout();

    let data = &config.reservation;
    info!(?data, "filling reservation form");
    steps::fill_reservation_form(page, data).await?;
    page.click(site::SUBMIT_BUTTON).await?;

    steps::expect_count(page, site::ERROR_MESSAGE, site::REQUIRED_FIELD, 0, timeout).await?;
    steps::expect_visible(page, site::RESERVATION_CONFIRMATION, timeout).await?;

    Ok(())
}
