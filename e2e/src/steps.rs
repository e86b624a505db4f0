//! Reusable steps and retrying assertions on top of [`RentalPage`].

use crate::{config::SuiteConfig, playwright_ext::RentalPage};
use anyhow::Result;
use demoaut_common::{site, PriceParsing, ReservationFormData};
use std::{
    error::Error,
    fmt::{Debug, Display, Formatter},
    time::Duration,
};
use tokio::time::{sleep, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Opens the home page of the site, waiting for the network to settle.
pub async fn open_home<P: RentalPage + ?Sized>(page: &P, config: &SuiteConfig) -> Result<()> {
    let url = config.url(site::HOME_PATH)?;
    debug!(%url, "opening home page");
    page.goto(url.as_str()).await
}

pub async fn search<P: RentalPage + ?Sized>(page: &P, term: &str) -> Result<()> {
    page.fill(site::SEARCH_INPUT, term).await?;
    page.click(site::SEARCH_BUTTON).await
}

/// Searches for `term` and opens the first result.
pub async fn open_first_result<P: RentalPage + ?Sized>(page: &P, term: &str) -> Result<()> {
    search(page, term).await?;
    page.click(site::FIRST_SEARCH_RESULT).await
}

/// Fills the reservation form in form order.
pub async fn fill_reservation_form<P: RentalPage + ?Sized>(
    page: &P,
    data: &ReservationFormData,
) -> Result<()> {
    for (field, value) in data.fields() {
        if field.is_select() {
            page.select_option(field.selector(), value).await?;
        } else {
            page.fill(field.selector(), value).await?;
        }
    }
    Ok(())
}

pub async fn read_prices<P: RentalPage + ?Sized>(
    page: &P,
    selector: &str,
    parsing: PriceParsing,
) -> Result<Vec<f64>> {
    let raw = page.text_contents(selector).await?;
    debug!(?raw, "read prices");
    Ok(parsing.parse_all(&raw)?)
}

/// Waits until exactly `expected` visible elements match `selector` and `text`.
pub async fn expect_count<P: RentalPage + ?Sized>(
    page: &P,
    selector: &str,
    text: &str,
    expected: usize,
    timeout: Duration,
) -> Result<()> {
    let what = format!("{} containing {:?}", selector, text);
    poll(timeout, &what, expected, move || page.count_visible_with_text(selector, text)).await
}

pub async fn expect_visible<P: RentalPage + ?Sized>(
    page: &P,
    selector: &str,
    timeout: Duration,
) -> Result<()> {
    poll(timeout, selector, true, move || page.is_visible(selector)).await
}

/// Waits until the current URL contains `fragment`.
pub async fn expect_url_contains<P: RentalPage + ?Sized>(
    page: &P,
    fragment: &str,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = page.current_url().await?;
        if url.contains(fragment) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AssertionTimeout {
                what: "page URL".to_string(),
                expected: format!("containing {:?}", fragment),
                observed: url,
                timeout,
            }
            .into());
        }
        sleep(POLL_INTERVAL).await;
    }
}

async fn poll<T, F, Fut>(timeout: Duration, what: &str, expected: T, mut observe: F) -> Result<()>
where
    T: PartialEq + Debug,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        let observed = observe().await?;
        if observed == expected {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AssertionTimeout {
                what: what.to_string(),
                expected: format!("{:?}", expected),
                observed: format!("{:?}", observed),
                timeout,
            }
            .into());
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[derive(Debug)]
pub struct AssertionTimeout {
    pub what: String,
    pub expected: String,
    pub observed: String,
    pub timeout: Duration,
}

impl Display for AssertionTimeout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, still {} after {:?}",
            self.what, self.expected, self.observed, self.timeout
        )
    }
}

impl Error for AssertionTimeout {}
