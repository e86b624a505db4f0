pub mod config;
pub mod fixture;
pub mod playwright_ext;
pub mod scenarios;
pub mod steps;

use anyhow::Result;
use async_trait::async_trait;
use config::{BrowserType, SuiteConfig};
use fixture::FixtureSite;
use futures::{stream, FutureExt, StreamExt};
use playwright::{
    api::{browser_type::RecordVideo, Browser, Page, Viewport},
    Playwright,
};
use std::{
    any::{type_name, Any},
    collections::HashMap,
    error::Error,
    fmt::{Debug, Display, Formatter},
    future::Future,
    panic::AssertUnwindSafe,
    path::Path,
    sync::Arc,
    time::Duration,
};
use tokio::runtime::Runtime;
use tracing::{error, info, warn, Instrument};
use tracing_subscriber::EnvFilter;

/// Runs every test in every configured browser and exits the process with
/// the suite's status.
pub fn e2e_test_runner(tests: &[&dyn Testable]) {
    init_tracing();

    let exit_code = match run(tests) {
        Ok(test_results) => {
            println!("\nSummary:");

            for test_result in &test_results {
                println!("{}", test_result);
            }

            let successes = test_results
                .iter()
                .filter(|test_result| test_result.result.is_ok())
                .count();
            if successes == test_results.len() {
                println!("{} tests ran with success", successes);
                0
            } else {
                println!("{} errors", test_results.len() - successes);
                1
            }
        }
        Err(error) => {
            println!("{:#?}", error);
            1
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn run(tests: &[&dyn Testable]) -> Result<Vec<TestResult>> {
    let config = Arc::new(SuiteConfig::load()?);
    info!(base_url = %config.base_url, browsers = ?config.browsers, "loaded suite config");

    let runtime = Runtime::new()?;
    runtime.block_on(async {
        // Dropped at the end of the run, which stops the site.
        let _fixture = if config.fixture.enabled {
            Some(FixtureSite::spawn(&config).await?)
        } else {
            None
        };
        run_tests(tests, config.clone()).await
    })
}

async fn run_tests(tests: &[&dyn Testable], config: Arc<SuiteConfig>) -> Result<Vec<TestResult>> {
    let playwright = Playwright::initialize().await?;
    playwright.prepare()?; // Install browsers

    let mut browser_map = HashMap::new();
    let mut initialization_errors: Option<ErrorList<FailedToInitialize>> = None;
    for &browser_type in &config.browsers {
        let launcher = match browser_type {
            BrowserType::Chromium => playwright.chromium(),
            BrowserType::Firefox => playwright.firefox(),
            BrowserType::Webkit => playwright.webkit(),
        };
        match launcher.launcher().headless(config.headless).launch().await {
            Ok(browser) => {
                info!(browser = %browser_type, "launched");
                browser_map.insert(browser_type, browser);
            }
            Err(err) => match &mut initialization_errors {
                Some(errs) => errs.push(FailedToInitialize(browser_type), err),
                None => {
                    initialization_errors =
                        Some(ErrorList::new(FailedToInitialize(browser_type), err))
                }
            },
        }
    }

    if let Some(errors) = initialization_errors {
        return Err(errors.into());
    }

    let units: Vec<(&dyn Testable, BrowserType, &Browser)> = tests
        .iter()
        .flat_map(|&test| {
            config
                .browsers
                .iter()
                .filter_map(|browser_type| browser_map.get_key_value(browser_type))
                .map(move |(&browser_type, browser)| (test, browser_type, browser))
        })
        .collect();

    let (results, error_list) = stream::iter(units)
        .map(|(test, browser_type, browser)| {
            let span = tracing::info_span!("scenario", test = test.name(), browser = %browser_type);
            run_with_retries(test, browser_type, browser, &config).instrument(span)
        })
        .buffer_unordered(config.workers)
        .fold(
            (Vec::new(), None),
            |(mut test_results, errors), result| async {
                match (result, errors) {
                    (Ok(test_result), errors) => {
                        println!("{}", test_result);
                        test_results.push(test_result);
                        (test_results, errors)
                    }
                    (Err((context, err)), None) => {
                        (test_results, Some(ErrorList::new(context, err)))
                    }
                    (Err((context, err)), Some(mut error_list)) => {
                        error_list.push(context, err);
                        (test_results, Some(error_list))
                    }
                }
            },
        )
        .await;

    if let Some(error_list) = error_list {
        return Err(error_list.into());
    }

    Ok(results)
}

async fn run_with_retries(
    test: &dyn Testable,
    browser_type: BrowserType,
    browser: &Browser,
    config: &Arc<SuiteConfig>,
) -> Result<TestResult, (FailedToOpenPage, anyhow::Error)> {
    let test_name = test.name();
    let mut attempt = 0;
    loop {
        let result = run_attempt(test, browser_type, browser, config, attempt).await?;
        if result.is_ok() || attempt >= config.retries {
            return Ok(TestResult {
                test_name,
                browser_type,
                attempts: attempt + 1,
                result,
            });
        }
        if let Err(err) = &result {
            warn!(attempt, error = %err, "failed, retrying");
        }
        attempt += 1;
    }
}

/// One attempt in a fresh browser context, with artifacts captured per the
/// configured policies.
async fn run_attempt(
    test: &dyn Testable,
    browser_type: BrowserType,
    browser: &Browser,
    config: &Arc<SuiteConfig>,
    attempt: u32,
) -> Result<Result<()>, (FailedToOpenPage, anyhow::Error)> {
    let test_name = test.name();
    let failed_to_open = |err: anyhow::Error| {
        (
            FailedToOpenPage {
                browser_type,
                test_name,
            },
            err,
        )
    };
    let artifacts = config.artifact_dir(test_name, browser_type, attempt);

    let mut context_builder = browser.context_builder().viewport(Some(Viewport {
        width: config.viewport.width,
        height: config.viewport.height,
    }));
    if config.video.records() {
        context_builder = context_builder.record_video(RecordVideo {
            dir: &artifacts,
            size: None,
        });
    }
    let context = context_builder
        .build()
        .await
        .map_err(|err| failed_to_open(err.into()))?;
    let page = context
        .new_page()
        .await
        .map_err(|err| failed_to_open(err.into()))?;
    page.set_default_timeout(config.action_timeout_ms)
        .await
        .map_err(|err| failed_to_open(err.into()))?;

    let result = match tokio::time::timeout(
        config.test_timeout(),
        test.run(Context {
            page: page.clone(),
            config: config.clone(),
        }),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(TestTimedOut(config.test_timeout()).into()),
    };
    let passed = result.is_ok();

    if config.screenshot.captures(passed) {
        capture_screenshot(&page, &artifacts).await;
    }
    if let Err(err) = context.close().await {
        warn!(%err, "failed to close browser context");
    }
    if config.video.records() && config.video.discards(passed) {
        discard_videos(&artifacts);
    }

    Ok(result)
}

async fn capture_screenshot(page: &Page, artifacts: &Path) {
    let path = artifacts.join("screenshot.png");
    if let Err(err) = std::fs::create_dir_all(artifacts) {
        warn!(%err, dir = %artifacts.display(), "cannot create artifacts directory");
        return;
    }
    match page.screenshot_builder().path(path.clone()).screenshot().await {
        Ok(_) => info!(path = %path.display(), "saved screenshot"),
        Err(err) => warn!(%err, "failed to capture screenshot"),
    }
}

fn discard_videos(artifacts: &Path) {
    let entries = match std::fs::read_dir(artifacts) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(%err, dir = %artifacts.display(), "cannot list recorded videos");
            return;
        }
    };
    for path in entries.filter_map(|entry| entry.ok().map(|entry| entry.path())) {
        if path.extension().map_or(false, |ext| ext == "webm") {
            if let Err(err) = std::fs::remove_file(&path) {
                error!(%err, path = %path.display(), "failed to remove video");
            }
        }
    }
}

struct TestResult {
    test_name: &'static str,
    browser_type: BrowserType,
    attempts: u32,
    result: anyhow::Result<()>,
}

impl Display for TestResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let retried = if self.attempts > 1 {
            format!(" ({} attempts)", self.attempts)
        } else {
            String::new()
        };
        match &self.result {
            Ok(()) => write!(
                f,
                "{} in {}{}...\t[OK]",
                self.test_name, self.browser_type, retried
            ),
            Err(err) => write!(
                f,
                "{} in {}{}...\t[FAILED]\n{:#?}",
                self.test_name, self.browser_type, retried, err
            ),
        }
    }
}

/// What a test receives: a fresh page and the suite configuration.
pub struct Context {
    pub page: Page,
    pub config: Arc<SuiteConfig>,
}

#[async_trait]
pub trait Testable {
    fn name(&self) -> &'static str;
    async fn run(&self, ctx: Context) -> Result<()>;
}

#[async_trait]
impl<F, FF> Testable for F
where
    F: Fn(Context) -> FF + Sync,
    FF: Send,
    AssertUnwindSafe<FF>: Future<Output = Result<()>>,
{
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    async fn run(&self, ctx: Context) -> Result<()> {
        let result = AssertUnwindSafe(self(ctx)).catch_unwind().await;
        match result {
            Ok(future) => future,
            Err(err) => Err(CaughtPanic::new(err).into()),
        }
    }
}

struct ErrorList<C> {
    vec: Vec<(C, anyhow::Error)>,
}

impl<C> ErrorList<C> {
    fn new<E: Into<anyhow::Error>>(context: C, error: E) -> Self {
        ErrorList {
            vec: vec![(context, error.into())],
        }
    }

    fn push<E: Into<anyhow::Error>>(&mut self, context: C, error: E) {
        self.vec.push((context, error.into()));
    }
}

impl<C: Display> Debug for ErrorList<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ErrorList:")?;
        for (context, error) in &self.vec {
            writeln!(f, "\t- {}: {:#?}", context, error)?;
        }
        Ok(())
    }
}

impl<C: Display> Display for ErrorList<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ErrorList:")?;
        for (context, error) in &self.vec {
            writeln!(f, "\t- {}: {}", context, error)?;
        }
        Ok(())
    }
}

impl<C: Display> Error for ErrorList<C> {}

struct FailedToInitialize(BrowserType);

impl Display for FailedToInitialize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to initialize {}", self.0)
    }
}

struct FailedToOpenPage {
    test_name: &'static str,
    browser_type: BrowserType,
}

impl Display for FailedToOpenPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to open page in {} of {}",
            self.browser_type, self.test_name
        )
    }
}

#[derive(Debug)]
struct TestTimedOut(Duration);

impl Display for TestTimedOut {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Test timed out after {:?}", self.0)
    }
}

impl Error for TestTimedOut {}

struct CaughtPanic(Option<Box<str>>);

impl CaughtPanic {
    fn new(err: Box<dyn Any + Send + 'static>) -> Self {
        match err.downcast::<String>() {
            Ok(str) => CaughtPanic(Some(str.into_boxed_str())),
            Err(err) => match err.downcast::<&str>() {
                Ok(str) => CaughtPanic(Some(str.to_string().into_boxed_str())),
                Err(_) => CaughtPanic(None),
            },
        }
    }
}

impl Debug for CaughtPanic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for CaughtPanic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(str_err) => write!(f, "{}", str_err),
            None => write!(f, "Unknown error"),
        }
    }
}

impl Error for CaughtPanic {}
