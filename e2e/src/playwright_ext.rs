use anyhow::Result;
use async_trait::async_trait;
use playwright::api::{DocumentLoadState, Page};

/// The browser operations the scenarios are written against.
///
/// Each call completes, including any navigation it triggers, before it
/// returns, so scenarios are plain sequences of awaited steps.
#[async_trait]
pub trait RentalPage: Send + Sync {
    /// Navigates and waits until the network is idle.
    async fn goto(&self, url: &str) -> Result<()>;

    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    async fn wait_for_selector(&self, selector: &str) -> Result<()>;

    /// Text content of every element matching `selector`, in document order.
    async fn text_contents(&self, selector: &str) -> Result<Vec<String>>;

    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Visible elements matching `selector` whose text contains `text`.
    async fn count_visible_with_text(&self, selector: &str, text: &str) -> Result<usize>;

    async fn current_url(&self) -> Result<String>;

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.text_contents(selector).await?.len())
    }

    async fn first_text(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.text_contents(selector).await?.into_iter().next())
    }
}

#[async_trait]
impl RentalPage for Page {
    async fn goto(&self, url: &str) -> Result<()> {
        self.goto_builder(url)
            .wait_until(DocumentLoadState::NetworkIdle)
            .goto()
            .await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.fill_builder(selector, value).fill().await?;
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.select_option_builder(selector)
            .add_value(value.to_owned())
            .select_option()
            .await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.click_builder(selector).click().await?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        self.wait_for_selector_builder(selector)
            .wait_for_selector()
            .await?;
        Ok(())
    }

    async fn text_contents(&self, selector: &str) -> Result<Vec<String>> {
        let handles = self.query_selector_all(selector).await?;
        let mut texts = Vec::with_capacity(handles.len());
        for handle in handles {
            texts.push(handle.text_content().await?.unwrap_or_default());
        }
        Ok(texts)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(Page::is_visible(self, selector, None).await?)
    }

    async fn count_visible_with_text(&self, selector: &str, text: &str) -> Result<usize> {
        let mut count = 0;
        for handle in self.query_selector_all(selector).await? {
            if handle.is_visible().await? && handle.inner_text().await?.contains(text) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.eval::<String>("() => window.location.href").await?)
    }
}
