use crate::config::SuiteConfig;
use anyhow::{anyhow, bail, Context as _, Result};
use std::{
    path::Path,
    process::{Child, Command, Stdio},
    time::Duration,
};
use tokio::{
    net::TcpStream,
    time::{sleep, Instant},
};
use tracing::{info, warn};

/// The `demoaut-web` fixture running as a child process. Killed on drop.
pub struct FixtureSite {
    child: Child,
}

impl FixtureSite {
    pub async fn spawn(config: &SuiteConfig) -> Result<Self> {
        let host = config
            .base_url
            .host_str()
            .ok_or_else(|| anyhow!("base_url {} has no host", config.base_url))?
            .to_string();
        let port = config
            .base_url
            .port_or_known_default()
            .ok_or_else(|| anyhow!("base_url {} has no port", config.base_url))?;

        info!(%host, port, "starting fixture site");
        let child = Command::new("cargo")
            .args(["run", "--quiet", "-p", "demoaut-web"])
            .current_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join(".."))
            .env("ROCKET_ADDRESS", &host)
            .env("ROCKET_PORT", port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("spawning demoaut-web")?;

        let mut site = FixtureSite { child };
        site.wait_until_listening(&host, port, config.fixture_startup_timeout())
            .await?;
        Ok(site)
    }

    async fn wait_until_listening(
        &mut self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if TcpStream::connect((host, port)).await.is_ok() {
                info!("fixture site is up");
                return Ok(());
            }
            if let Some(status) = self.child.try_wait()? {
                bail!("demoaut-web exited before listening: {}", status);
            }
            if Instant::now() >= deadline {
                bail!("demoaut-web not listening on {}:{} after {:?}", host, port, timeout);
            }
            sleep(Duration::from_millis(250)).await;
        }
    }
}

impl Drop for FixtureSite {
    fn drop(&mut self) {
        if let Err(err) = self.child.kill() {
            warn!(%err, "failed to stop fixture site");
        }
        let _ = self.child.wait();
    }
}
