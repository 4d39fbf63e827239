use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::webdriver::BrowserType;

/// Finds a running WebDriver or starts one, and stops what it started
#[derive(Default)]
pub struct WebDriverManager {
    processes: Mutex<Vec<DriverProcess>>,
    // Held for the whole lookup-or-spawn so concurrent callers share one driver
    startup: tokio::sync::Mutex<()>,
}

struct DriverProcess {
    browser_type: BrowserType,
    child: Child,
    port: u16,
    url: String,
}

impl WebDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the URL of a working driver for `browser_type`, starting one
    /// if none is reachable
    pub async fn ensure_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let _startup = self.startup.lock().await;

        let managed: Vec<String> = self
            .lock()
            .iter()
            .filter(|p| p.browser_type == *browser_type)
            .map(|p| p.url.clone())
            .collect();

        for url in managed {
            if Self::verify_driver_working(&url).await {
                debug!("Using managed WebDriver at {}", url);
                return Ok(url);
            }
        }

        let external = format!("http://localhost:{}", browser_type.default_port());
        if Self::verify_driver_working(&external).await {
            debug!("Found external WebDriver at {}", external);
            return Ok(external);
        }

        info!(
            "No {} detected, starting one",
            browser_type.driver_name()
        );
        self.start_driver(browser_type).await
    }

    async fn start_driver(&self, browser_type: &BrowserType) -> Result<String> {
        let command = browser_type.driver_name();
        if !Self::command_exists(command) {
            anyhow::bail!(
                "{} not found in PATH. Install it or pass --webdriver-url:\n\
                  macOS: brew install {}\n\
                  Linux: download from the official releases\n\
                  See: https://www.selenium.dev/documentation/webdriver/getting_started/install_drivers/",
                command,
                command
            );
        }

        let port = Self::find_free_port(browser_type)?;
        let args = match browser_type {
            BrowserType::Firefox => vec!["--port".to_string(), port.to_string()],
            BrowserType::Chrome => vec![format!("--port={}", port)],
        };
        info!("Starting {} on port {}", command, port);

        let child = {
            let mut cmd = Command::new(command);
            cmd.args(&args).stdout(Stdio::null()).stderr(Stdio::null());

            // Own process group so the browser children die with the driver
            #[cfg(unix)]
            {
                use std::os::unix::process::CommandExt;
                cmd.process_group(0);
            }

            cmd.spawn()
                .with_context(|| format!("Failed to start {}", command))?
        };
        let url = format!("http://localhost:{}", port);

        self.lock().push(DriverProcess {
            browser_type: *browser_type,
            child,
            port,
            url: url.clone(),
        });

        // 3 seconds total
        for _ in 0..30 {
            if Self::is_driver_running(&url).await {
                info!("{} ready on port {}", command, port);
                return Ok(url);
            }
            sleep(Duration::from_millis(100)).await;
        }

        self.stop_port(port);
        anyhow::bail!("{} failed to start within timeout", command)
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        #[cfg(unix)]
        let finder = "which";
        #[cfg(windows)]
        let finder = "where";

        Command::new(finder)
            .arg(command)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Prefer the driver's conventional ports, fall back to an OS-assigned one
    pub fn find_free_port(browser_type: &BrowserType) -> Result<u16> {
        let base = browser_type.default_port();
        for port in base..base + 3 {
            if !Self::is_port_in_use(port) {
                return Ok(port);
            }
            debug!("Port {} is in use", port);
        }

        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        Ok(listener.local_addr()?.port())
    }

    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Whether `/status` answers at all
    pub async fn is_driver_running(url: &str) -> bool {
        Self::status(url).await.is_some()
    }

    /// Whether `/status` reports the driver ready for a new session
    async fn verify_driver_working(url: &str) -> bool {
        Self::status(url)
            .await
            .and_then(|body| body.get("value")?.get("ready")?.as_bool())
            .unwrap_or(false)
    }

    async fn status(url: &str) -> Option<serde_json::Value> {
        let response = reqwest::Client::new()
            .get(format!("{}/status", url))
            .timeout(Duration::from_secs(1))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }
        response.json::<serde_json::Value>().await.ok()
    }

    fn stop_port(&self, port: u16) {
        let mut processes = self.lock();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            let mut process = processes.remove(index);
            Self::kill(&mut process);
        }
    }

    /// Stop all managed WebDriver processes
    pub fn stop_all(&self) {
        let mut processes = self.lock();
        for process in processes.iter_mut() {
            debug!("Stopping WebDriver on port {}", process.port);
            Self::kill(process);
        }
        processes.clear();
    }

    fn kill(process: &mut DriverProcess) {
        // process_group(0) makes the pgid equal to the pid
        #[cfg(unix)]
        {
            let pgid = process.child.id();
            let _ = Command::new("kill")
                .args(["-TERM", &format!("-{}", pgid)])
                .output();
        }

        let _ = process.child.kill();
        let _ = process.child.wait();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DriverProcess>> {
        self.processes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for WebDriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

lazy_static::lazy_static! {
    pub static ref GLOBAL_WEBDRIVER_MANAGER: WebDriverManager = WebDriverManager::new();
}

#[cfg(test)]
#[path = "webdriver_manager_test.rs"]
mod webdriver_manager_test;
