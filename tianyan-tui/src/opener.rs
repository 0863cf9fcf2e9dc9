use anyhow::{Context as _, Result};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;

/// Opens a result link outside the terminal.
pub trait LinkOpener: Send + Sync {
    fn open(&self, href: &str) -> Result<()>;
}

/// Hands the link to the platform's default opener.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(href: &str) -> Command {
        Self::command_for(std::env::consts::OS, href)
    }

    // No shell on any platform: the href is a single argv entry.
    fn command_for(os: &str, href: &str) -> Command {
        let mut cmd = match os {
            "macos" => Command::new("open"),
            "windows" => {
                let mut cmd = Command::new("rundll32");
                cmd.arg("url.dll,FileProtocolHandler");
                cmd
            }
            _ => Command::new("xdg-open"),
        };
        cmd.arg(href);
        cmd
    }
}

impl LinkOpener for SystemOpener {
    fn open(&self, href: &str) -> Result<()> {
        let mut cmd = Self::command(href);
        // Keep the child off the alternate screen.
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let program = cmd.get_program().to_string_lossy().into_owned();
        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        tracing::info!(target: "tianyan.tui", program = %program, href, "link.opened");

        reap(child).context("failed to start opener reaper")?;
        Ok(())
    }
}

/// Wait on the opener in the background so it does not linger as a zombie.
fn reap(mut child: Child) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("link-opener-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::warn!(target: "tianyan.tui", %status, "link.opener_failed");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(target: "tianyan.tui", error = %e, "link.opener_wait_failed"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_is_the_last_argument() {
        let cmd = SystemOpener::command("https://tokio.rs/");
        let last = cmd.get_args().last().map(|a| a.to_string_lossy().into_owned());
        assert_eq!(last.as_deref(), Some("https://tokio.rs/"));
    }

    fn argv(cmd: &Command) -> Vec<String> {
        std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn windows_opener_passes_ampersands_without_a_shell() {
        let href = "http://x/?a=1&b=2&calc";
        let cmd = SystemOpener::command_for("windows", href);
        assert_eq!(argv(&cmd), ["rundll32", "url.dll,FileProtocolHandler", href]);
    }

    #[test]
    fn unix_openers_take_the_href_verbatim() {
        let href = "http://x/?a=1&b=2";
        assert_eq!(argv(&SystemOpener::command_for("macos", href)), ["open", href]);
        assert_eq!(argv(&SystemOpener::command_for("linux", href)), ["xdg-open", href]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn finished_opener_is_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        reap(child).unwrap().join().unwrap();
        // A reaped pid has no /proc entry left behind.
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
    }
}
