use crate::error::{ExecError, Result};
use crate::traits::ProbeExecutor;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Output from a command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Runs probe tools as direct child processes
///
/// Each child gets its own process group. On timeout the group receives
/// SIGTERM, then SIGKILL once `grace_period` has passed, and the child is
/// reaped before `run` returns. A dropped `run` future still kills the child.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    grace_period: Duration,
}

impl ProcessExecutor {
    pub fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    #[cfg(unix)]
    async fn terminate(&self, child: &mut Child, pid: Option<u32>) {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        let Some(pid) = pid else {
            self.force_kill(child).await;
            return;
        };
        let group = Pid::from_raw(pid as i32);

        // The leader already exited; only descendants still hold the pipes
        // and they keep the group id reserved.
        if matches!(child.try_wait(), Ok(Some(_))) {
            if let Err(e) = killpg(group, Signal::SIGKILL) {
                debug!("SIGKILL to process group {} failed: {}", pid, e);
            }
            self.force_kill(child).await;
            return;
        }

        if let Err(e) = killpg(group, Signal::SIGTERM) {
            debug!("SIGTERM to process group {} failed: {}", pid, e);
        }

        match tokio::time::timeout(self.grace_period, child.wait()).await {
            // Once the leader is reaped the group id may be reused, so the
            // group is not signalled again.
            Ok(_) => debug!("Process {} exited after SIGTERM", pid),
            Err(_) => {
                warn!(
                    "Process {} still running {:?} after SIGTERM, sending SIGKILL",
                    pid, self.grace_period
                );
                if let Err(e) = killpg(group, Signal::SIGKILL) {
                    debug!("SIGKILL to process group {} failed: {}", pid, e);
                }
            }
        }

        self.force_kill(child).await;
    }

    #[cfg(not(unix))]
    async fn terminate(&self, child: &mut Child, _pid: Option<u32>) {
        self.force_kill(child).await;
    }

    /// Kill the child if it is still alive and reap it
    async fn force_kill(&self, child: &mut Child) {
        match child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                if let Err(e) = child.start_kill() {
                    debug!("Kill of probe process failed: {}", e);
                }
            }
        }

        if let Err(e) = child.wait().await {
            warn!("Failed to reap probe process: {}", e);
        }
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl ProbeExecutor for ProcessExecutor {
    async fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ExecError::other("refusing to run an empty argument vector"))?;

        debug!("Executing: {} {:?}", program, args);

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExecError::not_found(program.as_str())
            } else {
                ExecError::other(format!("failed to start '{}': {}", program, e))
            }
        })?;
        let pid = child.id();

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::other("child stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecError::other("child stderr was not captured"))?;

        let collected = tokio::time::timeout(timeout, async {
            let mut out = Vec::new();
            let mut err = Vec::new();
            let (out_read, err_read, status) = tokio::join!(
                stdout.read_to_end(&mut out),
                stderr.read_to_end(&mut err),
                child.wait(),
            );
            out_read?;
            err_read?;
            Ok::<_, std::io::Error>((out, err, status?))
        })
        .await;

        match collected {
            Ok(Ok((out, err, status))) => {
                let exit_code = status.code().unwrap_or(-1);
                debug!("Command exited with code {}: {}", exit_code, program);

                Ok(CommandOutput {
                    stdout: String::from_utf8_lossy(&out).to_string(),
                    stderr: String::from_utf8_lossy(&err).to_string(),
                    exit_code,
                })
            }
            Ok(Err(e)) => {
                self.terminate(&mut child, pid).await;
                Err(ExecError::other(format!(
                    "failed to collect output of '{}': {}",
                    program, e
                )))
            }
            Err(_) => {
                warn!(
                    "Command '{}' exceeded {:?}, terminating process group",
                    program, timeout
                );
                self.terminate(&mut child, pid).await;
                Err(ExecError::timeout(program.as_str(), timeout))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use std::time::Instant;
    use tempfile::tempdir;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn read_pid(path: &std::path::Path) -> Pid {
        let text = std::fs::read_to_string(path).unwrap();
        Pid::from_raw(text.trim().parse().unwrap())
    }

    #[tokio::test]
    async fn test_captures_stdout_stderr_and_exit_code() {
        let executor = ProcessExecutor::default();
        let output = executor
            .run(
                &argv(&["sh", "-c", "echo out; echo err >&2; exit 3"]),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.exit_code, 3);
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let executor = ProcessExecutor::default();
        let output = executor
            .run(
                &argv(&["echo", "a; echo injected", "$(id)"]),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(output.stdout, "a; echo injected $(id)\n");
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let executor = ProcessExecutor::default();
        let result = executor
            .run(
                &argv(&["netprobe-definitely-missing-tool", "-v"]),
                Duration::from_secs(5),
            )
            .await;

        assert_eq!(
            result,
            Err(ExecError::not_found("netprobe-definitely-missing-tool"))
        );
    }

    #[tokio::test]
    async fn test_empty_argv_rejected() {
        let executor = ProcessExecutor::default();
        let result = executor.run(&[], Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ExecError::Other { .. })));
    }

    #[tokio::test]
    async fn test_timeout_kills_and_reaps_child() {
        let dir = tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());

        let executor = ProcessExecutor::new(Duration::from_millis(200));
        let start = Instant::now();
        let result = executor
            .run(&argv(&["sh", "-c", &script]), Duration::from_millis(500))
            .await;

        assert_eq!(
            result,
            Err(ExecError::timeout("sh", Duration::from_millis(500)))
        );
        assert!(start.elapsed() < Duration::from_secs(5));

        // The child was reaped, so its pid no longer exists
        let pid = read_pid(&pid_file);
        assert_eq!(kill(pid, None::<Signal>), Err(Errno::ESRCH));
    }

    #[tokio::test]
    async fn test_timeout_escalates_when_sigterm_ignored() {
        let dir = tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let script = format!(
            "trap '' TERM; echo $$ > {}; while :; do sleep 1; done",
            pid_file.display()
        );

        let executor = ProcessExecutor::new(Duration::from_millis(200));
        let start = Instant::now();
        let result = executor
            .run(&argv(&["sh", "-c", &script]), Duration::from_millis(500))
            .await;

        assert!(matches!(result, Err(ExecError::Timeout { .. })));
        assert!(start.elapsed() < Duration::from_secs(5));

        let pid = read_pid(&pid_file);
        assert_eq!(kill(pid, None::<Signal>), Err(Errno::ESRCH));
    }

    /// Gone, or a zombie waiting for whoever inherited it
    #[cfg(target_os = "linux")]
    fn is_dead(pid: Pid) -> bool {
        match kill(pid, None::<Signal>) {
            Err(Errno::ESRCH) => true,
            _ => std::fs::read_to_string(format!("/proc/{}/stat", pid))
                .ok()
                .and_then(|stat| stat.rsplit_once(") ").map(|(_, rest)| rest.starts_with('Z')))
                .unwrap_or(true),
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_descendants_of_exited_leader() {
        let dir = tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let inner = format!("echo $$ > {}; exec sleep 30", pid_file.display());
        let script = format!("sh -c '{}' & sleep 0.2; exit 0", inner);

        let executor = ProcessExecutor::new(Duration::from_secs(5));
        let start = Instant::now();
        let result = executor
            .run(&argv(&["sh", "-c", &script]), Duration::from_millis(500))
            .await;

        assert!(matches!(result, Err(ExecError::Timeout { .. })));
        // The grace period is not spent waiting on a leader that is gone
        assert!(start.elapsed() < Duration::from_secs(3));

        let pid = read_pid(&pid_file);
        let deadline = Instant::now() + Duration::from_secs(2);
        while !is_dead(pid) {
            assert!(Instant::now() < deadline, "descendant {pid} survived");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn test_fast_command_not_affected_by_timeout() {
        let executor = ProcessExecutor::default();
        let output = executor
            .run(&argv(&["true"]), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(output.exit_code, 0);
        assert!(output.stdout.is_empty());
    }
}
