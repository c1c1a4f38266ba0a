//! Launches the engine and forwards its console output to the log.
use anyhow::{Context, Result, anyhow, ensure};
use log::{error, info};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use crate::config::SimcConfig;

/// Engine invocation built from one [`SimcConfig`].
pub struct SimcRunner<'a> {
    config: &'a SimcConfig,
}

impl<'a> SimcRunner<'a> {
    #[must_use]
    pub const fn new(config: &'a SimcConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn executable(&self) -> PathBuf {
        self.config.simc_path.join("simc")
    }

    #[must_use]
    pub fn generated_config(&self) -> PathBuf {
        self.config.generated_folder.join("GeneratedConfig.simc")
    }

    /// Contents of the generated config pointing the engine at its profiles.
    #[must_use]
    pub fn generated_config_contents(&self) -> String {
        format!(
            "$(simc_profiles_path)=\"{}\"\n",
            self.config.simc_path.join("profiles").display()
        )
    }

    /// Arguments in engine order: threads, global config, generated config,
    /// then the caller's arguments.
    #[must_use]
    pub fn arguments(&self, args: &[String]) -> Vec<String> {
        let mut all = vec![
            format!("threads={}", self.config.threads),
            self.config
                .config_folder
                .join("SimcGlobalConfig.simc")
                .display()
                .to_string(),
            self.generated_config().display().to_string(),
        ];
        all.extend(args.iter().cloned());
        all
    }

    /// Run the engine to completion.
    ///
    /// Stdout lines are logged at info and stderr lines at error, both under
    /// the `simc` target, while this call blocks on the process.
    ///
    /// # Errors
    ///
    /// Fails when the generated config cannot be written, the engine cannot
    /// be started or it exits unsuccessfully.
    pub fn run(&self, args: &[String]) -> Result<()> {
        let generated = self.generated_config();
        if let Some(parent) = generated.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&generated, self.generated_config_contents())
            .with_context(|| format!("failed to write {}", generated.display()))?;

        let executable = self.executable();
        let mut child = Command::new(&executable)
            .args(self.arguments(args))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {}", executable.display()))?;

        let stdout = child
            .stdout
            .take()
            .context("engine stdout was not captured")?;
        let stderr = child
            .stderr
            .take()
            .context("engine stderr was not captured")?;
        let out_thread = thread::spawn(move || {
            forward_lines(stdout, |line| info!(target: "simc", "{line}"))
        });
        let err_thread = thread::spawn(move || {
            forward_lines(stderr, |line| error!(target: "simc", "{line}"))
        });

        let status = child.wait();
        let out_joined = out_thread.join();
        let err_joined = err_thread.join();
        let status = status.context("failed to wait for the engine")?;
        out_joined.map_err(|_| anyhow!("engine stdout reader panicked"))?;
        err_joined.map_err(|_| anyhow!("engine stderr reader panicked"))?;

        ensure!(status.success(), "{} exited with {status}", executable.display());
        Ok(())
    }
}

/// Feed every line of `reader` to `emit`, without trailing newlines.
/// Bytes that are not UTF-8 are replaced, never fatal, so the stream is
/// drained until EOF. Returns the number of lines seen; stops only on an
/// I/O error.
pub fn forward_lines<R: Read>(reader: R, mut emit: impl FnMut(&str)) -> usize {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = String::from_utf8_lossy(&buf);
        emit(line.trim_end_matches(['\n', '\r']));
        count += 1;
    }
    count
}
