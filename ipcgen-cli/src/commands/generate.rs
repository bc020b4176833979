use super::{fail, ConfigArgs};
use console::style;
use ipcgen::{Artifact, Generator};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Scan, generate and write; returns whether the file changed
fn generate_to_file(
    generator: &Generator,
    src: &Path,
    output: &Path,
) -> ipcgen::Result<(Artifact, bool)> {
    let artifact = generator.generate_crate(src)?;
    let written = artifact.write_to(output)?;
    Ok((artifact, written))
}

fn report(artifact: &Artifact, written: bool, output: &Path) {
    if artifact.table.is_empty() {
        println!("{}", style("No services found.").yellow());
    } else {
        println!(
            "{} Found {} service(s), {} excluded",
            style("->").green(),
            artifact.table.len(),
            artifact.excluded.len()
        );
    }

    if written {
        println!("{} Generated {}", style("✓").green(), output.display());
    } else {
        println!("{} {} is up to date", style("✓").green(), output.display());
    }
}

/// Main entry point for the generate command
pub fn run(src: String, output: Option<String>, check: bool, watch: bool, config: ConfigArgs) {
    let src_path = PathBuf::from(src);
    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| src_path.join("ipc_dispatch.rs"));
    let generator = Generator::new(config.into_config());

    println!(
        "{}",
        style(format!("Scanning {} for services...", src_path.display())).cyan()
    );

    if check {
        match generator.generate_crate(&src_path) {
            Ok(artifact) if artifact.is_current(&output_path) => {
                println!("{} {} is up to date", style("✓").green(), output_path.display());
            }
            Ok(_) => fail(format!(
                "{} is out of date, run `ipcgen generate`",
                output_path.display()
            )),
            Err(e) => fail(e),
        }
        return;
    }

    match generate_to_file(&generator, &src_path, &output_path) {
        Ok((artifact, written)) => report(&artifact, written, &output_path),
        Err(e) => fail(e),
    }

    if watch {
        println!("{}", style("Watching for changes...").dim());
        if let Err(e) = start_watcher(&generator, &src_path, &output_path) {
            fail(format!("Failed to start watcher: {}", e));
        }
    }
}

/// Regenerate on every Rust file change until Ctrl+C
fn start_watcher(generator: &Generator, src_path: &Path, output_path: &Path) -> Result<(), String> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| format!("Failed to set Ctrl-C handler: {}", e))?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| format!("Failed to create watcher: {}", e))?;

    watcher
        .watch(src_path, RecursiveMode::Recursive)
        .map_err(|e| format!("Failed to watch directory: {}", e))?;

    println!(
        "{} Watching {} for changes",
        style("->").cyan(),
        src_path.display()
    );

    // The output may live inside the watched tree
    let own_output = fs::canonicalize(output_path).ok();
    let mut last_regen = Instant::now();
    let debounce_duration = Duration::from_millis(500);

    loop {
        if shutdown.load(Ordering::SeqCst) {
            println!();
            println!("{}", style("Stopped watching.").yellow());
            return Ok(());
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let is_rust_change = event.paths.iter().any(|p| {
                    p.extension().map(|e| e == "rs").unwrap_or(false)
                        && own_output.as_deref() != Some(p.as_path())
                });

                if is_rust_change && last_regen.elapsed() > debounce_duration {
                    last_regen = Instant::now();
                    println!("{}", style("Detected changes, regenerating...").dim());
                    match generate_to_file(generator, src_path, output_path) {
                        Ok((artifact, written)) => report(&artifact, written, output_path),
                        Err(e) => {
                            eprintln!("{} Failed to regenerate: {}", style("Error:").red(), e);
                        }
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err("Watch channel closed".to_string());
            }
        }
    }
}
