use std::error::Error;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use notify::{EventKind, RecursiveMode, Watcher};

use crate::commands::{self, Env};

/// Runs check + mesh now and after every change to `level`. Load errors are logged, not fatal.
pub fn run(env: &Env, level: &Path) -> Result<(), Box<dyn Error>> {
    refresh(env, level);

    let name = level.file_name().map(|n| n.to_os_string());
    let dir = match level.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let (tx, rx) = mpsc::channel::<()>();
    // Watch the directory: editors often replace the file instead of writing it.
    let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res {
            let ours = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == name);
            match event.kind {
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any
                    if ours =>
                {
                    let _ = tx.send(());
                }
                _ => {}
            }
        }
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    log::info!("watching {}", level.display());

    while rx.recv().is_ok() {
        // Coalesce the burst of events a single save produces.
        std::thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}
        refresh(env, level);
    }
    Ok(())
}

fn refresh(env: &Env, level: &Path) {
    let result = commands::check(env, level).and_then(|_| commands::mesh(env, level, None));
    if let Err(e) = result {
        log::error!("{}: {}", level.display(), e);
    }
}
