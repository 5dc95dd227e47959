mod scanner;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use iconflow::{
    CanvasContainer, EngineConfig, IconSource, ItemKey, Key, Modifiers, ScrollSurface, SimpleViewport,
};
use scanner::{DirectorySource, ScanConfig};

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

fn default_home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {}: {:?}", name, value)),
        Err(_) => Ok(None),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("iconflow=info".parse()?),
        )
        .init();

    let dir = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => default_home_dir().context("No directory given and no home directory found")?,
    };
    let width = env_number::<f64>("ICONFLOW_WIDTH")?.unwrap_or(DEFAULT_WIDTH);
    let zoom = env_number::<i32>("ICONFLOW_ZOOM")?.unwrap_or(1);

    let source = DirectorySource::scan(&dir, &ScanConfig::default())?;
    let keys = source.keys();
    info!(dir = ?dir, items = keys.len(), width, zoom, "Laying out directory");

    let viewport = SimpleViewport::with_size(width, DEFAULT_HEIGHT);
    let mut canvas = CanvasContainer::new(source, viewport, EngineConfig::default())
        .context("Failed to create canvas")?;

    canvas.signals().activate.connect(|items: &Vec<ItemKey>| {
        info!(count = items.len(), "Activate");
    });
    canvas.signals().selection_changed.connect(|_| {
        tracing::debug!("Selection changed");
    });

    canvas.size_allocate();
    canvas.set_zoom_level(zoom);
    for key in keys {
        canvas.add(key);
    }
    canvas.run_idle();

    print_rows(&canvas);

    // Walk the grid the way a user would
    let steps = [
        (Key::Home, Modifiers::NONE),
        (Key::Right, Modifiers::NONE),
        (Key::Down, Modifiers::NONE),
        (Key::Right, Modifiers::SHIFT),
        (Key::End, Modifiers::NONE),
        (Key::Space, Modifiers::NONE),
    ];
    for (key, modifiers) in steps {
        canvas.handle_key(key, modifiers);
        canvas.advance(Duration::from_millis(10));
        let selection = canvas.selection();
        let labels: Vec<String> = selection
            .iter()
            .filter_map(|k| canvas.source().label(k))
            .collect();
        println!(
            "{:?}{} -> focus {:?}, selected {:?}, scrolled to {:.0}",
            key,
            if modifiers.shift { " (shift)" } else { "" },
            canvas.focus().and_then(|k| canvas.source().label(k)),
            labels,
            canvas.surface().scroll_offset().y,
        );
    }

    Ok(())
}

fn print_rows(canvas: &CanvasContainer<DirectorySource>) {
    let mut rows: Vec<(f64, Vec<String>)> = Vec::new();
    canvas.for_each(|icon| {
        let y = icon.position().y;
        let label = canvas
            .source()
            .entry(icon.key())
            .map(|entry| if entry.is_dir { format!("{}/", entry.name) } else { entry.name.clone() })
            .unwrap_or_default();
        match rows.last_mut() {
            Some((row_y, labels)) if (*row_y - y).abs() < 0.01 => labels.push(label),
            _ => rows.push((y, vec![label])),
        }
    });

    for (index, (y, labels)) in rows.iter().enumerate() {
        println!("row {:>3} @ {:>6.0}: {}", index, y, labels.join("  "));
    }
}
