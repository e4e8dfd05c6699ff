use clap::{Parser, Subcommand};
use photo_gallery::config::{self, GalleryConfig};
use photo_gallery::metadata::{LocalPhotoSource, MetadataPipeline};
use photo_gallery::navigation::{FullscreenRequest, Key, KeyOutcome, NavigationController};
use photo_gallery::output::{self, ViewerFrame};
use photo_gallery::{index, scan};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How long a command waits for the current photo's metadata before
/// rendering without it.
const METADATA_WAIT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "photo-gallery")]
#[command(about = "Browse a folder tree of photos")]
#[command(long_about = "\
Browse a folder tree of photos

Your filesystem is the data source. Directories become folders and image
files (jpg, jpeg, png, gif, webp, svg) become photos.

Collection structure:

  public/photos/
  ├── config.toml          # Gallery config (optional)
  ├── cover.jpg            # Root photo
  ├── Fauna/               # Folder
  │   ├── fox.jpg
  │   └── Birds/           # Nested folder
  │       └── heron.png
  └── Empty/               # Folders without photos are kept

Positions on the command line are 1-based, as shown by 'list'.

Run 'photo-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Photo collection directory
    #[arg(long, default_value = "public/photos", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the collection into an index document
    Scan {
        /// Write the index document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List photos in viewing order
    List {
        /// Only list the photos directly inside this folder (e.g. /Fauna/Birds)
        #[arg(long)]
        folder: Option<String>,
    },
    /// Show metadata for one photo
    Info {
        /// Photo path relative to the collection root (e.g. /Fauna/fox.jpg)
        path: String,
    },
    /// Open a viewer session driven by commands on stdin
    ///
    /// Commands: left, right, f, esc, jump N, click X WIDTH, drag START END,
    /// fullscreen on|off, quit
    View {
        /// Only view the photos directly inside this folder
        #[arg(long)]
        folder: Option<String>,
        /// Position to start at
        #[arg(long, default_value_t = 1)]
        start: usize,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            output: index_path,
        } => {
            let root = scan::scan(&cli.source);
            match index_path {
                Some(path) => {
                    scan::write_index(&path, &root)?;
                    for line in output::format_scan_output(&root) {
                        eprintln!("{}", line);
                    }
                    eprintln!("==> Wrote {}", path.display());
                }
                None => println!("{}", root.to_json_pretty()?),
            }
        }
        Command::List { folder } => {
            let root = scan::scan(&cli.source);
            let photos = select_photos(&root, folder.as_deref());
            output::print_photo_list(folder.as_deref(), &photos);
        }
        Command::Info { path } => {
            let config = config::load_config(&cli.source)?;
            let root = scan::scan(&cli.source);
            let photos = index::flatten(&root);
            let wanted = index::normalize_folder_path(&path);
            let photo = photos
                .iter()
                .find(|p| p.path == wanted)
                .ok_or_else(|| format!("No photo at {wanted}"))?;

            let mut pipeline = MetadataPipeline::new(Arc::new(LocalPhotoSource::new(&cli.source)));
            let ticket = pipeline.trigger(0, photo);
            pipeline.wait(ticket, METADATA_WAIT);
            output::print_metadata(photo, &config.photo_url(&photo.path), pipeline.current());
        }
        Command::View { folder, start } => {
            let config = config::load_config(&cli.source)?;
            run_viewer(&cli.source, &config, folder.as_deref(), start)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn select_photos(root: &scan::IndexNode, folder: Option<&str>) -> Vec<index::PhotoRef> {
    match folder {
        Some(folder) => index::resolve_folder(root, folder),
        None => index::flatten(root),
    }
}

/// One line of viewer input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ViewerCommand {
    Key(Key),
    Jump(usize),
    Click { x: f64, width: f64 },
    Drag { start: f64, end: f64 },
    Fullscreen(bool),
    Quit,
}

fn parse_command(line: &str) -> Option<ViewerCommand> {
    let mut words = line.split_whitespace();
    let command = match (words.next()?, words.next(), words.next()) {
        ("quit" | "q", None, None) => ViewerCommand::Quit,
        ("jump", Some(n), None) => ViewerCommand::Jump(n.parse().ok()?),
        ("click", Some(x), Some(width)) => ViewerCommand::Click {
            x: x.parse().ok()?,
            width: width.parse().ok()?,
        },
        ("drag", Some(start), Some(end)) => ViewerCommand::Drag {
            start: start.parse().ok()?,
            end: end.parse().ok()?,
        },
        ("fullscreen", Some("on"), None) => ViewerCommand::Fullscreen(true),
        ("fullscreen", Some("off"), None) => ViewerCommand::Fullscreen(false),
        (key, None, None) => match Key::from_name(key) {
            Key::Other => return None,
            key => ViewerCommand::Key(key),
        },
        _ => return None,
    };
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

/// Line-driven viewer. The terminal stands in for the host surface: it
/// grants every fullscreen request immediately.
fn run_viewer(
    source: &Path,
    config: &GalleryConfig,
    folder: Option<&str>,
    start: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = scan::scan(source);
    let photos = select_photos(&root, folder);
    let mut viewer = NavigationController::new(photos, start.saturating_sub(1))?;
    let mut pipeline = MetadataPipeline::new(Arc::new(LocalPhotoSource::new(source)));

    let ticket = pipeline.trigger(viewer.current_index(), viewer.current());
    pipeline.wait(ticket, METADATA_WAIT);
    render(&viewer, &pipeline, config);

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let Some(command) = parse_command(&line) else {
            eprintln!("Unknown command: {}", line.trim());
            continue;
        };

        let before = viewer.current_index();
        match command {
            ViewerCommand::Quit => break,
            ViewerCommand::Key(key) => match viewer.handle_key(key) {
                KeyOutcome::Close => break,
                KeyOutcome::Fullscreen(request) => {
                    viewer.fullscreen_changed(request == FullscreenRequest::Enter)
                }
                KeyOutcome::Navigated(_) | KeyOutcome::Ignored => {}
            },
            ViewerCommand::Jump(position) => {
                if position == 0 || !viewer.jump_to(position - 1) {
                    eprintln!("No photo at position {position}");
                }
            }
            ViewerCommand::Click { x, width } => {
                if config.navigation.enable_click_navigation {
                    viewer.click(x, width);
                } else {
                    debug!("click navigation disabled");
                }
            }
            ViewerCommand::Drag { start, end } => {
                if config.navigation.enable_swipe {
                    viewer.gesture_start(start);
                    viewer.gesture_move(end);
                    viewer.gesture_end(end);
                } else {
                    debug!("swipe navigation disabled");
                }
            }
            ViewerCommand::Fullscreen(on) => viewer.fullscreen_changed(on),
        }

        if viewer.current_index() != before {
            let ticket = pipeline.trigger(viewer.current_index(), viewer.current());
            pipeline.wait(ticket, METADATA_WAIT);
        } else {
            pipeline.poll();
        }
        render(&viewer, &pipeline, config);
    }

    Ok(())
}

fn render(viewer: &NavigationController, pipeline: &MetadataPipeline, config: &GalleryConfig) {
    let photo = viewer.current();
    let url = config.photo_url(&photo.path);
    output::print_viewer_frame(&ViewerFrame {
        state: viewer.state(),
        photo,
        url: &url,
        metadata: pipeline.current(),
        accent: pipeline.accent_color(),
    });
}
