use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use surveymap::{
    core::url::tile_url, Geocoder, LatLng, MemoryDropdown, PickerBuilder,
    PickerConfig, SurveyPicker, SurveyUpdate, TileCoord, TileImage, TileLoader,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Survey picker for dated satellite imagery
#[derive(Debug, Parser)]
#[command(name = "surveymap-app", version, about)]
struct Cli {
    /// JSON configuration file; defaults plus SURVEYMAP_* variables otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the surveys covering a view and the date that would be shown
    Surveys {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
        #[arg(long)]
        zoom: Option<f64>,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Preferred survey date
        #[arg(long)]
        date: Option<String>,
    },
    /// Download a single tile
    Tile {
        #[arg(long)]
        z: u8,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
        /// Survey date to pin the imagery to
        #[arg(long)]
        date: Option<String>,
        /// Where to write the image
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a coordinate as degrees, minutes and seconds
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Look up a place by name
    Search { query: Vec<String> },
    /// Drive the picker from stdin commands
    Interactive,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PickerConfig> {
    let mut config = match path {
        Some(path) => PickerConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PickerConfig::default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Surveys {
            lat,
            lng,
            zoom,
            width,
            height,
            date,
        } => {
            if let (Some(width), Some(height)) = (width, height) {
                config.viewport_size = (width, height);
            }
            let center = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
                (None, None) => None,
                _ => bail!("--lat and --lng go together"),
            };
            list_surveys(config, center, zoom, date).await
        }
        Command::Tile {
            z,
            x,
            y,
            date,
            out,
        } => download_tile(&config, TileCoord::new(x, y, z), date, out).await,
        Command::Locate { lat, lng } => {
            println!("{}", LatLng::new(lat, lng).to_hdms(2));
            Ok(())
        }
        Command::Search { query } => {
            let geocoder = Geocoder::new(config.geocoder.clone())?;
            for place in geocoder.search(&query.join(" ")).await? {
                println!("{}  ({})", place.name, place.location);
            }
            Ok(())
        }
        Command::Interactive => interactive(config).await,
    }
}

async fn list_surveys(
    config: PickerConfig,
    center: Option<LatLng>,
    zoom: Option<f64>,
    date: Option<String>,
) -> anyhow::Result<()> {
    let dropdown = Arc::new(Mutex::new(MemoryDropdown::new()));
    let mut builder = PickerBuilder::with_config(config).dropdown(Box::new(dropdown.clone()));
    if let Some(center) = center {
        builder = builder.center(center);
    }
    if let Some(zoom) = zoom {
        builder = builder.zoom(zoom);
    }
    let picker = builder.build()?;
    if let Some(date) = date {
        picker.selected_cell().set(Some(date));
    }

    let bounds = picker.bounds();
    println!(
        "view N {:.6} E {:.6} S {:.6} W {:.6}",
        bounds.north, bounds.east, bounds.south, bounds.west
    );

    picker.update_surveys().await?;
    print_dropdown(&dropdown);
    Ok(())
}

fn print_dropdown(dropdown: &Mutex<MemoryDropdown>) {
    let dropdown = dropdown.lock().unwrap_or_else(|e| e.into_inner());
    if dropdown.options().is_empty() {
        println!("no surveys cover this view");
        return;
    }
    for option in dropdown.options() {
        let marker = if dropdown.value() == Some(option.value.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {}", marker, option.label);
    }
}

async fn download_tile(
    config: &PickerConfig,
    coord: TileCoord,
    date: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !coord.is_valid() {
        bail!("tile {} does not exist", coord);
    }
    let url = tile_url(&config.api, coord, date.as_deref(), &config.layer_type);
    println!("{}", url);

    let loader = TileLoader::new()?;
    match loader.fetch(&url).await {
        TileImage::Loaded(data) => {
            let out = out.unwrap_or_else(|| {
                PathBuf::from(format!("tile_{}_{}_{}.img", coord.z, coord.x, coord.y))
            });
            tokio::fs::write(&out, &data).await?;
            println!("wrote {} bytes to {}", data.len(), out.display());
        }
        TileImage::Blank => println!("no imagery for this tile"),
    }
    Ok(())
}

const HELP: &str = "commands: move <lat> <lng> [zoom] | select <date> | click <lat> <lng> | goto <place> | tiles | quit";

async fn interactive(config: PickerConfig) -> anyhow::Result<()> {
    let geocoder = Geocoder::new(config.geocoder.clone())?;
    let dropdown = Arc::new(Mutex::new(MemoryDropdown::new()));
    let picker = PickerBuilder::with_config(config)
        .dropdown(Box::new(dropdown.clone()))
        .on_selected(|value| println!("selected: {}", value.unwrap_or("-")))
        .on_displayed(|value| println!("displayed: {}", value.unwrap_or("-")))
        .build()?;

    println!("{}", HELP);
    refresh(&picker, &dropdown).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => break,
            ["move", lat, lng, rest @ ..] => {
                let (Ok(lat), Ok(lng)) = (lat.parse::<f64>(), lng.parse::<f64>()) else {
                    println!("move needs numeric coordinates");
                    continue;
                };
                let mut viewport = picker.viewport();
                viewport.set_center(LatLng::new(lat, lng));
                if let Some(zoom) = rest.first().and_then(|z| z.parse::<f64>().ok()) {
                    viewport.set_zoom(zoom);
                }
                picker.set_viewport(viewport);
                refresh(&picker, &dropdown).await;
            }
            ["select", date] => {
                picker.on_select(date);
                print_dropdown(&dropdown);
            }
            ["click", lat, lng] => match (lat.parse::<f64>(), lng.parse::<f64>()) {
                (Ok(lat), Ok(lng)) => println!("{}", LatLng::new(lat, lng).to_hdms(2)),
                _ => println!("click needs numeric coordinates"),
            },
            ["goto", query @ ..] => match geocoder.search(&query.join(" ")).await {
                Ok(places) => match places.first() {
                    Some(place) => {
                        println!("{}", place.name);
                        let mut viewport = picker.viewport();
                        viewport.set_center(place.location);
                        picker.set_viewport(viewport);
                        refresh(&picker, &dropdown).await;
                    }
                    None => println!("nothing found"),
                },
                Err(e) => println!("search failed: {}", e),
            },
            ["tiles"] => load_visible_tiles(&picker).await,
            _ => println!("{}", HELP),
        }
    }
    Ok(())
}

async fn refresh(picker: &SurveyPicker, dropdown: &Mutex<MemoryDropdown>) {
    match picker.update_surveys().await {
        Ok(SurveyUpdate::Applied { .. }) => print_dropdown(dropdown),
        Ok(SurveyUpdate::Superseded) => {}
        Err(e) => println!("coverage lookup failed: {}", e),
    }
}

async fn load_visible_tiles(picker: &SurveyPicker) {
    let layer = picker.tile_layer();
    let queued = picker.request_visible_tiles();
    let mut loaded = 0;
    let mut blank = 0;

    for _ in 0..100 {
        if layer.pending_count() == 0 {
            break;
        }
        for result in layer.poll_loaded() {
            match result.image {
                TileImage::Loaded(_) => loaded += 1,
                TileImage::Blank => blank += 1,
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    println!("{} tiles requested, {} loaded, {} blank", queued, loaded, blank);
}
