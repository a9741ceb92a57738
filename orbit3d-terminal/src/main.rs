/// Orbit3D Terminal - Spaceflight Demo
///
/// Flies a ship above an Earth-sized planet in the terminal.
/// Controls:
///   - W/S: Thrust (Chase) or move (Free)
///   - Arrow Keys / Mouse drag: Look
///   - C: Cycle camera mode, +/-: Zoom
///   - R/T/Y: Time warp 1x/10x/50x
///   - ESC: Quit
use clap::Parser;
use log::{warn, LevelFilter};
use orbit3d_core::{obj, Mesh, Starfield};
use orbit3d_terminal::{AppSettings, FlightApp};
use std::fs::File;
use std::path::PathBuf;

/// Command line arguments for the terminal flight demo
#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal spaceflight renderer")]
struct Args {
    /// Wavefront OBJ model for the ship (defaults to a cube)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f32,

    /// Number of background stars
    #[arg(long, default_value_t = 1500)]
    stars: usize,

    /// Seed for a reproducible starfield
    #[arg(long)]
    seed: Option<u64>,

    /// Target frame rate
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log output file; the terminal itself is used for drawing
    #[arg(long, default_value = "orbit3d.log")]
    log_file: PathBuf,
}

fn load_ship(path: Option<&PathBuf>) -> Mesh {
    let Some(path) = path else {
        return Mesh::cube();
    };
    match obj::load_obj(path) {
        Ok(mesh) if !mesh.is_empty() => mesh,
        Ok(_) => {
            warn!("{} has no faces, using cube", path.display());
            Mesh::cube()
        }
        Err(e) => {
            warn!("Failed to load ship model: {e}, using cube");
            Mesh::cube()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    log::info!("Orbit3D starting - log file: {}", args.log_file.display());

    let ship = load_ship(args.model.as_ref());
    let starfield = match args.seed {
        Some(seed) => Starfield::with_seed(args.stars, seed),
        None => Starfield::random(args.stars),
    };

    let settings = AppSettings {
        fov_degrees: args.fov,
        target_fps: args.fps,
    };
    let mut app = FlightApp::new(ship, starfield, settings)?;
    app.run()?;

    println!("Thank you for flying Orbit3D!");
    Ok(())
}
