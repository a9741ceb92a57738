/// Example: Render one frame of an OBJ model to the terminal
///
/// Usage: cargo run --example render_obj -- path/to/model.obj
use orbit3d_core::transform::{rotation_x, rotation_y, translation};
use orbit3d_core::{obj, Camera, Mesh, Pipeline, Rgb};
use orbit3d_terminal::Canvas;
use std::env;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mesh = match args.get(1) {
        Some(path) => {
            println!("Loading OBJ file: {}", path);
            obj::load_obj(path)?
        }
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using default cube...");
            Mesh::cube()
        }
    };
    println!("Loaded {} triangles", mesh.len());

    let mut canvas = Canvas::new(80, 48);
    let pipeline = Pipeline::new(canvas.width() as u32, canvas.height() as u32, 90.0);
    let camera = Camera::new();
    let world = translation(0.0, 0.0, 5.0) * rotation_y(30.0) * rotation_x(20.0);

    let rows = pipeline.process_mesh(&mesh, &camera, &world, Rgb::new(150, 150, 150));
    canvas.draw_triangles(&rows, Some(Rgb::WHITE));

    let mut stdout = io::stdout();
    canvas.draw(&mut stdout)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
