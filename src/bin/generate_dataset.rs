use galaxy_pipeline::dataset::{self, DEFAULT_SIZE};
use std::env;
use std::path::PathBuf;

const DEFAULT_PER_CLASS: usize = 10;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/samples"));
    let per_class = match args.next() {
        Some(n) => n
            .parse::<usize>()
            .map_err(|e| format!("Invalid per-class count '{n}': {e}\n{}", usage()))?,
        None => DEFAULT_PER_CLASS,
    };

    let written = dataset::write_dataset(&dir, per_class, DEFAULT_SIZE)?;
    println!("Dataset written: {} images in {}", written.len(), dir.display());
    Ok(())
}

fn usage() -> String {
    "Usage: generate_dataset [out_dir] [per_class]".to_string()
}
