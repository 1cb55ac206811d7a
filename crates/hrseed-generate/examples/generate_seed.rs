use std::env;
use std::path::PathBuf;

use hrseed_generate::{Artifact, GenerateOptions, GenerationEngine};
use hrseed_plan::{default_plan, load_plan};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let mut plan_path: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--plan" => plan_path = args.next().map(PathBuf::from),
            "--seed" => seed = args.next().map(|value| value.parse()).transpose()?,
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let validated = match plan_path {
        Some(path) => load_plan(&path)?,
        None => default_plan()?,
    };

    let engine = GenerationEngine::new(GenerateOptions {
        seed,
        ..GenerateOptions::default()
    });
    let result = engine.run(&validated.plan)?;

    match result.artifact {
        Artifact::Single(bytes) => print!("{}", String::from_utf8_lossy(&bytes)),
        Artifact::Files(files) => {
            for (name, bytes) in files {
                println!("{name}: {} bytes", bytes.len());
            }
        }
    }
    Ok(())
}
