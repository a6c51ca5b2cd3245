//! meshpress-export - mesh optimizer
//!
//! Compresses glTF/GLB meshes into snorm16 position and QTangent attribute
//! streams (.mpmesh)

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use meshpress_export::{load_mesh, mesh, resolve_config};

#[derive(Parser)]
#[command(name = "meshpress-export")]
#[command(about = "Vertex stream compressor for glTF meshes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize a mesh and save it next to the source
    Optimize {
        /// Input mesh file (glTF/GLB)
        input: PathBuf,

        /// Output .mpmesh file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to meshpress.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pack vertices on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Print a summary of an optimized mesh
    Inspect {
        /// Input .mpmesh file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize {
            input,
            output,
            config,
            sequential,
        } => {
            let mut config = resolve_config(config.as_deref())?;
            if sequential {
                config.codec.parallel = false;
            }

            tracing::info!("Optimizing {:?}", input);
            let report = mesh::optimize_file(&input, output.as_deref(), &config)?;
            tracing::info!("Saved {:?}", report.output);
        }

        Commands::Inspect { input } => {
            let mesh = load_mesh(&input)?;
            let frames = mesh.decode_tangent_frames();
            let left_handed = frames.iter().filter(|f| f.tangent.w < 0.0).count();
            let max_divisor = mesh
                .positions
                .iter()
                .map(|p| p.divisor())
                .fold(0.0f32, f32::max);

            println!("name:          {}", mesh.name);
            println!("vertices:      {}", mesh.vertex_count());
            println!("indices:       {} ({:?})", mesh.indices.len(), mesh.indices.format());
            println!("submeshes:     {}", mesh.submeshes.len());
            println!("bounds:        {:?} .. {:?}", mesh.bounds.min, mesh.bounds.max);
            println!("max divisor:   {max_divisor}");
            println!("left-handed:   {left_handed}");
        }
    }

    Ok(())
}
