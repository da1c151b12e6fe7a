use clap::Parser;
use lgmpy::cli::{run_magfield, MagfieldArgs};

pub type BinResult<T, E = Box<dyn std::error::Error + Send + Sync>> = Result<T, E>;

fn main() {
    env_logger::init();
    if let Err(e) = bin_main() {
        eprintln!("error: {e}");
        if let Some(e) = e.source() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

fn bin_main() -> BinResult<()> {
    let args = MagfieldArgs::parse();

    let request = run_magfield(&args)?;
    for b in request.b().as_slice() {
        println!("{b}");
    }
    Ok(())
}
