use std::env;
use std::process;

use ramansignal::{Calibrator, RamanSpectrum};

fn main() {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} <sample.csv> <neon.csv> <acetonitrile.csv>", args[0]);
        process::exit(2);
    }

    let spectrum =
        match RamanSpectrum::from_openraman_csvfiles(&args[1], &args[2], &args[3], &Calibrator::default()) {
            Ok(spectrum) => spectrum,
            Err(err) => {
                eprintln!("Calibration failed: {err}");
                process::exit(1);
            }
        };

    println!("wavenumber_cm-1\tintensity");
    for (wavenumber, intensity) in spectrum.iter() {
        println!("{wavenumber:.4}\t{intensity}");
    }
}
