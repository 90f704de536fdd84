extern crate clap;
extern crate env_logger;
extern crate num_cpus;
extern crate rowfarm;

use clap::{App, Arg, ArgMatches};
use log::{debug, info};
use rowfarm::config::{parse_complex, parse_pair};
use rowfarm::{ComplexPlane, RenderConfig};
use std::str::FromStr;
use std::time::Instant;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CORNER1: &str = "corner1";
const CORNER2: &str = "corner2";
const WORKERS: &str = "workers";
const ITERATIONS: &str = "iterations";

fn args<'a>(default_workers: &'a str) -> ArgMatches<'a> {
    App::new("rowfarm")
        .version("0.1.0")
        .about("Mandelbrot renderer farming rows out to a pool of workers")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("result.ppm")
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("512")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_535,
                        "Could not parse image size",
                        "Image size must be between 1 and 65535",
                    )
                })
                .help("Width and height of the (square) output image"),
        )
        .arg(
            Arg::with_name(CORNER1)
                .required(false)
                .long(CORNER1)
                .short("a")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-1.5,-1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse first corner"))
                .help("One corner of the region of the complex plane"),
        )
        .arg(
            Arg::with_name(CORNER2)
                .required(false)
                .long(CORNER2)
                .short("b")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.5,1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse second corner"))
                .help("The opposite corner of the region of the complex plane"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .default_value(default_workers)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1024,
                        "Could not parse worker count",
                        "Worker count must be between 1 and 1024",
                    )
                })
                .help("Number of workers to farm rows out to"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("255")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iteration cap per pixel"),
        )
        .get_matches()
}

// The validators have already vetted every value, so these only fail
// if the two disagree.
fn config_from(matches: &ArgMatches) -> Result<RenderConfig, String> {
    let value = |name: &str| {
        matches
            .value_of(name)
            .ok_or_else(|| format!("missing value for {}", name))
    };
    let dim = usize::from_str(value(SIZE)?).map_err(|e| e.to_string())?;
    let max_iterations = u32::from_str(value(ITERATIONS)?).map_err(|e| e.to_string())?;
    let workers = usize::from_str(value(WORKERS)?).map_err(|e| e.to_string())?;
    let c1 = parse_complex(value(CORNER1)?).ok_or("Error parsing first corner")?;
    let c2 = parse_complex(value(CORNER2)?).ok_or("Error parsing second corner")?;
    Ok(RenderConfig {
        dim,
        max_iterations,
        plane: ComplexPlane(c1, c2),
        workers,
    })
}

fn main() {
    env_logger::init();
    let default_workers = num_cpus::get().to_string();
    let matches = args(&default_workers);

    let config = match config_from(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let output = matches.value_of(OUTPUT).unwrap_or("result.ppm");
    debug!("{:?}", config);

    println!("Starting Timer");
    let start = Instant::now();

    let written = rowfarm::render(&config).and_then(|rendering| {
        info!(
            "rows per worker: {:?}",
            rendering
                .workers
                .iter()
                .map(|w| w.rows.len())
                .collect::<Vec<_>>()
        );
        rowfarm::ppm::save(output, &rendering.image, config.max_iterations)
    });
    if let Err(e) = written {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }

    let seconds = start.elapsed().as_secs_f64();
    println!("Execution took {} seconds", (seconds * 100.0).ceil() / 100.0);
}
