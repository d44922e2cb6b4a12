use clap::{App, Arg};
use hwloc::{ObjectType, Topology};
use lenstra_ecm::curve::{EdwardsModel, WeierstrassModel};
use lenstra_ecm::driver::{run_parallel, run_sequential};
use lenstra_ecm::{BigInt, EcmError, RunContext};
use log::info;
use rug::rand::RandState;
use std::process::exit;
use std::str::FromStr;
use std::time::Instant;

/// Number of physical cores `hwloc` reports on this host, falling back to
/// one worker if topology discovery fails (matching the sibling
/// implementation's fallback in its single-threaded path).
fn detected_worker_count() -> usize {
    let topology = Topology::new();
    match topology.objects_with_type(&ObjectType::Core) {
        Ok(cores) if !cores.is_empty() => cores.len(),
        _ => 1,
    }
}

fn main() {
    let matches = App::new("ECM Factorization")
        .version("1.0")
        .author("")
        .about("Factors a composite integer using the Elliptic Curve Method")
        .arg(
            Arg::new("composite-number")
                .about("Composite number to factorize")
                .takes_value(true)
                .short('n')
                .long("composite-number")
                .required(true),
        )
        .arg(
            Arg::new("weierstrass_model")
                .about("Use the short Weierstrass curve model")
                .takes_value(false)
                .short('w')
                .long("weierstrass_model"),
        )
        .arg(
            Arg::new("edwards_model")
                .about("Use the twisted Edwards curve model")
                .takes_value(false)
                .short('e')
                .long("edwards_model"),
        )
        .arg(
            Arg::new("bound")
                .about("Per-curve iteration bound (defaults to floor(sqrt(N)))")
                .takes_value(true)
                .short('b')
                .long("bound"),
        )
        .arg(
            Arg::new("timer")
                .about("Print wall-clock time on completion")
                .takes_value(false)
                .short('t')
                .long("timer"),
        )
        .arg(
            Arg::new("parallel")
                .about("Run the master/worker parallel driver")
                .takes_value(false)
                .short('p')
                .long("parallel"),
        )
        .arg(
            Arg::new("verbose")
                .about("Info-level logging")
                .takes_value(false)
                .long("verbose"),
        )
        .arg(
            Arg::new("debug")
                .about("Debug-level logging")
                .takes_value(false)
                .long("debug"),
        )
        .try_get_matches();

    let matches = match matches {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            exit(EcmError::BadArguments(e.to_string()).exit_code());
        }
    };

    if matches.is_present("debug") {
        simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init()
            .unwrap();
    } else if matches.is_present("verbose") {
        simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Info)
            .init()
            .unwrap();
    }

    let composite = match matches.value_of("composite-number").map(BigInt::from_str) {
        Some(Ok(n)) => n,
        _ => {
            eprintln!("Wrong input: composite number must be a nonnegative integer");
            exit(EcmError::BadArguments("invalid --composite-number".to_string()).exit_code());
        }
    };

    let bound = match matches.value_of("bound").map(BigInt::from_str) {
        Some(Ok(b)) => Some(b),
        Some(Err(_)) => {
            eprintln!("Wrong input: bound must be a nonnegative integer");
            exit(EcmError::BadArguments("invalid --bound".to_string()).exit_code());
        }
        None => None,
    };

    let parallel = matches.is_present("parallel");
    let workers = if parallel { detected_worker_count() } else { 1 };

    let ctx = match RunContext::build(
        composite,
        bound,
        matches.is_present("weierstrass_model"),
        matches.is_present("edwards_model"),
        parallel,
        workers,
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", e);
            exit(e.exit_code());
        }
    };

    println!("Factorizing number: {}", ctx.composite);
    println!("Using model: {}", ctx.model.name());
    if parallel {
        info!("parallel mode: {} workers (hwloc core count)", ctx.workers);
    }

    let start = Instant::now();

    let factor = if ctx.parallel {
        match ctx.model {
            lenstra_ecm::ModelKind::Weierstrass => run_parallel(&ctx, WeierstrassModel::new),
            lenstra_ecm::ModelKind::Edwards => run_parallel(&ctx, EdwardsModel::new),
        }
    } else {
        let mut rand = RandState::new();
        rand.seed(&rug::Integer::from(std::process::id()));
        match ctx.model {
            lenstra_ecm::ModelKind::Weierstrass => {
                let mut model = WeierstrassModel::new(ctx.composite.clone());
                run_sequential(&ctx, &mut model, &mut rand)
            }
            lenstra_ecm::ModelKind::Edwards => {
                let mut model = EdwardsModel::new(ctx.composite.clone());
                run_sequential(&ctx, &mut model, &mut rand)
            }
        }
    };

    if matches.is_present("timer") {
        println!("time = {:.3} s", start.elapsed().as_secs_f64());
    }
    // In parallel mode the winning worker already printed
    // "worker <r>: factor = <d>" (see declare_winner); printing again here
    // would duplicate it, and the original never reaches this point for
    // the winning process since it aborts its communication environment
    // first (main.cpp).
    if !ctx.parallel {
        println!("Factor = {}", factor);
    }
}
