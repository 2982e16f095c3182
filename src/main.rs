use std::process::ExitCode;
use std::time::Instant;

use log::info;
use rand_core::OsRng;

use msidh::error::Result;
use msidh::protocols::{
    Role,
    msidh::Msidh,
    parameters::{MsidhParameters, TersidhParameters},
    tersidh::Tersidh,
};

fn run_msidh(t: usize) -> Result<bool> {
    let start = Instant::now();
    let params = MsidhParameters::generate(t)?;
    println!("MSIDH t = {t}: p = {} (f = {})", params.p, params.f);
    println!("  A = {}", params.A);
    println!("  B = {}", params.B);
    let E0 = params.starting_curve()?;

    let mut alice = Msidh::new(&params, &E0, None, None, None, Role::Alice, &mut OsRng)?;
    let mut bob = Msidh::new(&params, &E0, None, None, None, Role::Bob, &mut OsRng)?;

    let pk_alice = alice.generate_public_key(bob.basis())?;
    let pk_bob = bob.generate_public_key(alice.basis())?;

    let ss_alice = alice.key_exchange(&pk_bob)?;
    let ss_bob = bob.key_exchange(&pk_alice)?;

    println!("  Alice: j = {ss_alice}");
    println!("  Bob:   j = {ss_bob}");
    info!("MSIDH exchange took {:?}", start.elapsed());
    Ok(ss_alice == ss_bob)
}

fn run_tersidh(t: usize) -> Result<bool> {
    let start = Instant::now();
    let params = TersidhParameters::generate(t)?;
    println!("TerSIDH t = {t}: p = {} (f = {})", params.p, params.f);
    let E0 = params.starting_curve()?;

    let mut alice = Tersidh::new(&params, &E0, None, None, Role::Alice, &mut OsRng)?;
    let basis = alice.basis().clone();
    let mut bob = Tersidh::new(&params, &E0, Some(basis), None, Role::Bob, &mut OsRng)?;

    let pk_alice = alice.prepare_public_key()?;
    let pk_bob = bob.prepare_public_key()?;

    let ss_alice = alice.key_exchange(&pk_bob)?;
    let ss_bob = bob.key_exchange(&pk_alice)?;

    println!("  Alice: j = {ss_alice}");
    println!("  Bob:   j = {ss_bob}");
    info!("TerSIDH exchange took {:?}", start.elapsed());
    Ok(ss_alice == ss_bob)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let protocol = args.get(1).map(String::as_str).unwrap_or("msidh");
    let t = match args.get(2).map(|s| s.parse::<usize>()) {
        None => 8,
        Some(Ok(t)) => t,
        Some(Err(e)) => {
            eprintln!("invalid security parameter: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match protocol {
        "msidh" => run_msidh(t),
        "tersidh" => run_tersidh(t),
        other => {
            eprintln!("unknown protocol {other}, expected msidh or tersidh");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(true) => {
            println!("Shared secrets match");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            eprintln!("Shared secrets differ");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
