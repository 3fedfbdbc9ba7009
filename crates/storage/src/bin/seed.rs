use std::fmt;
use std::path::PathBuf;

use lift_core::model::{ExerciseTemplate, PlanSchema};
use storage::json::write_plan;

#[derive(Debug, Clone)]
struct Args {
    out_dir: PathBuf,
    sets: u32,
    reps: u32,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOut { raw: String },
    InvalidSets { raw: String },
    InvalidReps { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOut { raw } => write!(f, "invalid --out value: {raw}"),
            ArgsError::InvalidSets { raw } => write!(f, "invalid --sets value: {raw}"),
            ArgsError::InvalidReps { raw } => write!(f, "invalid --reps value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut out_dir = std::env::var("LIFT_PLANS_DIR")
            .map_or_else(|_| PathBuf::from("resources/plans"), PathBuf::from);
        let mut sets = 3;
        let mut reps = 5;
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => {
                    let value = require_value(&mut args, "--out")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidOut { raw: value });
                    }
                    out_dir = PathBuf::from(value);
                }
                "--sets" => {
                    let value = require_value(&mut args, "--sets")?;
                    sets = value
                        .parse::<u32>()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or_else(|| ArgsError::InvalidSets { raw: value.clone() })?;
                }
                "--reps" => {
                    let value = require_value(&mut args, "--reps")?;
                    reps = value
                        .parse::<u32>()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or_else(|| ArgsError::InvalidReps { raw: value.clone() })?;
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            out_dir,
            sets,
            reps,
            force,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <dir>      Directory to write plan files into (default: resources/plans)");
    eprintln!("  --sets <n>       Sets per exercise (default: 3)");
    eprintln!("  --reps <n>       Reps per set (default: 5)");
    eprintln!("  --force          Overwrite existing plan files");
    eprintln!("  -h, --help       Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LIFT_PLANS_DIR");
}

fn sample_plans(sets: u32, reps: u32) -> Result<Vec<(&'static str, PlanSchema)>, lift_core::Error> {
    let samples: [(&str, &str, &[&str]); 3] = [
        ("a.json", "A", &["squat", "press", "deadlift"]),
        ("b.json", "B", &["squat", "bench", "row"]),
        ("accessory/core.json", "Core", &["plank", "hanging leg raise"]),
    ];

    let mut plans = Vec::with_capacity(samples.len());
    for (file, name, exercises) in samples {
        let templates = exercises
            .iter()
            .map(|exercise| ExerciseTemplate::new(*exercise, sets, reps))
            .collect::<Result<Vec<_>, _>>()?;
        plans.push((file, PlanSchema::new(name, templates)?));
    }
    Ok(plans)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut written = 0;
    for (file, schema) in sample_plans(args.sets, args.reps)? {
        let path = args.out_dir.join(file);
        if path.exists() && !args.force {
            eprintln!("skipping existing {}", path.display());
            continue;
        }
        write_plan(&path, &schema).await?;
        written += 1;
    }

    println!(
        "Seeded {written} plan files into {}",
        args.out_dir.display()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
