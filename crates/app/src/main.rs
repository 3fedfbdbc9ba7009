use std::fmt;
use std::path::PathBuf;

use lift_core::model::SessionId;
use services::{AdvanceView, AppServices, CardView, Clock, LandingView, PlanLoopService};
use storage::json::DirectoryPlanSource;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPlansDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPlansDir { raw } => write!(f, "invalid --plans value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--plans <dir>] [--user <name>] [--password <pw>] [--plan <name>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --plans resources/plans");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LIFT_PLANS_DIR, LIFT_USER, LIFT_PASSWORD, LIFT_PLAN, RUST_LOG");
    eprintln!();
    eprintln!("Commands while a card is shown:");
    eprintln!("  <enter> | next    finish this exercise");
    eprintln!("  w <n>             record the weight used");
    eprintln!("  plan <name>       start another plan");
    eprintln!("  status            show progress");
    eprintln!("  quit              exit");
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    plans_dir: PathBuf,
    username: Option<String>,
    password: Option<String>,
    plan: Option<String>,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut plans_dir = env("LIFT_PLANS_DIR")
            .map_or_else(|| PathBuf::from("resources/plans"), PathBuf::from);
        let mut username = env("LIFT_USER");
        let mut password = env("LIFT_PASSWORD");
        let mut plan = env("LIFT_PLAN");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--plans" => {
                    let value = require_value(args, "--plans")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPlansDir { raw: value });
                    }
                    plans_dir = PathBuf::from(value);
                }
                "--user" => username = Some(require_value(args, "--user")?),
                "--password" => password = Some(require_value(args, "--password")?),
                "--plan" => plan = Some(require_value(args, "--plan")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            plans_dir,
            username,
            password,
            plan,
        })
    }
}

/// One line typed at the card prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Weight(u32),
    Plan(String),
    Status,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        match word {
            "" | "n" | "next" => Self::Next,
            "w" | "weight" => rest
                .parse()
                .map_or_else(|_| Self::Unknown(line.to_owned()), Self::Weight),
            "plan" if !rest.is_empty() => Self::Plan(rest.to_owned()),
            "s" | "status" => Self::Status,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_owned()),
        }
    }
}

fn print_landing(view: &LandingView) {
    match &view.username {
        Some(name) => println!("Hello, {name}."),
        None => println!("Not logged in."),
    }
    if view.plans.is_empty() {
        println!("No plans available.");
    } else {
        println!("Plans: {}", view.plans.join(", "));
    }
}

fn print_card(card: &CardView) {
    println!(
        "[{} {}/{}] {}: {} x {} @ {}",
        card.plan, card.position, card.total, card.exercise, card.sets, card.reps, card.weight
    );
}

fn print_advance(view: &AdvanceView) {
    if view.is_complete() {
        println!(
            "Done with {}. Last exercise: {} ({} x {} @ {}).",
            view.card.plan, view.card.exercise, view.card.sets, view.card.reps, view.card.weight
        );
    } else {
        print_card(&view.card);
    }
}

async fn prompt(
    lines: &mut tokio::io::Lines<BufReader<tokio::io::Stdin>>,
    label: &str,
) -> Result<Option<String>, std::io::Error> {
    println!("{label}");
    lines.next_line().await
}

async fn walk(
    plans: &PlanLoopService,
    session: &SessionId,
    first_plan: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut plan_name = first_plan;
    loop {
        let name = match plan_name.take() {
            Some(name) => name,
            None => match prompt(&mut lines, "Choose a plan:").await? {
                Some(line) if !line.trim().is_empty() => line.trim().to_owned(),
                Some(_) => continue,
                None => return Ok(()),
            },
        };
        match plans.activate(session, &name) {
            Ok(card) => {
                print_card(&card);
                break;
            }
            Err(err) => println!("{err}"),
        }
    }

    while let Some(line) = prompt(&mut lines, ">").await? {
        let outcome = match Input::parse(&line) {
            Input::Next => plans.advance(session).map(|view| print_advance(&view)),
            Input::Weight(weight) => plans.record_weight(session, weight).map(|c| print_card(&c)),
            Input::Plan(name) => plans.activate(session, &name).map(|c| print_card(&c)),
            Input::Status => plans.progress(session).map(|p| {
                println!("{}/{} done, {} remaining", p.completed, p.total, p.remaining);
            }),
            Input::Quit => return Ok(()),
            Input::Unknown(raw) => {
                println!("unrecognised input: {raw}");
                Ok(())
            }
        };
        // Session errors are user-facing; show them and keep the loop going.
        if let Err(err) = outcome {
            println!("{err}");
        }
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let source = DirectoryPlanSource::new(&args.plans_dir);
    let services = AppServices::from_source(&source, Clock::system()).await?;
    let plans = services.plan_loop();

    print_landing(&plans.landing(None));

    let (Some(username), Some(password)) = (args.username, args.password) else {
        eprintln!("--user and --password are required to start a plan");
        return Ok(());
    };
    let session = plans.login(&username, &password)?;
    print_landing(&plans.landing(Some(&session)));

    walk(&plans, &session, args.plan).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
