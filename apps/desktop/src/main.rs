use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, TwinApi, TwinClient};
use serde::Serialize;
use shared::{
    domain::{find_preset, SessionId, TwinDraft, TwinId, DATE_GOALS, TWIN_PRESETS},
    protocol::DEFAULT_SIM_ROUNDS,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "desktop", about = "Social Twin Trainer command-line client")]
struct Args {
    /// Backend origin. Overrides twin_client.toml, TWIN_API_URL and APP__API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Backend liveness check.
    Health,
    /// List stored twins.
    List,
    /// Print the built-in twin presets.
    Presets,
    /// Create a twin from a preset or from explicit fields.
    Create {
        #[arg(long, conflicts_with_all = ["name", "personality", "interests", "style"])]
        preset: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        personality: String,
        #[arg(long, default_value = "")]
        interests: String,
        #[arg(long, default_value = "")]
        style: String,
    },
    Delete {
        twin_id: String,
    },
    /// Analyze compatibility and open a session.
    Match {
        twin_a: String,
        twin_b: String,
    },
    Plan {
        session_id: String,
        #[arg(long, default_value = DATE_GOALS[0])]
        goal: String,
    },
    Simulate {
        session_id: String,
        #[arg(long, default_value_t = DEFAULT_SIM_ROUNDS)]
        rounds: u32,
    },
    /// Create Alex and Jordan, match them, plan a coffee date and simulate it.
    Demo,
}

fn twin_draft(
    preset: Option<String>,
    name: Option<String>,
    personality: String,
    interests: String,
    style: String,
) -> Result<TwinDraft> {
    if let Some(preset) = preset {
        let Some(preset) = find_preset(&preset) else {
            let known: Vec<_> = TWIN_PRESETS.iter().map(|p| p.name).collect();
            bail!("unknown preset '{preset}' (known: {})", known.join(", "));
        };
        return Ok(preset.into());
    }

    let draft = TwinDraft {
        name: name.unwrap_or_default(),
        personality,
        interests,
        communication_style: style,
    };
    if !draft.is_submittable() {
        bail!("a twin needs a --name or a --preset");
    }
    Ok(draft)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(api: &dyn TwinApi, command: Command) -> Result<()> {
    match command {
        Command::Health => print_json(&api.health().await?),
        Command::List => {
            let twins = api.list_twins().await?;
            if twins.is_empty() {
                println!("No twins yet.");
                return Ok(());
            }
            for twin in twins {
                println!(
                    "{}  {}  ({}; {})",
                    twin.id, twin.name, twin.personality, twin.interests
                );
            }
            Ok(())
        }
        Command::Presets => {
            for preset in &TWIN_PRESETS {
                println!(
                    "{}: {} | {} | {}",
                    preset.name, preset.personality, preset.interests, preset.communication_style
                );
            }
            Ok(())
        }
        Command::Create {
            preset,
            name,
            personality,
            interests,
            style,
        } => {
            let draft = twin_draft(preset, name, personality, interests, style)?;
            print_json(&api.create_twin(&draft).await?)
        }
        Command::Delete { twin_id } => {
            api.delete_twin(&TwinId(twin_id.clone())).await?;
            println!("Deleted {twin_id}");
            Ok(())
        }
        Command::Match { twin_a, twin_b } => {
            print_json(&api.request_match(&TwinId(twin_a), &TwinId(twin_b)).await?)
        }
        Command::Plan { session_id, goal } => {
            print_json(&api.request_plan(&SessionId(session_id), &goal).await?)
        }
        Command::Simulate { session_id, rounds } => {
            print_json(&api.request_simulation(&SessionId(session_id), rounds).await?)
        }
        Command::Demo => demo(api).await,
    }
}

async fn demo(api: &dyn TwinApi) -> Result<()> {
    let mut ids = Vec::new();
    for name in ["Alex", "Jordan"] {
        let preset = find_preset(name).context("built-in preset missing")?;
        let created = api.create_twin(&preset.into()).await?;
        println!("Created {} ({})", created.name, created.id);
        ids.push(created.id);
    }

    let matched = api.request_match(&ids[0], &ids[1]).await?;
    println!(
        "Compatibility {} (session {})",
        matched.analysis.score_label(),
        matched.session_id
    );
    print_json(&matched.analysis)?;

    let plan = api.request_plan(&matched.session_id, DATE_GOALS[0]).await?;
    println!("Plan: {}", plan.display_title());
    print_json(&plan)?;

    let simulation = api
        .request_simulation(&matched.session_id, DEFAULT_SIM_ROUNDS)
        .await?;
    println!("Overall date score {}", simulation.score_label());
    for (index, exchange) in simulation.exchanges.iter().enumerate() {
        println!(
            "{:>3} {:<10} {:>5.1}  {}",
            exchange.round_label(index),
            exchange.speaker,
            exchange.engagement_score,
            exchange.message
        );
    }
    if let Some(summary) = simulation.summary() {
        println!("{summary}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    let settings = load_settings().with_override(args.api_url);
    let client = TwinClient::from_settings(&settings)?;
    tracing::info!(api_url = client.base_url(), "using backend");

    run(&client, args.command).await
}
