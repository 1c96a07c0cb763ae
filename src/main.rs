use copyforge::models::GenerationRequest;
use copyforge::pipeline::{Pipeline, PipelineConfig};
use copyforge::store::{DescriptionStore, NewDescription};
use eyre::{WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

const USAGE: &str = "\
usage:
  copyforge <product name> [--type <t>] [--audience <a>] [--features <f>] [--tone <t>]
            [--seed <n>] [--offline] [--save] [--user <id>]
  copyforge list [--page <n>] [--limit <n>] [--user <id>]
  copyforge delete <id> [--user <id>]";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Generate(args) => generate(args).await,
        Command::List { user, page, limit } => {
            let store = require_store()?;
            let result = store
                .list(&user, page, limit)
                .await
                .wrap_err("failed to list descriptions")?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Delete { user, id } => {
            let store = require_store()?;
            store
                .delete(&user, id)
                .await
                .wrap_err("failed to delete description")?;
            info!(target = "copyforge.cli", id = %id, "description deleted");
            Ok(())
        }
    }
}

async fn generate(args: GenerateArgs) -> eyre::Result<()> {
    let mut config = PipelineConfig::default();
    if args.offline {
        config.backends = &[];
    }
    config.seed = args.seed;

    let pipeline = Pipeline::new(config);
    let result = pipeline.run(args.request.clone()).await?;
    info!(
        target = "copyforge.cli",
        source = %result.source,
        attempts = result.attempts.len(),
        "description generated"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.save {
        let Some(store) = DescriptionStore::from_env() else {
            warn!(
                target = "copyforge.cli",
                "persistence not configured, skipping --save"
            );
            return Ok(());
        };
        let record =
            NewDescription::from_result(&args.user, &args.request, &result.description, &result.source);
        let stored = store
            .insert(&record)
            .await
            .wrap_err("failed to persist description")?;
        info!(
            target = "copyforge.cli",
            id = %stored.id,
            created_at = %stored.created_at,
            "description persisted"
        );
    }
    Ok(())
}

enum Command {
    Help,
    Generate(GenerateArgs),
    List { user: String, page: u32, limit: u32 },
    Delete { user: String, id: Uuid },
}

struct GenerateArgs {
    request: GenerationRequest,
    seed: Option<u64>,
    offline: bool,
    save: bool,
    user: String,
}

const DEFAULT_USER: &str = "demo-user";

fn parse_args(args: impl Iterator<Item = String>) -> eyre::Result<Command> {
    let args: Vec<String> = args.collect();
    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => Ok(Command::Help),
        Some("list") => parse_list(&args[1..]),
        Some("delete") => parse_delete(&args[1..]),
        _ => parse_generate(&args),
    }
}

fn parse_generate(args: &[String]) -> eyre::Result<Command> {
    let mut positionals: Vec<String> = Vec::new();
    let mut product_type = None;
    let mut target_audience = None;
    let mut features = None;
    let mut tone = None;
    let mut seed = None;
    let mut offline = false;
    let mut save = false;
    let mut user = DEFAULT_USER.to_string();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--type" | "-t" => product_type = Some(expect_value(&mut iter, arg)?),
            "--audience" | "-a" => target_audience = Some(expect_value(&mut iter, arg)?),
            "--features" | "-f" => features = Some(expect_value(&mut iter, arg)?),
            "--tone" => tone = Some(expect_value(&mut iter, arg)?),
            "--seed" => {
                seed = Some(
                    expect_value(&mut iter, arg)?
                        .parse()
                        .wrap_err("--seed expects a number")?,
                )
            }
            "--user" => user = expect_value(&mut iter, arg)?,
            "--offline" => offline = true,
            "--save" => save = true,
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') => {
                return Err(eyre!("unknown flag `{other}`\n{USAGE}"));
            }
            other => positionals.push(other.to_string()),
        }
    }

    if positionals.is_empty() {
        return Err(eyre!("missing product name\n{USAGE}"));
    }

    Ok(Command::Generate(GenerateArgs {
        request: GenerationRequest {
            product_name: positionals.join(" "),
            product_type,
            target_audience,
            features,
            tone,
        },
        seed,
        offline,
        save,
        user,
    }))
}

fn parse_list(args: &[String]) -> eyre::Result<Command> {
    let mut page = 1;
    let mut limit = 10;
    let mut user = DEFAULT_USER.to_string();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--page" => {
                page = expect_value(&mut iter, arg)?
                    .parse()
                    .wrap_err("--page expects a number")?
            }
            "--limit" => {
                limit = expect_value(&mut iter, arg)?
                    .parse()
                    .wrap_err("--limit expects a number")?
            }
            "--user" => user = expect_value(&mut iter, arg)?,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(eyre!("unknown argument `{other}`\n{USAGE}")),
        }
    }

    Ok(Command::List { user, page, limit })
}

fn parse_delete(args: &[String]) -> eyre::Result<Command> {
    let mut id = None;
    let mut user = DEFAULT_USER.to_string();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" => user = expect_value(&mut iter, arg)?,
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') => {
                return Err(eyre!("unknown flag `{other}`\n{USAGE}"));
            }
            other => {
                id = Some(Uuid::parse_str(other).wrap_err("delete expects a record id")?);
            }
        }
    }

    let Some(id) = id else {
        return Err(eyre!("missing record id\n{USAGE}"));
    };
    Ok(Command::Delete { user, id })
}

fn expect_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> eyre::Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| eyre!("{flag} expects a value"))
}

fn require_store() -> eyre::Result<DescriptionStore> {
    DescriptionStore::from_env()
        .ok_or_else(|| eyre!("SUPABASE_URL and a service key are required for this command"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
