//! command dispatch and provider configuration.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use codefresh_client::{
    Client, ClientConfig, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL, DEFAULT_TOKEN_HEADER,
};
use codefresh_core::{Address, Manifest};
use codefresh_provider::{
    apply_plan, build_plan, destroy_plan, import_resource, load_manifest, read_data, validate, Op,
    Plan, Provider, StateStore,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod test_support;

const API_URL_ENV: &str = "CODEFRESH_API_URL";
const GRAPHQL_URL_ENV: &str = "CODEFRESH_API2_URL";
const API_KEY_ENV: &str = "CODEFRESH_API_KEY";

/// top-level cli definition.
#[derive(Parser)]
#[command(name = "codefresh")]
#[command(about = "Declarative management of Codefresh accounts, pipelines and access")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// connection flags shared by every command that talks to the api.
#[derive(Args, Debug, Clone, Default)]
struct ConnectionArgs {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    graphql_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    token_header: Option<String>,
}

/// cli subcommands.
#[derive(Subcommand)]
enum Command {
    Validate {
        #[arg(short = 'f', long)]
        file: PathBuf,
    },
    Plan {
        #[arg(short = 'f', long)]
        file: PathBuf,
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        #[arg(long)]
        state: Option<PathBuf>,
        #[command(flatten)]
        connection: ConnectionArgs,
        #[arg(long, default_value_t = false)]
        allow_delete: bool,
        #[arg(long, default_value_t = false)]
        no_refresh: bool,
    },
    Apply {
        #[arg(short = 'f', long)]
        file: PathBuf,
        #[arg(short = 'p', long)]
        plan: Option<PathBuf>,
        #[arg(long)]
        state: Option<PathBuf>,
        #[command(flatten)]
        connection: ConnectionArgs,
        #[arg(long, default_value_t = false)]
        allow_delete: bool,
        #[arg(long, default_value_t = false)]
        no_refresh: bool,
    },
    Destroy {
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,
        #[arg(long)]
        state: Option<PathBuf>,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    Read {
        #[arg(short = 'f', long)]
        file: PathBuf,
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    Import {
        #[arg(short = 'f', long)]
        file: Option<PathBuf>,
        #[arg(long)]
        state: Option<PathBuf>,
        #[command(flatten)]
        connection: ConnectionArgs,
        /// resource address, e.g. `codefresh_team.devs`.
        #[arg(long)]
        address: String,
        #[arg(long)]
        id: String,
    },
}

pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate { file } => {
            let manifest = load_manifest(&file)?;
            validate(&manifest)?;
            println!("ok");
        }
        Command::Plan {
            file,
            output,
            state,
            connection,
            allow_delete,
            no_refresh,
        } => {
            let manifest = load_manifest(&file)?;
            let mut state = load_state(state.as_deref())?;
            let provider = provider_for(&connection, Some(&manifest))?;
            let plan = build_plan(&provider, &manifest, &mut state, allow_delete, !no_refresh).await?;
            if !no_refresh {
                state.save()?;
            }
            match output {
                Some(path) => {
                    write_plan(&path, &plan)?;
                    print_plan(&plan);
                    println!("plan written to {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&plan)?),
            }
        }
        Command::Apply {
            file,
            plan,
            state,
            connection,
            allow_delete,
            no_refresh,
        } => {
            let manifest = load_manifest(&file)?;
            let mut state = load_state(state.as_deref())?;
            let provider = provider_for(&connection, Some(&manifest))?;
            let plan = match plan {
                Some(path) => read_plan(&path)?,
                None => {
                    build_plan(&provider, &manifest, &mut state, allow_delete, !no_refresh).await?
                }
            };
            print_plan(&plan);
            let report = apply_plan(&provider, &plan, &mut state, allow_delete).await?;
            for applied in &report.applied {
                for warning in &applied.warnings {
                    eprintln!("warning: {}: {warning}", applied.address);
                }
            }
            state.save()?;
            println!("applied {} operations", report.applied.len());
        }
        Command::Destroy {
            file,
            state,
            connection,
        } => {
            let manifest = file.as_deref().map(load_manifest).transpose()?;
            let mut state = load_state(state.as_deref())?;
            let provider = provider_for(&connection, manifest.as_ref())?;
            let plan = destroy_plan(&state);
            print_plan(&plan);
            let report = apply_plan(&provider, &plan, &mut state, true).await?;
            state.save()?;
            println!("destroyed {} objects", report.applied.len());
        }
        Command::Read { file, connection } => {
            let manifest = load_manifest(&file)?;
            validate(&manifest)?;
            let provider = provider_for(&connection, Some(&manifest))?;
            let data = read_data(&provider, &manifest).await?;
            let rendered: serde_json::Map<String, serde_json::Value> = data
                .into_iter()
                .map(|(address, attrs)| (address.to_string(), serde_json::Value::Object(attrs.into_iter().collect())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        Command::Import {
            file,
            state,
            connection,
            address,
            id,
        } => {
            let manifest = file.as_deref().map(load_manifest).transpose()?;
            let address = Address::try_from(address).map_err(|err| anyhow!(err))?;
            let mut state = load_state(state.as_deref())?;
            let provider = provider_for(&connection, manifest.as_ref())?;
            import_resource(&provider, &mut state, &address, &id).await?;
            state.save()?;
            println!("imported {address} ({id})");
        }
    }

    Ok(())
}

/// load state from the given path or the default one.
fn load_state(path: Option<&Path>) -> Result<StateStore> {
    match path {
        Some(path) => StateStore::load(path),
        None => StateStore::load(state_path(Path::new("."))),
    }
}

/// build the default state store path under the workspace root.
fn state_path(root: &Path) -> PathBuf {
    root.join(".codefresh").join("state.json")
}

/// write a plan file to disk.
fn write_plan(path: &Path, plan: &Plan) -> Result<()> {
    let raw = serde_json::to_string_pretty(plan)?;
    fs::write(path, raw).with_context(|| format!("write plan: {}", path.display()))
}

/// read a plan file from disk.
fn read_plan(path: &Path) -> Result<Plan> {
    let raw = fs::read_to_string(path).with_context(|| format!("read plan: {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse plan: {}", path.display()))
}

fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        eprintln!("no changes");
        return;
    }
    for op in &plan.ops {
        eprintln!("{}", describe_op(op));
    }
}

/// one-line human summary of an op.
fn describe_op(op: &Op) -> String {
    match op {
        Op::Create { address, .. } => format!("+ {address}"),
        Op::Update {
            address, changes, ..
        } => {
            let fields: Vec<&str> = changes.iter().map(|change| change.field.as_str()).collect();
            format!("~ {address} ({})", fields.join(", "))
        }
        Op::Delete { address, id } => format!("- {address} ({id})"),
    }
}

/// `provider:` block of a manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderBlock {
    api_url: Option<String>,
    graphql_url: Option<String>,
    token: Option<String>,
    token_header: Option<String>,
}

fn provider_for(args: &ConnectionArgs, manifest: Option<&Manifest>) -> Result<Provider> {
    let config = client_config(args, manifest)?;
    tracing::debug!(api_url = %config.api_url, graphql_url = %config.graphql_url, "configuring client");
    Ok(Provider::new(Client::new(config)?))
}

/// resolve client settings: flags, then the manifest, then environment, then defaults.
fn client_config(args: &ConnectionArgs, manifest: Option<&Manifest>) -> Result<ClientConfig> {
    let block = match manifest.and_then(|manifest| manifest.provider.clone()) {
        Some(value) => serde_json::from_value::<ProviderBlock>(value).context("parse provider block")?,
        None => ProviderBlock::default(),
    };

    let api_url = pick(&args.api_url, block.api_url, Some(API_URL_ENV))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let graphql_url = pick(&args.graphql_url, block.graphql_url, Some(GRAPHQL_URL_ENV))
        .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string());
    let token = pick(&args.api_key, block.token, Some(API_KEY_ENV))
        .ok_or_else(|| anyhow!("missing --api-key, provider.token or {API_KEY_ENV}"))?;
    let token_header = pick(&args.token_header, block.token_header, None)
        .unwrap_or_else(|| DEFAULT_TOKEN_HEADER.to_string());

    Ok(ClientConfig::new(api_url, token)
        .with_graphql_url(graphql_url)
        .with_token_header(token_header))
}

fn pick(flag: &Option<String>, manifest: Option<String>, env: Option<&str>) -> Option<String> {
    flag.clone()
        .or(manifest)
        .or_else(|| env.and_then(|key| std::env::var(key).ok()))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use codefresh_provider::FieldChange;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn manifest_with_provider(provider: serde_json::Value) -> Manifest {
        Manifest {
            provider: Some(provider),
            ..Default::default()
        }
    }

    #[test]
    fn state_path_uses_dot_codefresh() {
        let root = Path::new("/tmp/example");
        let path = state_path(root);
        assert!(path.ends_with(".codefresh/state.json"));
    }

    #[test]
    fn client_config_prefers_flags() {
        let args = ConnectionArgs {
            api_url: Some("http://flag/api".to_string()),
            api_key: Some("flag-token".to_string()),
            ..Default::default()
        };
        let manifest = manifest_with_provider(json!({
            "api_url": "http://manifest/api",
            "token": "manifest-token"
        }));
        let config = client_config(&args, Some(&manifest)).unwrap();
        assert_eq!(config.api_url, "http://flag/api");
        assert_eq!(config.token, "flag-token");
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
    }

    #[test]
    fn client_config_manifest_beats_env() {
        let _guard = env_lock().lock().unwrap();
        let saved = save_env(&[API_URL_ENV, GRAPHQL_URL_ENV, API_KEY_ENV]);
        std::env::set_var(API_URL_ENV, "http://env/api");
        std::env::set_var(GRAPHQL_URL_ENV, "http://env/graphql");
        std::env::set_var(API_KEY_ENV, "env-token");

        let result = std::panic::catch_unwind(|| {
            let manifest = manifest_with_provider(json!({
                "api_url": "http://manifest/api",
                "token_header": "x-access-token"
            }));
            let config = client_config(&ConnectionArgs::default(), Some(&manifest)).unwrap();
            assert_eq!(config.api_url, "http://manifest/api");
            assert_eq!(config.graphql_url, "http://env/graphql");
            assert_eq!(config.token, "env-token");
            assert_eq!(config.token_header, "x-access-token");
        });

        restore_env(saved);
        if let Err(err) = result {
            std::panic::resume_unwind(err);
        }
    }

    #[test]
    fn client_config_missing_token_is_error() {
        let _guard = env_lock().lock().unwrap();
        let saved = save_env(&[API_KEY_ENV]);
        std::env::remove_var(API_KEY_ENV);

        let result = client_config(&ConnectionArgs::default(), None);

        restore_env(saved);
        let err = result.unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn provider_block_rejects_unknown_keys() {
        let manifest = manifest_with_provider(json!({ "apiUrl": "http://typo" }));
        let args = ConnectionArgs {
            api_key: Some("t".to_string()),
            ..Default::default()
        };
        assert!(client_config(&args, Some(&manifest)).is_err());
    }

    #[test]
    fn plan_roundtrip_io() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let plan = Plan {
            ops: vec![Op::Delete {
                address: Address::new("codefresh_team", "devs"),
                id: "t1".to_string(),
            }],
        };

        write_plan(&path, &plan).unwrap();
        let loaded = read_plan(&path).unwrap();
        assert_eq!(loaded, plan);
    }

    #[test]
    fn describe_op_lists_changed_fields() {
        let op = Op::Update {
            address: Address::new("codefresh_project", "alpha"),
            id: "p1".to_string(),
            desired: Default::default(),
            changes: vec![
                FieldChange {
                    field: "tags".to_string(),
                    from: json!(["a"]),
                    to: json!(["b"]),
                },
                FieldChange {
                    field: "variables".to_string(),
                    from: json!({}),
                    to: json!({ "x": "1" }),
                },
            ],
        };
        assert_eq!(describe_op(&op), "~ codefresh_project.alpha (tags, variables)");
    }

    #[tokio::test]
    async fn apply_command_creates_and_saves_state() {
        let server = MockServer::start();
        let create = server.mock(|when, then| {
            when.method(POST).path("/team");
            then.status(201)
                .json_body(json!({ "_id": "t1", "name": "developers", "users": [] }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/team/t1");
            then.status(200).json_body(json!({
                "_id": "t1",
                "name": "developers",
                "account": "acc1",
                "users": []
            }));
        });

        let dir = tempdir().unwrap();
        let manifest = dir.path().join("main.yaml");
        let state = dir.path().join("state.json");
        fs::write(
            &manifest,
            format!(
                r#"provider:
  api_url: {}
  token: test-token
resources:
  - type: codefresh_team
    name: devs
    attrs:
      name: developers
"#,
                server.base_url()
            ),
        )
        .unwrap();

        let cli = Cli::parse_from([
            "codefresh",
            "apply",
            "-f",
            manifest.to_str().unwrap(),
            "--state",
            state.to_str().unwrap(),
        ]);
        run(cli).await.unwrap();

        create.assert();
        let stored = StateStore::load(&state).unwrap();
        let entry = stored.get(&Address::new("codefresh_team", "devs")).unwrap();
        assert_eq!(entry.id, "t1");
    }

    #[tokio::test]
    async fn plan_command_writes_plan_file() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("main.yaml");
        let output = dir.path().join("plan.json");
        fs::write(
            &manifest,
            r#"resources:
  - type: codefresh_project
    name: alpha
    attrs:
      name: alpha
"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "codefresh",
            "plan",
            "-f",
            manifest.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--state",
            dir.path().join("state.json").to_str().unwrap(),
            "--api-key",
            "t",
            "--no-refresh",
        ]);
        run(cli).await.unwrap();

        let plan = read_plan(&output).unwrap();
        assert_eq!(plan.ops.len(), 1);
        assert!(matches!(plan.ops[0], Op::Create { .. }));
    }
}
