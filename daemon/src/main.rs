//! fncon daemon: operator entry point for a node's data directory.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use fncon_consensus::VoteSet;
use fncon_crypto::{generate_keypair, keypair_from_seed};
use fncon_node::{init_logging, NodeConfig};
use fncon_store::VoteSetStore;
use fncon_store_lmdb::{check_integrity, LmdbEnvironment};
use fncon_types::{KeyPair, ValidatorAddress};

#[derive(Parser)]
#[command(name = "fncon-daemon", about = "Fn-result consensus node tooling")]
struct Cli {
    /// Data directory holding the LMDB environment. Overrides the config file.
    #[arg(long, env = "FNCON_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FNCON_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List persisted vote sets.
    Inspect {
        /// Only show this fn id.
        #[arg(long)]
        fn_id: Option<String>,

        /// Print JSON instead of one line per vote set.
        #[arg(long)]
        json: bool,
    },
    /// Run the storage integrity check.
    Check,
    /// Print a validator key pair and its address.
    Keygen {
        /// Derive from a 32-byte hex seed instead of the OS random source.
        #[arg(long)]
        seed: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

/// Operator view of one persisted vote set.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct VoteSetSummary {
    fn_id: String,
    chain_id: String,
    nonce: u64,
    response_hash: Option<String>,
    validator_count: u32,
    voters: Vec<u32>,
}

impl VoteSetSummary {
    fn from_vote_set(vote_set: &VoteSet) -> Self {
        Self {
            fn_id: vote_set.fn_id().to_string(),
            chain_id: vote_set.chain_id().to_string(),
            nonce: vote_set.nonce(),
            response_hash: vote_set.response_hash().map(|h| h.to_string()),
            validator_count: vote_set.bits().len(),
            voters: vote_set.votes().iter().map(|v| v.validator_index).collect(),
        }
    }
}

impl std::fmt::Display for VoteSetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nonce={} votes={}/{} hash={} voters={:?}",
            self.fn_id,
            self.nonce,
            self.voters.len(),
            self.validator_count,
            self.response_hash.as_deref().unwrap_or("-"),
            self.voters,
        )
    }
}

#[derive(Debug, Serialize)]
struct KeyOutput {
    public_key: String,
    private_key: String,
    address: String,
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path = path
                .to_str()
                .context("config path is not valid UTF-8")?;
            NodeConfig::from_toml_file(path)?
        }
        None => NodeConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn open_environment(config: &NodeConfig) -> anyhow::Result<LmdbEnvironment> {
    if !config.data_dir.exists() {
        bail!("data directory {} does not exist", config.data_dir.display());
    }
    LmdbEnvironment::open(&config.data_dir, config.lmdb.max_dbs, config.lmdb.map_size)
        .with_context(|| format!("opening {}", config.data_dir.display()))
}

fn summarize(
    store: &dyn VoteSetStore,
    fn_id: Option<&str>,
) -> anyhow::Result<Vec<VoteSetSummary>> {
    let mut summaries = Vec::new();
    for (id, bytes) in store.iter_vote_sets()? {
        if fn_id.is_some_and(|wanted| wanted != id) {
            continue;
        }
        let vote_set =
            VoteSet::decode(&bytes).with_context(|| format!("decoding vote set for {id}"))?;
        summaries.push(VoteSetSummary::from_vote_set(&vote_set));
    }
    Ok(summaries)
}

fn keypair(seed: Option<&str>) -> anyhow::Result<KeyPair> {
    let Some(seed) = seed else {
        return Ok(generate_keypair());
    };
    let bytes = hex::decode(seed).context("seed is not hex")?;
    let seed: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("seed must be 32 bytes, got {}", b.len()))?;
    Ok(keypair_from_seed(&seed))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let format = config.parsed_log_format()?;
    init_logging(format, &config.log_level)?;

    match &cli.command {
        Command::Inspect { fn_id, json } => {
            let env = open_environment(&config)?;
            let summaries = summarize(&env.vote_set_store(), fn_id.as_deref())?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("no vote sets stored");
            } else {
                for summary in &summaries {
                    println!("{summary}");
                }
            }
        }
        Command::Check => {
            let env = open_environment(&config)?;
            let report = check_integrity(env.env())?;
            println!(
                "databases checked: {}, entries: {}",
                report.databases_checked, report.total_entries
            );
            if !report.is_healthy() {
                for error in &report.errors {
                    println!("error: {error}");
                }
                bail!("integrity check failed");
            }
            println!("ok");
        }
        Command::Keygen { seed, json } => {
            let kp = keypair(seed.as_deref())?;
            let output = KeyOutput {
                public_key: hex::encode(kp.public.as_bytes()),
                private_key: hex::encode(kp.private.0),
                address: ValidatorAddress::from_public_key(&kp.public).to_string(),
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("public key:  {}", output.public_key);
                println!("private key: {}", output.private_key);
                println!("address:     {}", output.address);
            }
            tracing::debug!(address = %output.address, "generated validator key");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fncon_consensus::FnResponse;
    use fncon_crypto::Ed25519Signer;
    use fncon_types::{PrivateKey, ResponseHash};

    fn stored_env(dir: &std::path::Path) -> LmdbEnvironment {
        let env = LmdbEnvironment::open(dir, 8, 16 * 1024 * 1024).unwrap();
        let mut vs = VoteSet::new("chain", "oracle-1", 4, 3);
        let response = FnResponse {
            hash: ResponseHash::new([0xab; 32]),
            oracle_signature: vec![1],
        };
        let signer = Ed25519Signer::new(PrivateKey([9; 32]));
        vs.add_vote(&response, 2, &signer).unwrap();
        env.vote_set_store()
            .put_vote_set("oracle-1", &vs.encode().unwrap())
            .unwrap();
        env
    }

    #[test]
    fn summarize_lists_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let env = stored_env(dir.path());
        let store = env.vote_set_store();

        let all = summarize(&store, None).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].nonce, 4);
        assert_eq!(all[0].voters, vec![2]);
        assert_eq!(all[0].validator_count, 3);
        assert_eq!(all[0].response_hash.as_deref(), Some("ab".repeat(32).as_str()));

        assert!(summarize(&store, Some("other")).unwrap().is_empty());
    }

    #[test]
    fn summary_line_is_readable() {
        let summary = VoteSetSummary {
            fn_id: "oracle-1".into(),
            chain_id: "c".into(),
            nonce: 2,
            response_hash: None,
            validator_count: 4,
            voters: vec![],
        };
        assert_eq!(
            summary.to_string(),
            "oracle-1 nonce=2 votes=0/4 hash=- voters=[]"
        );
    }

    #[test]
    fn keypair_from_hex_seed_is_deterministic() {
        let seed = "07".repeat(32);
        let a = keypair(Some(&seed)).unwrap();
        let b = keypair(Some(&seed)).unwrap();
        assert_eq!(a.public, b.public);
        assert!(keypair(Some("0707")).is_err());
        assert!(keypair(Some("zz")).is_err());
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from(["fncon-daemon", "--data-dir", "/tmp/x", "inspect", "--json"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert!(matches!(cli.command, Command::Inspect { json: true, .. }));
    }
}
