use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use triflake::{
    HashedNodeId, NodeIdProvider, Snowflake, SnowflakeId64, SnowflakeId128, SnowflakeNilId64,
};

/// Command-line arguments for the `triflake` binary.
///
/// Generation settings can be supplied through flags, environment variables,
/// or a `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "triflake",
    version,
    about = "Mint and inspect Snowflake-style IDs"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate new IDs and print one per line.
    Generate(GenerateArgs),
    /// Decode a hex-encoded ID and print its fields.
    Inspect(InspectArgs),
}

/// Which identifier layout to mint or decode.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 64-bit: 41-bit timestamp, 21-bit node id, 2-bit sequence.
    A,
    /// 64-bit: 41-bit timestamp, 23-bit node id, no sequence.
    B,
    /// 128-bit: 64-bit timestamp, 48-bit node id, 16-bit sequence.
    C,
}

impl Layout {
    pub fn max_node_id(self) -> u64 {
        match self {
            Self::A => SnowflakeId64::max_node_id(),
            Self::B => SnowflakeNilId64::max_node_id(),
            Self::C => SnowflakeId128::max_node_id(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Dec,
    Hex,
    Bin,
}

/// How the generator blocks when a millisecond is exhausted.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitMode {
    /// Busy-poll the clock (lowest latency).
    Spin,
    /// Sleep until the next millisecond (lowest CPU).
    Sleep,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Explicit node id. Must fit the layout's node id field.
    ///
    /// Environment variable: `TRIFLAKE_NODE_ID`
    #[arg(long, env = "TRIFLAKE_NODE_ID")]
    pub node_id: Option<u64>,

    /// Stable name (e.g. hostname) hashed into a node id when `--node-id` is
    /// not given. The hash is truncated to the layout's node id field.
    ///
    /// Environment variable: `TRIFLAKE_NODE_NAME`
    #[arg(long, env = "TRIFLAKE_NODE_NAME")]
    pub node_name: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Layout::A)]
    pub layout: Layout,

    /// Number of IDs to generate.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    #[arg(short, long, value_enum, default_value_t = Format::Hex)]
    pub format: Format,

    /// Environment variable: `TRIFLAKE_WAIT`
    #[arg(long, env = "TRIFLAKE_WAIT", value_enum, default_value_t = WaitMode::Spin)]
    pub wait: WaitMode,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[arg(short, long, value_enum, default_value_t = Layout::A)]
    pub layout: Layout,

    /// The ID in hex, as printed by `generate --format hex`.
    pub id: String,
}

/// Validated settings for `triflake generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub node_id: u64,
    pub layout: Layout,
    pub count: usize,
    pub format: Format,
    pub wait: WaitMode,
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        let max_node_id = args.layout.max_node_id();

        let node_id = match (args.node_id, args.node_name.as_deref()) {
            (Some(node_id), _) => {
                if node_id > max_node_id {
                    bail!(
                        "node id {} exceeds layout {:?} node id space (max = {})",
                        node_id,
                        args.layout,
                        max_node_id
                    );
                }
                node_id
            }
            (None, Some(name)) if !name.is_empty() => {
                HashedNodeId::new(name).node_id() & max_node_id
            }
            (None, _) => bail!("a node id is required: pass --node-id or --node-name"),
        };

        if args.count == 0 {
            bail!("count must be greater than 0");
        }

        Ok(Self {
            node_id,
            layout: args.layout,
            count: args.count,
            format: args.format,
            wait: args.wait,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["triflake", "generate"];
        full.extend_from_slice(argv);
        match CliArgs::try_parse_from(full).unwrap().command {
            Command::Generate(args) => args,
            Command::Inspect(_) => unreachable!(),
        }
    }

    #[test]
    fn explicit_node_id_is_used() {
        let config =
            GenerateConfig::try_from(generate_args(&["--node-id", "5", "-n", "3"])).unwrap();
        assert_eq!(config.node_id, 5);
        assert_eq!(config.count, 3);
        assert_eq!(config.layout, Layout::A);
        assert_eq!(config.format, Format::Hex);
        assert_eq!(config.wait, WaitMode::Spin);
    }

    #[test]
    fn node_id_must_fit_layout() {
        let too_wide = (1u64 << 21).to_string();
        assert!(GenerateConfig::try_from(generate_args(&["--node-id", &too_wide])).is_err());

        let config = GenerateConfig::try_from(generate_args(&[
            "--node-id",
            &too_wide,
            "--layout",
            "c",
        ]))
        .unwrap();
        assert_eq!(config.node_id, 1 << 21);
    }

    #[test]
    fn node_name_is_hashed_into_field() {
        let config =
            GenerateConfig::try_from(generate_args(&["--node-name", "host-1", "--layout", "b"]))
                .unwrap();
        assert_eq!(
            config.node_id,
            HashedNodeId::new("host-1").node_id() & SnowflakeNilId64::NODE_ID_MASK
        );
    }

    #[test]
    fn missing_node_id_or_zero_count_is_rejected() {
        assert!(GenerateConfig::try_from(generate_args(&[])).is_err());
        assert!(GenerateConfig::try_from(generate_args(&["--node-id", "1", "-n", "0"])).is_err());
    }

    #[test]
    fn inspect_parses_layout_and_id() {
        let args = CliArgs::try_parse_from(["triflake", "inspect", "-l", "c", "abc"]).unwrap();
        match args.command {
            Command::Inspect(args) => {
                assert_eq!(args.layout, Layout::C);
                assert_eq!(args.id, "abc");
            }
            Command::Generate(_) => unreachable!(),
        }
    }
}
