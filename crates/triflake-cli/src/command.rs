use crate::config::{Format, GenerateConfig, InspectArgs, Layout, WaitMode};
use anyhow::Context;
use std::io::{self, BufWriter, Write};
use triflake::{
    Generator, SleepWait, Snowflake, SnowflakeId64, SnowflakeId128, SnowflakeNilId64, SpinWait,
    SystemClock, TickWait,
};

/// Mints `config.count` IDs and writes them to `out`, one per line.
pub fn generate(config: &GenerateConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match config.wait {
        WaitMode::Spin => {
            let generator = Generator::new(config.node_id, SystemClock, SpinWait);
            emit(&generator, config, out)
        }
        WaitMode::Sleep => {
            let generator = Generator::new(config.node_id, SystemClock, SleepWait);
            emit(&generator, config, out)
        }
    }
}

fn emit<W: TickWait>(
    generator: &Generator<SystemClock, W>,
    config: &GenerateConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    tracing::debug!(
        node_id = generator.node_id(),
        layout = ?config.layout,
        count = config.count,
        "generating ids"
    );

    for _ in 0..config.count {
        let line = match config.layout {
            Layout::A => render(generator.next_id64(), config.format, |id| {
                id.to_raw().to_string()
            }),
            Layout::B => render(generator.next_nil_id64(), config.format, |id| {
                id.to_raw().to_string()
            }),
            Layout::C => render(generator.next_id128(), config.format, |id| {
                id.to_u128().to_string()
            }),
        };
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn render<I: Snowflake>(id: I, format: Format, decimal: impl FnOnce(&I) -> String) -> String {
    match format {
        Format::Dec => decimal(&id),
        Format::Hex => id.to_hex(),
        Format::Bin => id.to_bin(),
    }
}

/// Decodes `args.id` and writes its fields to `out`.
pub fn inspect(args: &InspectArgs, out: &mut impl Write) -> anyhow::Result<()> {
    match args.layout {
        Layout::A => describe::<SnowflakeId64>(&args.id, out),
        Layout::B => describe::<SnowflakeNilId64>(&args.id, out),
        Layout::C => describe::<SnowflakeId128>(&args.id, out),
    }
}

fn describe<I: Snowflake>(input: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let id = I::from_hex(input).with_context(|| format!("failed to decode {input:?}"))?;
    let datetime = id.datetime()?;

    writeln!(out, "timestamp_ms: {}", id.unix_millis())?;
    writeln!(out, "datetime:     {}", datetime.to_rfc3339())?;
    writeln!(out, "node_id:      {}", id.node_id())?;
    if I::SEQUENCE_BITS > 0 {
        writeln!(out, "sequence:     {}", id.sequence())?;
    }
    out.flush()?;
    Ok(())
}

pub fn stdout() -> BufWriter<io::StdoutLock<'static>> {
    BufWriter::new(io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(layout: Layout, format: Format, count: usize) -> GenerateConfig {
        GenerateConfig {
            node_id: 5,
            layout,
            count,
            format,
            wait: WaitMode::Spin,
        }
    }

    #[test]
    fn generate_writes_one_line_per_id() {
        let mut out = Vec::new();
        generate(&config(Layout::A, Format::Hex, 6), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        for line in lines {
            let id = SnowflakeId64::from_hex(line).unwrap();
            assert_eq!(id.node_id(), 5);
        }
    }

    #[test]
    fn generate_128_binary_is_padded() {
        let mut out = Vec::new();
        generate(&config(Layout::C, Format::Bin, 2), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for line in text.lines() {
            assert!(line.len() > 64);
            assert!(line.bytes().all(|b| b == b'0' || b == b'1'));
        }
    }

    #[test]
    fn generate_decimal_nil_ids() {
        let mut out = Vec::new();
        generate(&config(Layout::B, Format::Dec, 2), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let ids: Vec<u64> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert!(ids[0] < ids[1]);
        assert_eq!(ids[0] & SnowflakeNilId64::NODE_ID_MASK, 5);
    }

    #[test]
    fn inspect_prints_fields() {
        let args = InspectArgs {
            layout: Layout::A,
            id: "5000014".into(),
        };
        let mut out = Vec::new();
        inspect(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("timestamp_ms: 1456790400010"));
        assert!(text.contains("datetime:     2016-03-01T00:00:00.010+00:00"));
        assert!(text.contains("node_id:      5"));
        assert!(text.contains("sequence:     0"));
    }

    #[test]
    fn inspect_nil_omits_sequence() {
        let args = InspectArgs {
            layout: Layout::B,
            id: "5000005".into(),
        };
        let mut out = Vec::new();
        inspect(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("node_id:      5"));
        assert!(!text.contains("sequence"));
    }

    #[test]
    fn inspect_rejects_malformed_input() {
        let args = InspectArgs {
            layout: Layout::C,
            id: "abc".into(),
        };
        let err = inspect(&args, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("failed to decode"));
    }
}
