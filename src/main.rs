//! Command-line front end.
//!
//! Reads XML from files or stdin, applies the configured masks, and prints
//! the result. Rules come from `--mask` flags, a JSON options file, or both.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;

use xmlmask::{mask_xml, Indent, MaskRule, MaskStrategy, Options};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "xmlmask", version, about = "Mask sensitive element text in XML documents")]
struct Cli {
    /// Prefix written at the start of every output line
    #[arg(long)]
    prefix: Option<String>,

    /// Indentation per nesting level: a space count or a whitespace literal.
    /// 0 or an empty string gives compact output
    #[arg(long)]
    indent: Option<String>,

    /// Masking rule NAME[@NAMESPACE]=STRATEGY, repeatable. Strategies:
    /// show-last-four, show-middle, show-word-start, show-none
    #[arg(long = "mask", value_name = "RULE")]
    masks: Vec<String>,

    /// JSON file holding a full options object
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Input files; stdin is read when none are given
    files: Vec<PathBuf>,
}

fn main() {
    std::process::exit(match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            1
        }
    });
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let options = build_options(&cli)?;
    let inputs = read_inputs(&cli.files)?;
    let show_headers = cli.verbose || inputs.len() > 1;

    let mut failed = false;
    for (i, (label, content)) in inputs.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if show_headers {
            println!("Output of {label}");
        }
        match mask_xml(content, &options) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                failed = true;
                eprintln!("ERROR: {label}: {err}");
            }
        }
    }
    Ok(if failed { 1 } else { 0 })
}

fn build_options(cli: &Cli) -> Result<Options> {
    let mut options = match &cli.rules {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading rules file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing rules file {}", path.display()))?
        }
        None => Options::default(),
    };
    if let Some(prefix) = &cli.prefix {
        options.prefix = prefix.clone();
    }
    if let Some(indent) = &cli.indent {
        options.indent = parse_indent(indent);
    }
    for rule in &cli.masks {
        options.masks.push(parse_mask(rule)?);
    }
    Ok(options)
}

/// All-digit values count spaces, anything else is taken literally.
fn parse_indent(raw: &str) -> Indent {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        match raw.parse() {
            Ok(count) => Indent::Count(count),
            Err(_) => Indent::Literal(raw.to_string()),
        }
    } else {
        Indent::Literal(raw.to_string())
    }
}

fn parse_mask(raw: &str) -> Result<MaskRule> {
    let Some((target, strategy)) = raw.split_once('=') else {
        bail!("invalid --mask '{raw}', expected NAME[@NAMESPACE]=STRATEGY");
    };
    let (name, space) = match target.split_once('@') {
        Some((name, space)) => (name, space),
        None => (target, ""),
    };
    let mask = MaskStrategy::from_str(strategy)
        .map_err(|msg| anyhow::anyhow!("invalid --mask '{raw}': {msg}"))?;
    Ok(MaskRule {
        name: name.to_string(),
        space: space.to_string(),
        mask,
    })
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    if files.is_empty() {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("reading stdin")?;
        return Ok(vec![("<stdin>".to_string(), content)]);
    }
    files
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok((path.display().to_string(), content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mask_flag_with_namespace() {
        let rule = parse_mask("AcctNb@urn:iso=show-last-four").unwrap();
        assert_eq!(rule.name, "AcctNb");
        assert_eq!(rule.space, "urn:iso");
        assert_eq!(rule.mask, MaskStrategy::ShowLastFour);
    }

    #[test]
    fn parses_mask_flag_without_namespace() {
        let rule = parse_mask("ssn=show-none").unwrap();
        assert_eq!(rule.name, "ssn");
        assert_eq!(rule.space, "");
    }

    #[test]
    fn rejects_mask_flag_without_strategy() {
        assert!(parse_mask("ssn").is_err());
        assert!(parse_mask("ssn=blackout").is_err());
    }

    #[test]
    fn indent_flag_accepts_counts_and_literals() {
        assert_eq!(parse_indent("4"), Indent::Count(4));
        assert_eq!(parse_indent("0"), Indent::Count(0));
        assert_eq!(parse_indent("\t"), Indent::Literal("\t".to_string()));
        assert_eq!(parse_indent(""), Indent::Literal(String::new()));
    }
}
