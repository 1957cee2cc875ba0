use std::env;
use std::process::ExitCode;

use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use res_pad::app::{
    ByteSurface, ColorPicker, ConsolePrompt, EditorSettings, FileSink, LogStatus, MemoryByteSurface,
    MemoryTextSurface, Representation, ResourceHandle, Result, SyncedContentSession, TextSurface,
};

const USAGE: &str = "Usage: ResPad <file> [--raw] [--color <offset>]";
/// Bytes per line of the hex dump.
const HEX_WIDTH: usize = 16;
/// Hex dump stops after this many bytes.
const HEX_LIMIT: usize = 256;

/// `RUST_LOG` directives on top of an `info` default.
fn log_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(Level::INFO.into())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter())
        .init();

    let mut path = None;
    let mut raw = false;
    let mut color_offset = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--raw" => raw = true,
            "--color" => match args.next().as_deref().and_then(parse_offset) {
                Some(offset) => color_offset = Some(offset),
                None => {
                    eprintln!("{}", USAGE);
                    return ExitCode::FAILURE;
                }
            },
            "-h" | "--help" => {
                println!("{}", USAGE);
                return ExitCode::SUCCESS;
            }
            _ if path.is_none() => path = Some(arg),
            _ => {
                eprintln!("{}", USAGE);
                return ExitCode::FAILURE;
            }
        }
    }
    let Some(path) = path else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match run(&path, raw, color_offset) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("ResPad: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, raw: bool, color_offset: Option<usize>) -> Result<()> {
    let settings = EditorSettings::load();
    let handle = ResourceHandle::open_file(path)?;
    info!("Opened {} ({} bytes)", handle.name(), handle.size());

    let mut session: SyncedContentSession<MemoryTextSurface, MemoryByteSurface> =
        SyncedContentSession::new(handle, &settings, Box::new(ConsolePrompt::stdio()))
            .with_status(Box::new(LogStatus::default()));

    let target = if raw {
        Representation::Raw
    } else {
        Representation::Text
    };
    session.select_representation(target)?;

    println!("Resource: {}", session.handle().name());
    println!("Size:     {} bytes", session.handle().size());
    if let Some(charset) = session.text_charset() {
        println!("Charset:  {}", charset);
    }
    println!("View:     {}", session.active());
    println!();

    if let Some(text) = session.text_surface().filter(|_| !raw) {
        println!("{}", text.text());
    } else if let Some(bytes) = session.raw_surface() {
        print_hex(&bytes.bytes());
    }

    if let Some(offset) = color_offset {
        let bytes = session.serialize()?;
        match ColorPicker::from_settings(&bytes, offset, &settings) {
            Some(picker) => println!("\nColor at {:#X}: {}", offset, picker),
            None => println!("\nColor at {:#X}: out of range", offset),
        }
    }

    let mut sink = FileSink::new(path);
    session.close(Some(&mut sink))?;
    Ok(())
}

/// Decimal, or hex with a `0x` prefix.
fn parse_offset(text: &str) -> Option<usize> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn print_hex(data: &[u8]) {
    for (line, chunk) in data.chunks(HEX_WIDTH).take(HEX_LIMIT / HEX_WIDTH).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '.' })
            .collect();
        println!(
            "{:08X}  {:<width$}  {}",
            line * HEX_WIDTH,
            hex.join(" "),
            ascii,
            width = HEX_WIDTH * 3 - 1
        );
    }
    if data.len() > HEX_LIMIT {
        println!("... {} more bytes", data.len() - HEX_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert!(log_filter().to_string().contains("info"));
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("16"), Some(16));
        assert_eq!(parse_offset("0x1C"), Some(0x1C));
        assert_eq!(parse_offset("0X1c"), Some(0x1C));
        assert_eq!(parse_offset("zz"), None);
    }
}
